use crate::listing::{Idx, Indexed};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const TRAINER_DOCTYPE: &str = "Trainer";
pub const WORKSHOP_DOCTYPE: &str = "Trainer Workshop";
pub const CASE_STUDY_DOCTYPE: &str = "Trainer Case Study";

/// Trainer card as listed on the marketplace
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trainer {
    /// Document name on the backend
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "tag_list")]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Rupees per hour
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Trainer {
    pub fn has_expertise(&self, tag: &str) -> bool {
        self.expertise.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Online,
    Offline,
    Hybrid,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Online => write!(f, "Online"),
            DeliveryMode::Offline => write!(f, "In person"),
            DeliveryMode::Hybrid => write!(f, "Hybrid"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workshop {
    pub idx: Idx,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_hours: f32,
    /// Rupees per participant
    pub price: f64,
    pub mode: DeliveryMode,
}

impl Indexed for Workshop {
    fn idx(&self) -> &Idx {
        &self.idx
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CaseStudy {
    pub idx: Idx,
    pub title: String,
    pub client: String,
    #[serde(default)]
    pub summary: String,
}

impl Indexed for CaseStudy {
    fn idx(&self) -> &Idx {
        &self.idx
    }
}

/// Backend stores tags either as a comma separated string or as a list
fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        Joined(String),
        List(Vec<String>),
    }

    let tags = match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        Some(Tags::List(list)) => list,
        None => Vec::new(),
    };

    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}
