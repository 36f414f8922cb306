//! Trainer search filters, applied in memory or sent to the backend.

use crate::models::Trainer;
use serde_json::{Value, json};

/// Fields the free-text query is matched against
pub const QUERY_FIELDS: [&str; 3] = ["full_name", "headline", "expertise"];

/// Frappe list constraints: every `filters` entry must hold, and at least one
/// `or_filters` entry must hold when any are given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrappeFilters {
    pub filters: Vec<Value>,
    pub or_filters: Vec<Value>,
}

impl FrappeFilters {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.or_filters.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainerFilter {
    /// Free text matched against name, headline and expertise
    pub query: Option<String>,
    pub expertise: Option<String>,
    pub city: Option<String>,
    pub min_rating: Option<f32>,
    pub max_hourly_rate: Option<f64>,
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

impl TrainerFilter {
    pub fn is_empty(&self) -> bool {
        normalized(&self.query).is_none()
            && normalized(&self.expertise).is_none()
            && normalized(&self.city).is_none()
            && self.min_rating.is_none()
            && self.max_hourly_rate.is_none()
    }

    pub fn matches(&self, trainer: &Trainer) -> bool {
        if let Some(query) = normalized(&self.query) {
            let in_name = trainer.full_name.to_lowercase().contains(&query);
            let in_headline = trainer
                .headline
                .as_deref()
                .is_some_and(|h| h.to_lowercase().contains(&query));
            let in_tags = trainer
                .expertise
                .iter()
                .any(|t| t.to_lowercase().contains(&query));
            if !(in_name || in_headline || in_tags) {
                return false;
            }
        }

        if let Some(tag) = normalized(&self.expertise) {
            if !trainer.has_expertise(&tag) {
                return false;
            }
        }

        if let Some(city) = normalized(&self.city) {
            if trainer.city.as_deref().map(str::to_lowercase) != Some(city) {
                return false;
            }
        }

        // Trainers without a rating or rate are excluded once a bound is set
        if let Some(min_rating) = self.min_rating {
            if !trainer.rating.is_some_and(|r| r >= min_rating) {
                return false;
            }
        }

        if let Some(max_rate) = self.max_hourly_rate {
            if !trainer.hourly_rate.is_some_and(|r| r <= max_rate) {
                return false;
            }
        }

        true
    }

    /// Matching trainers in their original order
    pub fn apply<'a>(&self, trainers: &'a [Trainer]) -> Vec<&'a Trainer> {
        let matched: Vec<&Trainer> = trainers.iter().filter(|t| self.matches(t)).collect();
        log::debug!(
            "Trainer filter kept {} of {} trainers",
            matched.len(),
            trainers.len()
        );
        matched
    }

    /// The same constraints as Frappe list filters (`[field, operator, value]`).
    /// The free-text query becomes one `or_filters` entry per [`QUERY_FIELDS`] field.
    pub fn to_frappe_filters(&self) -> FrappeFilters {
        let or_filters = match normalized(&self.query) {
            Some(query) => QUERY_FIELDS
                .iter()
                .map(|field| json!([field, "like", format!("%{}%", query)]))
                .collect(),
            None => Vec::new(),
        };

        let mut filters = Vec::new();
        if let Some(tag) = normalized(&self.expertise) {
            filters.push(json!(["expertise", "like", format!("%{}%", tag)]));
        }
        if let Some(city) = normalized(&self.city) {
            filters.push(json!(["city", "=", city]));
        }
        if let Some(min_rating) = self.min_rating {
            filters.push(json!(["rating", ">=", min_rating]));
        }
        if let Some(max_rate) = self.max_hourly_rate {
            filters.push(json!(["hourly_rate", "<=", max_rate]));
        }

        FrappeFilters {
            filters,
            or_filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trainer(name: &str, city: &str, tags: &[&str], rate: f64, rating: Option<f32>) -> Trainer {
        Trainer {
            name: name.to_string(),
            full_name: name.to_string(),
            headline: Some(format!("{} coach", tags.first().unwrap_or(&"soft skills"))),
            expertise: tags.iter().map(|t| t.to_string()).collect(),
            city: Some(city.to_string()),
            hourly_rate: Some(rate),
            rating,
            image: None,
        }
    }

    fn roster() -> Vec<Trainer> {
        vec![
            trainer("Asha Rao", "Pune", &["Leadership", "Communication"], 2500.0, Some(4.8)),
            trainer("Dev Mehta", "Mumbai", &["Sales"], 1800.0, Some(4.1)),
            trainer("Lin Chen", "Pune", &["Negotiation"], 3200.0, None),
        ]
    }

    fn names(trainers: &[&Trainer]) -> Vec<String> {
        trainers.iter().map(|t| t.full_name.clone()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = TrainerFilter {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&roster()).len(), 3);
        assert!(filter.to_frappe_filters().is_empty());
        assert!(TrainerFilter::default().to_frappe_filters().is_empty());
    }

    #[test]
    fn query_matches_name_headline_and_tags() {
        let list = roster();
        let by_name = TrainerFilter {
            query: Some("mehta".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&by_name.apply(&list)), vec!["Dev Mehta"]);

        let by_tag = TrainerFilter {
            query: Some("COMMUNIC".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&by_tag.apply(&list)), vec!["Asha Rao"]);
    }

    #[test]
    fn combined_constraints() {
        let list = roster();
        let filter = TrainerFilter {
            city: Some("pune".to_string()),
            max_hourly_rate: Some(3000.0),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&list)), vec!["Asha Rao"]);
    }

    #[test]
    fn unrated_trainers_fail_rating_bound() {
        let list = roster();
        let filter = TrainerFilter {
            min_rating: Some(4.0),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&list)), vec!["Asha Rao", "Dev Mehta"]);
    }

    #[test]
    fn frappe_filters_mirror_fields() {
        let filter = TrainerFilter {
            query: Some("Rao".to_string()),
            city: Some("Pune".to_string()),
            min_rating: Some(4.5),
            ..Default::default()
        };
        let frappe = filter.to_frappe_filters();
        assert_eq!(
            frappe.filters,
            vec![json!(["city", "=", "pune"]), json!(["rating", ">=", 4.5])]
        );
        assert_eq!(
            frappe.or_filters,
            vec![
                json!(["full_name", "like", "%rao%"]),
                json!(["headline", "like", "%rao%"]),
                json!(["expertise", "like", "%rao%"]),
            ]
        );
    }

    #[test]
    fn backend_query_covers_every_field_matched_in_memory() {
        let filter = TrainerFilter {
            query: Some("Communication".to_string()),
            ..Default::default()
        };
        let or_filters = filter.to_frappe_filters().or_filters;

        let blank = Trainer {
            name: "TR-9".to_string(),
            full_name: "Ravi Iyer".to_string(),
            headline: None,
            expertise: Vec::new(),
            city: None,
            hourly_rate: None,
            rating: None,
            image: None,
        };
        let by_name = Trainer {
            full_name: "Communication Guru".to_string(),
            ..blank.clone()
        };
        let by_headline = Trainer {
            headline: Some("Business communication coach".to_string()),
            ..blank.clone()
        };
        let by_tag = Trainer {
            expertise: vec!["Communication".to_string()],
            ..blank.clone()
        };

        assert!(!filter.matches(&blank));
        for (field, trainer) in QUERY_FIELDS.iter().zip([&by_name, &by_headline, &by_tag]) {
            assert!(filter.matches(trainer), "{}", field);
            assert!(
                or_filters.contains(&json!([field, "like", "%communication%"])),
                "{}",
                field
            );
        }
        assert_eq!(or_filters.len(), QUERY_FIELDS.len());
    }
}
