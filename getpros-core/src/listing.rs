//! Editing helpers for the repeatable sections of a trainer profile
//! (workshops, case studies).
//!
//! Every helper takes the current list by reference and returns a new one, so the
//! caller decides when to persist. Update and remove report whether a record
//! matched instead of silently doing nothing.

use crate::error::GetProsError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Opaque key of a record within its list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Idx(String);

impl Idx {
    /// Wrap a key received from the backend. New records get theirs from
    /// [`new_idx`] or an [`IdxGenerator`].
    pub fn from_existing(key: impl Into<String>) -> Self {
        Idx(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Frappe child rows carry a numeric `idx`; locally created rows carry strings.
impl<'de> Deserialize<'de> for Idx {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawIdx {
            Text(String),
            Number(u64),
        }

        Ok(match RawIdx::deserialize(deserializer)? {
            RawIdx::Text(key) => Idx(key),
            RawIdx::Number(n) => Idx(n.to_string()),
        })
    }
}

/// Generators created so far in this process
static GENERATORS_CREATED: AtomicU64 = AtomicU64::new(0);

/// Hands out keys that are unique within the process, across generators
#[derive(Debug)]
pub struct IdxGenerator {
    session: String,
    counter: AtomicU64,
}

impl IdxGenerator {
    pub fn new() -> Self {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        let generator = GENERATORS_CREATED.fetch_add(1, Ordering::Relaxed);
        Self {
            session: format!("{:x}.{}", nanos.unsigned_abs(), generator),
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_idx(&self) -> Idx {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Idx(format!("row-{}-{}", self.session, n))
    }
}

impl Default for IdxGenerator {
    fn default() -> Self {
        Self::new()
    }
}

static GENERATOR: OnceLock<IdxGenerator> = OnceLock::new();

/// Fresh key from the process-wide generator
pub fn new_idx() -> Idx {
    GENERATOR.get_or_init(IdxGenerator::new).next_idx()
}

/// Records addressable by an [`Idx`]
pub trait Indexed {
    fn idx(&self) -> &Idx;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    NotFound,
}

impl EditOutcome {
    pub fn is_applied(self) -> bool {
        self == EditOutcome::Applied
    }
}

pub fn add<T: Clone>(list: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(list.len() + 1);
    next.extend_from_slice(list);
    next.push(item);
    next
}

/// Replace the first record sharing `item`'s key
pub fn update<T: Indexed + Clone>(list: &[T], item: T) -> (Vec<T>, EditOutcome) {
    let mut next = list.to_vec();
    match next.iter().position(|existing| existing.idx() == item.idx()) {
        Some(position) => {
            next[position] = item;
            (next, EditOutcome::Applied)
        }
        None => {
            log::debug!("No record with idx {} to update", item.idx());
            (next, EditOutcome::NotFound)
        }
    }
}

/// Drop every record keyed `idx`
pub fn remove<T: Indexed + Clone>(list: &[T], idx: &Idx) -> (Vec<T>, EditOutcome) {
    let next: Vec<T> = list
        .iter()
        .filter(|existing| existing.idx() != idx)
        .cloned()
        .collect();

    if next.len() == list.len() {
        log::debug!("No record with idx {} to remove", idx);
        (next, EditOutcome::NotFound)
    } else {
        (next, EditOutcome::Applied)
    }
}

/// Reshape records into Frappe child-table rows.
///
/// Each row keeps the record's fields, gets `doctype` set and has `idx`
/// overwritten with its 1-based position; local keys are not sent.
pub fn to_child_table_payload<T: Serialize>(
    doctype: &str,
    list: &[T],
) -> Result<Vec<Value>, GetProsError> {
    list.iter()
        .enumerate()
        .map(|(position, record)| {
            let mut row = match serde_json::to_value(record)? {
                Value::Object(map) => map,
                other => {
                    return Err(GetProsError::Serialization(format!(
                        "{} row must serialize to an object, got {}",
                        doctype, other
                    )));
                }
            };
            row.insert("idx".to_string(), Value::from(position + 1));
            row.insert("doctype".to_string(), Value::from(doctype));
            Ok(Value::Object(row))
        })
        .collect()
}

/// `{ "<field>": [rows...] }`, the body for saving one child table of a parent
pub fn child_table_update<T: Serialize>(
    field: &str,
    doctype: &str,
    list: &[T],
) -> Result<Value, GetProsError> {
    let mut body = Map::new();
    body.insert(
        field.to_string(),
        Value::Array(to_child_table_payload(doctype, list)?),
    );
    Ok(Value::Object(body))
}
