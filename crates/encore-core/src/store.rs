use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::planner::{BranchOrder, Field, Predicate, QueryDescriptor};
use crate::types::Timestamp;

/// Raw catalog record as held by the backing document store. Upload
/// timestamps may be absent or malformed here; validation happens during
/// aggregation, not at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// One ordered page of records. `more` reports whether the branch cap cut
/// the result off; nothing in this core reads past it.
#[derive(Debug, Clone)]
pub struct Page {
    pub records: Vec<MediaRecord>,
    pub more: bool,
}

/// Query-execution seam against the backing store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn run(&self, descriptor: &QueryDescriptor) -> Result<Page, ServiceError>;
}

/// In-memory catalog executing descriptors over a record vector. Match
/// fields are compared lowercase-normalized, mirroring how the production
/// store keeps normalized copies of its range-scanned fields.
pub struct MemoryStore {
    records: Vec<MediaRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<MediaRecord>) -> Self {
        Self { records }
    }

    fn field_value(record: &MediaRecord, field: Field) -> Option<&str> {
        match field {
            Field::Title => Some(&record.title),
            Field::Artist => Some(&record.artist),
            Field::Genre => record.genre.as_deref(),
            Field::Mood => record.mood.as_deref(),
            Field::Tags => None,
        }
    }

    fn matches(record: &MediaRecord, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Contains { field: Field::Tags, value } => record
                .tags
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|tag| tag.to_lowercase() == *value),
            Predicate::Contains { .. } => false,
            Predicate::Range { field, lower, upper } => {
                match Self::field_value(record, *field) {
                    Some(text) => {
                        let normalized = text.to_lowercase();
                        normalized.as_str() >= lower.as_str()
                            && normalized.as_str() < upper.as_str()
                    }
                    None => false,
                }
            }
            Predicate::Equals(pairs) => pairs.iter().all(|(field, expected)| {
                Self::field_value(record, *field)
                    .is_some_and(|text| text.to_lowercase() == *expected)
            }),
        }
    }

    fn order(records: &mut [MediaRecord], descriptor: &QueryDescriptor) {
        match descriptor.order {
            BranchOrder::UploadDesc => {
                // Missing timestamps sort last; the aggregator drops them.
                records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
            }
            BranchOrder::FieldAscUploadDesc => {
                let field = match &descriptor.predicate {
                    Predicate::Range { field, .. } => *field,
                    Predicate::Contains { field, .. } => *field,
                    Predicate::Equals(_) => Field::Title,
                };
                records.sort_by(|a, b| {
                    let a_key = Self::field_value(a, field).map(str::to_lowercase);
                    let b_key = Self::field_value(b, field).map(str::to_lowercase);
                    a_key
                        .cmp(&b_key)
                        .then_with(|| b.uploaded_at.cmp(&a.uploaded_at))
                });
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn run(&self, descriptor: &QueryDescriptor) -> Result<Page, ServiceError> {
        let mut matched: Vec<MediaRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, &descriptor.predicate))
            .cloned()
            .collect();

        Self::order(&mut matched, descriptor);

        let more = matched.len() > descriptor.cap;
        matched.truncate(descriptor.cap);
        Ok(Page {
            records: matched,
            more,
        })
    }
}
