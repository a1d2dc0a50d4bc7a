use crate::error::ServiceError;
use crate::types::SearchRequest;

/// Per-branch result cap, applied regardless of the request's limit.
pub const BATCH_SIZE: usize = 20;

/// High code point appended to prefix text to form the exclusive upper
/// range bound ("starts with" as a range scan).
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// Catalog field a descriptor targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Tags,
    Title,
    Artist,
    Genre,
    Mood,
}

/// Match condition for one lookup branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Tag-set containment: the field holds `value` as an element.
    Contains { field: Field, value: String },
    /// Prefix scan: `lower <= field < upper`.
    Range {
        field: Field,
        lower: String,
        upper: String,
    },
    /// Conjunction of exact matches.
    Equals(Vec<(Field, String)>),
}

/// Result ordering for one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOrder {
    /// Upload time descending.
    UploadDesc,
    /// Ascending on the range field, upload time descending as secondary.
    FieldAscUploadDesc,
}

/// One independently executable lookup. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub predicate: Predicate,
    pub order: BranchOrder,
    pub cap: usize,
}

impl QueryDescriptor {
    /// Prefix scan used by both the search planner and the suggestion
    /// engine. `text` must already be lowercased.
    pub fn prefix(field: Field, text: &str, order: BranchOrder, cap: usize) -> Self {
        QueryDescriptor {
            predicate: Predicate::Range {
                field,
                lower: text.to_string(),
                upper: format!("{text}{PREFIX_SENTINEL}"),
            },
            order,
            cap,
        }
    }
}

/// Pure request-to-descriptors planning; execution happens elsewhere.
pub struct QueryPlanner;

impl QueryPlanner {
    /// Produce 1-4 independent descriptors for a request, in fixed branch
    /// order: tag containment, title prefix, artist prefix, filter-only.
    pub fn plan(request: &SearchRequest) -> Result<Vec<QueryDescriptor>, ServiceError> {
        let query = request.query_text().map(str::to_lowercase);
        let filters = request.filters.clone().unwrap_or_default();

        if query.is_none() && !filters.has_equality_filters() {
            return Err(ServiceError::InvalidArgument(
                "search requires query text or at least one filter".to_string(),
            ));
        }

        let mut descriptors = Vec::with_capacity(4);

        if let Some(text) = &query {
            if filters.search_in_tags != Some(false) {
                descriptors.push(QueryDescriptor {
                    predicate: Predicate::Contains {
                        field: Field::Tags,
                        value: text.clone(),
                    },
                    order: BranchOrder::UploadDesc,
                    cap: BATCH_SIZE,
                });
            }
            descriptors.push(QueryDescriptor::prefix(
                Field::Title,
                text,
                BranchOrder::FieldAscUploadDesc,
                BATCH_SIZE,
            ));
            descriptors.push(QueryDescriptor::prefix(
                Field::Artist,
                text,
                BranchOrder::FieldAscUploadDesc,
                BATCH_SIZE,
            ));
        }

        if filters.has_equality_filters() || query.is_none() {
            let mut pairs = Vec::new();
            if let Some(genre) = &filters.genre {
                pairs.push((Field::Genre, genre.to_lowercase()));
            }
            if let Some(mood) = &filters.mood {
                pairs.push((Field::Mood, mood.to_lowercase()));
            }
            if let Some(artist) = &filters.artist {
                pairs.push((Field::Artist, artist.to_lowercase()));
            }
            descriptors.push(QueryDescriptor {
                predicate: Predicate::Equals(pairs),
                order: BranchOrder::UploadDesc,
                cap: BATCH_SIZE,
            });
        }

        Ok(descriptors)
    }
}
