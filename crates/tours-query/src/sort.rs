use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parse a comma-separated sort list such as `price,-ratingsAverage`.
///
/// A leading `-` sorts descending. Blank segments are skipped and a field
/// listed twice keeps its first position and direction.
pub fn parse_sort(spec: &str) -> Vec<Sort> {
    let mut sorts: Vec<Sort> = Vec::new();
    for segment in spec.split(',') {
        let segment = segment.trim();
        let sort = match segment.strip_prefix('-') {
            Some(field) => Sort::desc(field.trim()),
            None => Sort::asc(segment),
        };
        if sort.field.is_empty() || sorts.iter().any(|s| s.field == sort.field) {
            continue;
        }
        sorts.push(sort);
    }
    sorts
}
