use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which fields a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    All,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

/// Parse a comma-separated field list such as `name,price`.
///
/// Plain names form an inclusion list; a list made only of `-name` entries
/// is an exclusion list. Returns `Projection::All` when no names remain
/// after trimming.
pub fn parse_projection(spec: &str) -> Result<Projection, ValidationError> {
    let mut included: Vec<String> = Vec::new();
    let mut excluded: Vec<String> = Vec::new();

    for segment in spec.split(',') {
        let segment = segment.trim();
        let (field, list) = match segment.strip_prefix('-') {
            Some(field) => (field.trim(), &mut excluded),
            None => (segment, &mut included),
        };
        if field.is_empty() || list.iter().any(|f| f == field) {
            continue;
        }
        list.push(field.to_string());
    }

    match (included.is_empty(), excluded.is_empty()) {
        (true, true) => Ok(Projection::All),
        (false, true) => Ok(Projection::Include(included)),
        (true, false) => Ok(Projection::Exclude(excluded)),
        (false, false) => Err(ValidationError::MixedProjection {
            field: excluded.swap_remove(0),
        }),
    }
}
