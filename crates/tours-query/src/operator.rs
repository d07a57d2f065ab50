use serde::{Deserialize, Serialize};

/// Comparison operators accepted as a bracket suffix, e.g. `price[gte]=500`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Gte,
    Gt,
    Lte,
    Lt,
    Ne,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Gte,
        Operator::Gt,
        Operator::Lte,
        Operator::Lt,
        Operator::Ne,
    ];

    /// Look up an operator by its bracket key. Matching is exact and case-sensitive.
    pub fn from_key(key: &str) -> Option<Operator> {
        match key {
            "gte" => Some(Operator::Gte),
            "gt" => Some(Operator::Gt),
            "lte" => Some(Operator::Lte),
            "lt" => Some(Operator::Lt),
            "ne" => Some(Operator::Ne),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Operator::Gte => "gte",
            Operator::Gt => "gt",
            Operator::Lte => "lte",
            Operator::Lt => "lt",
            Operator::Ne => "ne",
        }
    }

    /// The MongoDB-style tag used when rendering a filter document.
    pub fn tag(self) -> &'static str {
        match self {
            Operator::Gte => "$gte",
            Operator::Gt => "$gt",
            Operator::Lte => "$lte",
            Operator::Lt => "$lt",
            Operator::Ne => "$ne",
        }
    }
}
