use std::collections::BTreeMap;
use std::collections::btree_map;

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::operator::Operator;

/// Constraint on a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFilter {
    Equals(Bson),
    /// Matches when the field equals any of the values.
    AnyOf(Vec<Bson>),
    /// All operators must hold.
    Compare(BTreeMap<Operator, Bson>),
}

impl FieldFilter {
    pub fn compare(op: Operator, value: impl Into<Bson>) -> Self {
        FieldFilter::Compare(BTreeMap::from([(op, value.into())]))
    }

    fn to_bson(&self) -> Bson {
        match self {
            FieldFilter::Equals(value) => value.clone(),
            FieldFilter::AnyOf(values) => {
                let mut doc = Document::new();
                doc.insert("$in", Bson::Array(values.clone()));
                Bson::Document(doc)
            }
            FieldFilter::Compare(ops) => {
                let mut doc = Document::new();
                for (op, value) in ops {
                    doc.insert(op.tag(), value.clone());
                }
                Bson::Document(doc)
            }
        }
    }
}

/// Field constraints of one query, implicitly ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(BTreeMap<String, FieldFilter>);

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, filter: FieldFilter) -> Option<FieldFilter> {
        self.0.insert(field.into(), filter)
    }

    pub fn with(mut self, field: impl Into<String>, filter: FieldFilter) -> Self {
        self.insert(field, filter);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldFilter> {
        self.0.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldFilter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a MongoDB filter document, e.g. `{ "price": { "$gte": 500 } }`.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (field, filter) in &self.0 {
            doc.insert(field.clone(), filter.to_bson());
        }
        doc
    }
}

impl<'a> IntoIterator for &'a FilterSpec {
    type Item = (&'a String, &'a FieldFilter);
    type IntoIter = btree_map::Iter<'a, String, FieldFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldFilter)> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = (String, FieldFilter)>>(iter: I) -> Self {
        FilterSpec(iter.into_iter().collect())
    }
}
