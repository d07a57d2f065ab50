use std::cmp::Ordering;

use bson::{Bson, Document};
use tours_query::{FieldFilter, FilterSpec, Operator};

use crate::compare::{compare_values, values_equal};

/// Look up a dot-notation path such as `startLocation.address`.
pub(crate) fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(sub) => sub.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Evaluate whether a document satisfies every field constraint in `spec`.
pub(crate) fn matches(doc: &Document, spec: &FilterSpec) -> bool {
    spec.iter()
        .all(|(field, filter)| field_matches(get_path(doc, field), filter))
}

fn field_matches(value: Option<&Bson>, filter: &FieldFilter) -> bool {
    match filter {
        FieldFilter::Equals(query) => equals(value, query),
        FieldFilter::AnyOf(queries) => queries.iter().any(|query| equals(value, query)),
        FieldFilter::Compare(ops) => ops.iter().all(|(op, query)| compare(value, *op, query)),
    }
}

/// Equality: null matches missing fields, arrays match on any element.
fn equals(value: Option<&Bson>, query: &Bson) -> bool {
    match value {
        None => std::matches!(query, Bson::Null),
        Some(Bson::Array(arr)) => {
            std::matches!(query, Bson::Array(q) if q == arr)
                || arr.iter().any(|elem| values_equal(elem, query))
        }
        Some(v) => values_equal(v, query),
    }
}

fn compare(value: Option<&Bson>, op: Operator, query: &Bson) -> bool {
    // $ne: also true for missing fields and arrays without the value
    if op == Operator::Ne {
        return !equals(value, query);
    }

    let predicate: fn(Ordering) -> bool = match op {
        Operator::Gt => |o| o == Ordering::Greater,
        Operator::Gte => |o| o != Ordering::Less,
        Operator::Lt => |o| o == Ordering::Less,
        Operator::Lte => |o| o != Ordering::Greater,
        Operator::Ne => unreachable!(),
    };
    let holds = |v: &Bson| compare_values(v, query).is_some_and(predicate);

    match value {
        Some(Bson::Array(arr)) => arr.iter().any(holds),
        Some(v) => holds(v),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn tour() -> Document {
        doc! {
            "name": "The Forest Hiker",
            "price": 397_i32,
            "ratingsAverage": 4.7,
            "difficulty": "easy",
            "secretTour": false,
            "tags": ["forest", "hiking"],
            "startLocation": { "address": "Banff, CAN" },
        }
    }

    fn spec(field: &str, filter: FieldFilter) -> FilterSpec {
        FilterSpec::new().with(field, filter)
    }

    #[test]
    fn empty_spec_matches_everything() {
        assert!(matches(&tour(), &FilterSpec::new()));
    }

    #[test]
    fn equality() {
        assert!(matches(&tour(), &spec("difficulty", FieldFilter::Equals("easy".into()))));
        assert!(!matches(&tour(), &spec("difficulty", FieldFilter::Equals("medium".into()))));
        assert!(matches(&tour(), &spec("price", FieldFilter::Equals(Bson::Int64(397)))));
    }

    #[test]
    fn equality_against_array_elements() {
        assert!(matches(&tour(), &spec("tags", FieldFilter::Equals("hiking".into()))));
        assert!(!matches(&tour(), &spec("tags", FieldFilter::Equals("sea".into()))));
    }

    #[test]
    fn null_matches_missing() {
        assert!(matches(&tour(), &spec("priceDiscount", FieldFilter::Equals(Bson::Null))));
        assert!(!matches(&tour(), &spec("priceDiscount", FieldFilter::Equals(Bson::Int64(0)))));
    }

    #[test]
    fn any_of() {
        let filter = FieldFilter::AnyOf(vec!["medium".into(), "easy".into()]);
        assert!(matches(&tour(), &spec("difficulty", filter)));
    }

    #[test]
    fn ranges() {
        assert!(matches(&tour(), &spec("price", FieldFilter::compare(Operator::Gte, 397_i64))));
        assert!(!matches(&tour(), &spec("price", FieldFilter::compare(Operator::Gt, 397_i64))));
        assert!(matches(&tour(), &spec("ratingsAverage", FieldFilter::compare(Operator::Lt, 5_i64))));
        assert!(matches(&tour(), &spec("price", FieldFilter::compare(Operator::Lte, 397.0))));
    }

    #[test]
    fn ranges_never_match_missing_fields() {
        assert!(!matches(&tour(), &spec("duration", FieldFilter::compare(Operator::Gte, 0_i64))));
    }

    #[test]
    fn not_equal_matches_missing_and_different() {
        assert!(matches(&tour(), &spec("secretTour", FieldFilter::compare(Operator::Ne, true))));
        assert!(matches(&tour(), &spec("hidden", FieldFilter::compare(Operator::Ne, true))));
        assert!(!matches(&tour(), &spec("difficulty", FieldFilter::compare(Operator::Ne, "easy"))));
    }

    #[test]
    fn dotted_paths() {
        let filter = FieldFilter::Equals("Banff, CAN".into());
        assert!(matches(&tour(), &spec("startLocation.address", filter)));
        assert_eq!(get_path(&tour(), "name.first"), None);
    }
}
