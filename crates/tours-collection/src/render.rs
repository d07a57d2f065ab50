//! JSON rendering of stored tours.
//!
//! Response bodies carry plain JSON rather than BSON extended JSON: dates
//! become RFC 3339 strings, object ids their hex form and non-finite
//! doubles `null`.

use bson::{Bson, Document};
use serde_json::{Map, Number, Value};

/// Render a tour, appending the `durationInWeeks` virtual when `duration`
/// is a number.
pub fn render_tour(doc: &Document) -> Value {
    let weeks = doc.get("duration").and_then(duration_in_weeks);
    let mut map = render_document(doc);
    if let Some(weeks) = weeks {
        map.insert("durationInWeeks".into(), weeks);
    }
    Value::Object(map)
}

fn duration_in_weeks(duration: &Bson) -> Option<Value> {
    let days = match duration {
        Bson::Int32(n) => f64::from(*n),
        Bson::Int64(n) => *n as f64,
        Bson::Double(f) => *f,
        _ => return None,
    };
    Some(float(days / 7.0))
}

fn render_document(doc: &Document) -> Map<String, Value> {
    doc.iter()
        .map(|(key, value)| (key.clone(), render_value(value)))
        .collect()
}

fn render_value(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(n) => Value::from(*n),
        Bson::Int64(n) => Value::from(*n),
        Bson::Double(f) => float(*f),
        Bson::String(s) => Value::String(s.clone()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Array(items) => Value::Array(items.iter().map(render_value).collect()),
        Bson::Document(doc) => Value::Object(render_document(doc)),
        other => other.clone().into_relaxed_extjson(),
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}
