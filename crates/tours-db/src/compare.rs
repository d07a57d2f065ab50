use std::cmp::Ordering;

use bson::Bson;

enum Number {
    Int(i64),
    Float(f64),
}

fn number(value: &Bson) -> Option<Number> {
    match value {
        Bson::Int32(n) => Some(Number::Int(*n as i64)),
        Bson::Int64(n) => Some(Number::Int(*n)),
        Bson::Double(f) => Some(Number::Float(*f)),
        _ => None,
    }
}

fn numeric_string(s: &str) -> Option<Number> {
    if let Ok(n) = s.trim().parse::<i64>() {
        return Some(Number::Int(n));
    }
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

impl Number {
    fn is_nan(&self) -> bool {
        matches!(self, Number::Float(f) if f.is_nan())
    }
}

/// `None` only when a NaN is involved.
fn cmp_numbers(a: Number, b: Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
        (Number::Int(a), Number::Float(b)) => cmp_int_float(a, b),
        (Number::Float(a), Number::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
        (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
    }
}

/// Exact comparison of an integer with a float. Casting the integer to
/// `f64` would round above 2^53 and break transitivity.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    let by_whole = i.cmp(&(whole as i64));
    let by_fraction = 0.0_f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal);
    Some(by_whole.then(by_fraction))
}

/// Numbers in sort order: NaN below every other number, `-0.0 == 0`.
fn sort_numbers(a: Number, b: Number) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => cmp_numbers(a, b).unwrap_or(Ordering::Equal),
    }
}

/// Integer query values against dates: 0..=9999 is January 1st of that
/// year, values outside the year range -271820..275761 are epoch
/// milliseconds. Other years are not representable.
fn integer_as_date(n: i64) -> Option<bson::DateTime> {
    if (0..=9999).contains(&n) {
        bson::DateTime::parse_rfc3339_str(format!("{n:04}-01-01T00:00:00Z")).ok()
    } else if (-271_820..275_761).contains(&n) {
        None
    } else {
        Some(bson::DateTime::from_millis(n))
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_date(s: &str) -> Option<bson::DateTime> {
    bson::DateTime::parse_rfc3339_str(s)
        .or_else(|_| bson::DateTime::parse_rfc3339_str(format!("{s}T00:00:00Z")))
        .ok()
}

/// Order a stored value against a query value.
///
/// Returns `None` when the two types cannot be compared; such pairs never
/// satisfy an equality or range condition.
pub(crate) fn compare_values(stored: &Bson, query: &Bson) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (number(stored), number(query)) {
        return cmp_numbers(a, b);
    }

    match (stored, query) {
        (Bson::String(a), Bson::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),

        // ── Cross-type coercion ─────────────────────────────────
        (Bson::String(s), q) => cmp_numbers(numeric_string(s)?, number(q)?),
        (Bson::DateTime(a), Bson::String(s)) => Some(a.cmp(&parse_date(s)?)),
        (Bson::DateTime(a), q) => match number(q)? {
            Number::Int(n) => Some(a.cmp(&integer_as_date(n)?)),
            Number::Float(_) => None,
        },

        _ => None,
    }
}

pub(crate) fn values_equal(stored: &Bson, query: &Bson) -> bool {
    stored == query || compare_values(stored, query) == Some(Ordering::Equal)
}

fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::Boolean(_)) => 5,
        Some(Bson::DateTime(_)) => 6,
        Some(_) => 7,
    }
}

/// Total order used for sorting: missing and null first, then numbers,
/// strings, documents, arrays, booleans, dates.
pub(crate) fn sort_order(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let by_type = type_rank(a).cmp(&type_rank(b));
    if by_type != Ordering::Equal {
        return by_type;
    }
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };
    if let (Some(x), Some(y)) = (number(a), number(b)) {
        return sort_numbers(x, y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
