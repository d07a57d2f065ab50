use bson::Bson;

/// Coerce a raw query-string value into a typed BSON value.
///
/// Integers become `Int64`, plain decimals `Double`, `true`/`false` booleans.
/// Anything else (including `NaN`, `inf` and exponent forms) stays a string.
pub fn coerce(raw: &str) -> Bson {
    if let Ok(n) = raw.parse::<i64>() {
        return Bson::Int64(n);
    }
    if is_plain_decimal(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            return Bson::Double(f);
        }
    }
    match raw {
        "true" => Bson::Boolean(true),
        "false" => Bson::Boolean(false),
        _ => Bson::String(raw.to_string()),
    }
}

fn is_plain_decimal(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let mut dots = 0;
    let mut has_digit = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => has_digit = true,
            '.' => dots += 1,
            _ => return false,
        }
    }
    has_digit && dots == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(coerce("500"), Bson::Int64(500));
        assert_eq!(coerce("-3"), Bson::Int64(-3));
    }

    #[test]
    fn decimals() {
        assert_eq!(coerce("4.5"), Bson::Double(4.5));
        assert_eq!(coerce("-0.25"), Bson::Double(-0.25));
        assert_eq!(coerce(".5"), Bson::Double(0.5));
    }

    #[test]
    fn booleans() {
        assert_eq!(coerce("true"), Bson::Boolean(true));
        assert_eq!(coerce("false"), Bson::Boolean(false));
        assert_eq!(coerce("True"), Bson::String("True".into()));
    }

    #[test]
    fn everything_else_is_a_string() {
        for raw in ["easy", "1e3", "NaN", "inf", "1.2.3", "", "-", "."] {
            assert_eq!(coerce(raw), Bson::String(raw.into()), "{raw}");
        }
    }
}
