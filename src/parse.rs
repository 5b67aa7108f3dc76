//! Lenient numeric parsing for community-curated reference data.
//!
//! Every change or cost value entering the planner goes through this seam.
//! Values arrive as numbers or as strings like `"+10%"` or `"-3"`; anything
//! unparseable becomes 0.0 rather than an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn lenient_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let sanitized = s.trim().trim_end_matches('%').trim();
            sanitized.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// serde adapter so records hold plain `f64` change/cost fields.
pub fn lenient_change<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(lenient_f64(&raw))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::lenient_f64;

    #[test]
    fn parses_signed_percent_strings() {
        assert_eq!(lenient_f64(&json!("+10%")), 10.0);
        assert_eq!(lenient_f64(&json!("-3")), -3.0);
        assert_eq!(lenient_f64(&json!("  7.5 % ")), 7.5);
    }

    #[test]
    fn passes_numbers_through() {
        assert_eq!(lenient_f64(&json!(5)), 5.0);
        assert_eq!(lenient_f64(&json!(-0.25)), -0.25);
    }

    #[test]
    fn defaults_to_zero_on_junk() {
        assert_eq!(lenient_f64(&json!("substantial")), 0.0);
        assert_eq!(lenient_f64(&json!(null)), 0.0);
        assert_eq!(lenient_f64(&json!(true)), 0.0);
        assert_eq!(lenient_f64(&json!(["10"])), 0.0);
    }
}
