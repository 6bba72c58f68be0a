//! Quantity scaling and display formatting.
//!
//! `scale_quantities` rewrites every numeric token inside an ingredient line
//! by a scaling factor; `format_quantity` turns an already-materialized
//! decimal quantity into a human fraction string at render time.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Unified numeric-token grammar: plain number, optional `/b` fraction tail,
/// optional `-b` or `to b` range tail.
static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(?:\s*/\s*\d+(?:\.\d+)?)?(?:\s*-\s*\d+(?:\.\d+)?)?(?:\s*to\s*\d+(?:\.\d+)?)?")
        .expect("numeric token regex")
});

static RANGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:-|to)\s*").expect("range separator regex"));

/// Scale every numeric token in `text` by `factor`.
///
/// A factor of 1 still passes tokens through the formatting step, so "4"
/// becomes "4.00". Callers that want unscaled output should not call this at
/// all (the normalizer short-circuits that path).
pub fn scale_quantities(text: &str, factor: f64) -> String {
    NUMERIC_TOKEN
        .replace_all(text, |caps: &Captures| scale_token(&caps[0], factor))
        .into_owned()
}

fn scale_token(token: &str, factor: f64) -> String {
    // Fraction detection takes precedence over range detection when a token
    // contains both separators.
    if token.contains('/') {
        let mut parts = token.splitn(2, '/');
        let num = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
        let denom = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
        return match (num, denom) {
            // Denominator of zero fails closed: keep the original text rather
            // than propagating infinity into the output.
            (Some(_), Some(d)) if d == 0.0 => token.to_string(),
            (Some(n), Some(d)) => format!("{:.2}", n / d * factor),
            _ => token.to_string(),
        };
    }

    if token.contains('-') || token.contains("to") {
        let bounds: Vec<Option<f64>> = RANGE_SEPARATOR
            .split(token)
            .map(|p| p.trim().parse::<f64>().ok())
            .collect();
        if let [Some(min), Some(max)] = bounds.as_slice()[..] {
            return format!("{:.2}-{:.2}", min * factor, max * factor);
        }
        return token.to_string();
    }

    match token.trim().parse::<f64>() {
        Ok(n) => format!("{:.2}", n * factor),
        Err(_) => token.to_string(),
    }
}

/// Common fractional parts recognized by the display formatter, with a small
/// tolerance for values that went through decimal rounding.
const DISPLAY_FRACTIONS: &[(f64, &str)] = &[
    (0.125, "1/8"),
    (0.25, "1/4"),
    (0.33, "1/3"),
    (0.375, "3/8"),
    (0.5, "1/2"),
    (0.625, "5/8"),
    (0.67, "2/3"),
    (0.75, "3/4"),
    (0.875, "7/8"),
];

/// Format a scaled quantity for display: common fractions render as fraction
/// strings ("1/2", "3/4"), values above one as mixed numbers ("1 1/2"), whole
/// numbers bare, and anything else rounded to one decimal place.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.is_nan() || quantity.is_infinite() {
        return String::from("0");
    }

    let whole = quantity.floor();
    let frac = quantity - whole;

    if frac.abs() < 0.01 {
        return format!("{}", whole as i64);
    }
    if frac > 0.99 {
        return format!("{}", whole as i64 + 1);
    }

    for (value, label) in DISPLAY_FRACTIONS {
        if (frac - value).abs() < 0.01 {
            return if whole >= 1.0 {
                format!("{} {}", whole as i64, label)
            } else {
                (*label).to_string()
            };
        }
    }

    format!("{:.1}", quantity)
}
