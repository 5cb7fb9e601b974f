//! Heuristic properties inferred after parsing.
//!
//! None of these can fail. A missing or wrong guess is an accepted outcome.

use std::sync::OnceLock;

use lux_math::Interval;
use regex::Regex;

use super::types::LuminaireType;

/// Width/length ratios classified as a spot.
const SPOT_ASPECT: Interval = Interval::new(0.85, 1.15);

static RE_COLOR_TEMPERATURE_LOCK: OnceLock<Regex> = OnceLock::new();
fn color_temperature_regex() -> &'static Regex {
    // 3-5 digits not preceded by a digit, optional whitespace, then K.
    // The trailing boundary is ASCII-only so a non-ASCII letter ends the word.
    RE_COLOR_TEMPERATURE_LOCK.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[^0-9])([0-9]{3,5})\s*K(?-u:\b)").expect("valid color temperature pattern")
    })
}

/// First kelvin-like value anywhere in the document text.
pub fn color_temperature(content: &str) -> Option<u32> {
    color_temperature_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Spot when the opening is roughly square, panel otherwise.
pub fn luminaire_type(width: f64, length: f64) -> LuminaireType {
    if length != 0.0 && SPOT_ASPECT.contains(width / length) {
        LuminaireType::Spot
    } else {
        LuminaireType::Panel
    }
}

/// Largest matrix value, 0.0 for an empty matrix.
pub fn peak_value(matrix: &[Vec<f64>]) -> f64 {
    matrix
        .iter()
        .flatten()
        .copied()
        .fold(None, |peak: Option<f64>, value| {
            Some(peak.map_or(value, |p| p.max(value)))
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_temperature_from_keyword_text() {
        let text = "IESNA:LM-63-2002\n[LAMP] LED 3000K CRI80\nTILT=NONE\n";
        assert_eq!(color_temperature(text), Some(3000));
    }

    #[test]
    fn test_color_temperature_variants() {
        assert_eq!(color_temperature("CCT 4000 K"), Some(4000));
        assert_eq!(color_temperature("warm 2700k white"), Some(2700));
        assert_eq!(color_temperature("6500K"), Some(6500));
        assert_eq!(color_temperature("first 2700K then 4000K"), Some(2700));
        assert_eq!(color_temperature("LED 3000K\u{b5}"), Some(3000));
        assert_eq!(color_temperature("3500K\u{e9}clairage"), Some(3500));
    }

    #[test]
    fn test_color_temperature_rejects_non_matches() {
        // Too few digits
        assert_eq!(color_temperature("50K"), None);
        // Six digits
        assert_eq!(color_temperature("123456K"), None);
        // K must end a word
        assert_eq!(color_temperature("3000 Kelvin"), None);
        assert_eq!(color_temperature("no temperature here"), None);
    }

    #[test]
    fn test_luminaire_type() {
        assert_eq!(luminaire_type(1.0, 1.0), LuminaireType::Spot);
        assert_eq!(luminaire_type(1.0, 2.0), LuminaireType::Panel);
        assert_eq!(luminaire_type(1.0, 1.1), LuminaireType::Spot);
        assert_eq!(luminaire_type(0.0, 0.0), LuminaireType::Panel);
        assert_eq!(luminaire_type(1.0, 0.0), LuminaireType::Panel);
    }

    #[test]
    fn test_peak_value() {
        let matrix = vec![vec![10.0, 20.0], vec![35.5, 0.0]];
        assert_eq!(peak_value(&matrix), 35.5);
        assert_eq!(peak_value(&[]), 0.0);
    }
}
