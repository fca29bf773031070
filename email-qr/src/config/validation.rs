//! Setting value validation and parsing.

use std::sync::LazyLock;

use image::Rgb;
use image_engine::{EcLevel, MAX_BORDER, MAX_MODULE_SIZE};
use regex::Regex;

static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "RECIPIENT" => {
            mailto_link::validate_recipient(value).map_err(|e| e.to_string())?;
        }
        "EC_LEVEL" => {
            parse_ec_level(value)?;
        }
        "MIN_VERSION" => validate_int_range(value, 1, 40)?,
        "MODULE_SIZE" => validate_int_range(value, 1, MAX_MODULE_SIZE as i32)?,
        "BORDER" => validate_int_range(value, 0, MAX_BORDER as i32)?,
        "FILL_COLOR" | "BACK_COLOR" => {
            parse_color(value)?;
        }
        "LOGO_RATIO" => {
            let v: f32 = value.parse().map_err(|_| "must be a float")?;
            if !(v > 0.0 && v <= crate::composer::MAX_LOGO_RATIO) {
                return Err(format!(
                    "must be greater than 0 and at most {}",
                    crate::composer::MAX_LOGO_RATIO
                ));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse an error correction level name (`low`, `medium`, `quartile`, `high`
/// or the single-letter forms).
pub fn parse_ec_level(value: &str) -> Result<EcLevel, String> {
    match value.to_ascii_lowercase().as_str() {
        "l" | "low" => Ok(EcLevel::L),
        "m" | "medium" => Ok(EcLevel::M),
        "q" | "quartile" => Ok(EcLevel::Q),
        "h" | "high" => Ok(EcLevel::H),
        _ => Err("must be one of low, medium, quartile, high".into()),
    }
}

/// Parse `#rrggbb` / `rrggbb` or a basic color name.
pub fn parse_color(value: &str) -> Result<Rgb<u8>, String> {
    let named = match value.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        "blue" => Some([0, 0, 255]),
        "navy" => Some([0, 0, 128]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        _ => None,
    };
    if let Some(rgb) = named {
        return Ok(Rgb(rgb));
    }

    let caps = RE_HEX_COLOR
        .captures(value)
        .ok_or_else(|| format!("invalid color '{value}' (expected #rrggbb or a color name)"))?;
    let channel = |i: usize| u8::from_str_radix(&caps[i], 16).map_err(|e| e.to_string());
    Ok(Rgb([channel(1)?, channel(2)?, channel(3)?]))
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_colors() {
        assert_eq!(parse_color("#0000ff").unwrap(), Rgb([0, 0, 255]));
        assert_eq!(parse_color("FFA500").unwrap(), Rgb([255, 165, 0]));
        assert_eq!(parse_color("Blue").unwrap(), Rgb([0, 0, 255]));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#GG0000").is_err());
        assert!(parse_color("purple-ish").is_err());
    }

    #[test]
    fn test_ec_levels() {
        assert_eq!(parse_ec_level("H").unwrap(), EcLevel::H);
        assert_eq!(parse_ec_level("quartile").unwrap(), EcLevel::Q);
        assert_eq!(parse_ec_level("low").unwrap(), EcLevel::L);
        assert!(parse_ec_level("max").is_err());
    }

    #[test]
    fn test_valid_ranges() {
        assert!(validate_setting("MIN_VERSION", "6").is_ok());
        assert!(validate_setting("MIN_VERSION", "0").is_err());
        assert!(validate_setting("MIN_VERSION", "41").is_err());
        assert!(validate_setting("MODULE_SIZE", "0").is_err());
        assert!(validate_setting("BORDER", "0").is_ok());
        assert!(validate_setting("BORDER", "four").is_err());
    }

    #[test]
    fn test_valid_logo_ratio() {
        assert!(validate_setting("LOGO_RATIO", "0.25").is_ok());
        assert!(validate_setting("LOGO_RATIO", "0.3").is_ok());
        assert!(validate_setting("LOGO_RATIO", "0.33").is_err());
        assert!(validate_setting("LOGO_RATIO", "0").is_err());
        assert!(validate_setting("LOGO_RATIO", "NaN").is_err());
    }

    #[test]
    fn test_valid_recipient() {
        assert!(validate_setting("RECIPIENT", "etude@example.com").is_ok());
        assert!(validate_setting("RECIPIENT", "").is_err());
    }
}
