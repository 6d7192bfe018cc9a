//! Difficulty normalization. Catalogs mix numeric levels and labels; scoring
//! only ever sees 1 (beginner), 2 (core) or 3 (challenge).

use serde_json::Value;

pub const EASIEST: u8 = 1;
pub const HARDEST: u8 = 3;

/// Maps any raw difficulty value onto 1..=3. Never fails: anything it cannot
/// read becomes the easiest level.
pub fn parse_difficulty(raw: &Value) -> u8 {
    match raw {
        Value::Number(n) => n.as_f64().map(from_number).unwrap_or(EASIEST),
        Value::String(s) => from_label(s),
        _ => EASIEST,
    }
}

/// Truncates toward zero, then clamps into range.
pub fn from_number(raw: f64) -> u8 {
    if !raw.is_finite() {
        return EASIEST;
    }
    (raw.trunc() as i64).clamp(EASIEST as i64, HARDEST as i64) as u8
}

pub fn from_label(label: &str) -> u8 {
    match label.trim().to_lowercase().as_str() {
        "beginner" | "easy" | "low" => 1,
        "core" | "medium" | "moderate" | "normal" => 2,
        "challenge" | "challenging" | "hard" | "difficult" => 3,
        _ => EASIEST,
    }
}
