use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::PrintSize;

/// Named print sizes in centimetres, smallest first.
pub const PRESETS: [(&str, f32, f32); 7] = [
    ("5x7", 5.0, 7.0),
    ("7.5x10", 7.5, 10.0),
    ("8x10", 8.0, 10.0),
    ("9x11", 9.0, 11.0),
    ("10x10", 10.0, 10.0),
    ("10x15", 10.0, 15.0),
    ("15x20", 15.0, 20.0),
];

pub const DEFAULT_PRESET: &str = "10x15";

static SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:[.,]\d+)?)\s*[xX×*]\s*(\d+(?:[.,]\d+)?)\s*(?:cm)?\s*$")
        .expect("size pattern is valid")
});

pub fn preset_dimensions(name: &str) -> Option<(f32, f32)> {
    PRESETS
        .iter()
        .find(|(preset, _, _)| *preset == name)
        .map(|(_, w, h)| (*w, *h))
}

pub fn is_preset(name: &str) -> bool {
    preset_dimensions(name).is_some()
}

/// Parses `"10x15"`-style input. Known preset names win over custom sizes so
/// that typing a preset keeps the named variant.
pub fn parse_print_size(input: &str) -> Option<PrintSize> {
    let trimmed = input.trim();
    if is_preset(trimmed) {
        return Some(PrintSize::Preset(trimmed.to_string()));
    }
    let caps = SIZE_RE.captures(trimmed)?;
    let width_cm = parse_number(caps.get(1)?.as_str())?;
    let height_cm = parse_number(caps.get(2)?.as_str())?;
    if width_cm <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let size = PrintSize::Custom {
        width_cm,
        height_cm,
    };
    // "10x15cm" should still resolve to the preset.
    Some(match find_preset_for(width_cm, height_cm) {
        Some(name) => PrintSize::Preset(name.to_string()),
        None => size,
    })
}

/// Parses `"<w>x<h>"` as a raw pair, used for album and screen dimensions.
pub fn parse_dimensions(input: &str) -> Option<(f32, f32)> {
    let caps = SIZE_RE.captures(input)?;
    let w = parse_number(caps.get(1)?.as_str())?;
    let h = parse_number(caps.get(2)?.as_str())?;
    Some((w, h))
}

fn find_preset_for(width_cm: f32, height_cm: f32) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(_, w, h)| (*w - width_cm).abs() < 1e-3 && (*h - height_cm).abs() < 1e-3)
        .map(|(name, _, _)| *name)
}

fn parse_number(raw: &str) -> Option<f32> {
    raw.replace(',', ".").parse::<f32>().ok().filter(|v| v.is_finite())
}
