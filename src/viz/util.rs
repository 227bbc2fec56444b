//! Colors, axis scaling, locale mapping and unit detection.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Color for the `idx`-th series; wraps after ten.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Pick a single Y-axis scale and its word based on the overall magnitude,
/// e.g. `(1e6, "millions")`.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Unit in the last parenthesis of a label: `"GDP (current US$)"` -> `"current US$"`.
pub fn extract_unit_from_indicator_name(name: &str) -> Option<String> {
    let open = name.rfind('(')?;
    let close = name.rfind(')')?;
    if close <= open {
        return None;
    }
    let inner = name[open + 1..close].trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Percent-like units are never scaled to thousands/millions.
pub fn is_percentage_like(unit: &str) -> bool {
    let u = unit.to_ascii_lowercase();
    u.contains('%') || u.contains("percent") || u.contains("per cent")
}

/// Y-axis divisor and title for an indicator whose largest magnitude is `max_abs`.
pub fn y_axis_scale(indicator_label: &str, max_abs: f64) -> (f64, String) {
    let unit = extract_unit_from_indicator_name(indicator_label);
    let (scale, word) = match unit.as_deref() {
        Some(u) if is_percentage_like(u) => (1.0, ""),
        _ => choose_axis_scale(max_abs),
    };
    let title = match (unit.as_deref(), word) {
        (Some(u), "") => u.to_string(),
        (Some(u), w) => format!("{u} ({w})"),
        (None, "") => "Value".to_string(),
        (None, w) => format!("Value ({w})"),
    };
    (scale, title)
}

/// Map a locale tag to a `num_format::Locale` and its decimal separator.
///
/// Supported tags (case-insensitive): `en`, `de`, `fr`, `es`, `it`, `pt`, `nl`
/// and their `_XX` variants. Anything else is English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Tick label for an already scaled value: grouped digits from 1000 up,
/// otherwise up to two decimals with the locale's separator.
pub fn format_tick(v: f64, locale: &Locale, dec_sep: char) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        let sign = if v < 0.0 { "-" } else { "" };
        return format!("{sign}{}", (a.round() as u64).to_formatted_string(locale));
    }
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    let s = format!("{v:.prec$}");
    if dec_sep == '.' { s } else { s.replace('.', &dec_sep.to_string()) }
}

/// Width of the Y label area in pixels, measured from the tick labels that
/// `fmt` will produce over `lo..hi`.
pub fn compute_left_label_area_px(
    lo: f64,
    hi: f64,
    ticks: usize,
    font_px: u32,
    fmt: &dyn Fn(f64) -> String,
) -> u32 {
    let widest = (0..=ticks)
        .map(|i| {
            let t = if ticks == 0 { 0.0 } else { i as f64 / ticks as f64 };
            estimate_text_width_px(&fmt(lo + (hi - lo) * t), font_px)
        })
        .max()
        .unwrap_or(0);
    // tick marks plus axis description
    widest.saturating_add(30).clamp(48, 150)
}
