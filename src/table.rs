//! Plain-text tabular view of aggregated rows.

use crate::models::SeriesRow;
use crate::viz::util::map_locale;
use num_format::ToFormattedString;

/// Format a value with locale thousands separators and two decimals.
pub fn format_value(v: f64, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let cents = (v.abs() * 100.0).round() as u64;
    let int_part = (cents / 100).to_formatted_string(locale);
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{int_part}{dec_sep}{:02}", cents % 100)
}

/// Render rows as an aligned table with a `Country | Year | Value` header.
pub fn render(rows: &[SeriesRow], locale_tag: &str) -> String {
    let cells: Vec<(String, String, String)> = rows
        .iter()
        .map(|r| {
            (
                r.country_name.clone(),
                r.year.to_string(),
                format_value(r.value, locale_tag),
            )
        })
        .collect();

    let w0 = cells.iter().map(|c| c.0.chars().count()).chain([7]).max().unwrap_or(7);
    let w1 = 4;
    let w2 = cells.iter().map(|c| c.2.chars().count()).chain([5]).max().unwrap_or(5);

    let mut out = String::new();
    out.push_str(&format!("{:<w0$}  {:>w1$}  {:>w2$}\n", "Country", "Year", "Value"));
    out.push_str(&format!("{}  {}  {}\n", "-".repeat(w0), "-".repeat(w1), "-".repeat(w2)));
    for (c, y, v) in &cells {
        out.push_str(&format!("{c:<w0$}  {y:>w1$}  {v:>w2$}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_use_locale_separators() {
        assert_eq!(format_value(1_234_567.891, "en"), "1,234,567.89");
        assert_eq!(format_value(1_234_567.891, "de"), "1.234.567,89");
        assert_eq!(format_value(-0.5, "en"), "-0.50");
        assert_eq!(format_value(-0.001, "en"), "0.00");
        assert_eq!(format_value(f64::NAN, "en"), "NA");
    }

    #[test]
    fn table_is_aligned() {
        let rows = vec![
            SeriesRow::new("Nigeria", 2021, 3.6),
            SeriesRow::new("South Africa", 2021, 4.9),
        ];
        let t = render(&rows, "en");
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Country"));
        assert!(lines[3].starts_with("South Africa  2021"));
        assert!(lines.iter().skip(1).all(|l| l.len() == lines[1].len()));
    }
}
