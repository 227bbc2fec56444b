use crate::models::SeriesRow;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header of every CSV export.
pub const CSV_HEADER: [&str; 3] = ["Country", "Year", "Value"];

/// Neutralise cells a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Write rows as CSV (`Country,Year,Value`) to any writer.
pub fn write_csv<W: Write>(rows: &[SeriesRow], out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for r in rows {
        wtr.serialize((safe_cell(&r.country_name), r.year, r.value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV export into an in-memory buffer.
pub fn csv_bytes(rows: &[SeriesRow]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

/// Save rows as CSV with header.
pub fn save_csv<P: AsRef<Path>>(rows: &[SeriesRow], path: P) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(rows, f)
}

/// Save rows as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[SeriesRow], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![SeriesRow::new("Germany", 2000, 1.23)];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        assert_eq!(
            std::fs::read_to_string(&csvp).unwrap(),
            "Country,Year,Value\nGermany,2000,1.23\n"
        );
        assert!(jsonp.exists());
    }

    #[test]
    fn formula_starters_are_quoted() {
        assert_eq!(safe_cell("=1+1"), "'=1+1");
        assert_eq!(safe_cell("-x"), "'-x");
        assert_eq!(safe_cell("Chile"), "Chile");
        assert_eq!(safe_cell(""), "");
    }
}
