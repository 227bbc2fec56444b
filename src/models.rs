use crate::error::SelectionError;
use serde::{Deserialize, Serialize};

/// First year offered for selection.
pub const WINDOW_START: i32 = 1961;
/// Last year offered for selection.
pub const WINDOW_END: i32 = 2025;

/// Inclusive year range used to constrain a request (`date=start:end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Build a range inside the selectable window.
    pub fn new(start: i32, end: i32) -> Result<Self, SelectionError> {
        if start > end {
            return Err(SelectionError::InvertedRange { start, end });
        }
        if start < WINDOW_START || end > WINDOW_END {
            return Err(SelectionError::OutsideWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn to_query_param(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: 2001,
            end: 2022,
        }
    }
}

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// Raw record from the API (position 1 array). Only `date` is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub country: Option<CodeName>,
    pub date: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// One observation for one country. Rows are only built for records that
/// carry a value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRow {
    #[serde(rename = "Country")]
    pub country_name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Value")]
    pub value: f64,
}

impl SeriesRow {
    pub fn new(country_name: impl Into<String>, year: i32, value: f64) -> Self {
        Self {
            country_name: country_name.into(),
            year,
            value,
        }
    }
}

/// `(year, value)` points per country in first-seen order, each sorted by year.
pub fn group_by_country(rows: &[SeriesRow]) -> Vec<(&str, Vec<(i32, f64)>)> {
    let mut groups: Vec<(&str, Vec<(i32, f64)>)> = Vec::new();
    for r in rows.iter().filter(|r| r.value.is_finite()) {
        match groups.iter_mut().find(|(c, _)| *c == r.country_name) {
            Some((_, pts)) => pts.push((r.year, r.value)),
            None => groups.push((r.country_name.as_str(), vec![(r.year, r.value)])),
        }
    }
    for (_, pts) in &mut groups {
        pts.sort_by_key(|(y, _)| *y);
    }
    groups
}

/// The latest year with a finite value and that year's rows, one per country
/// in first-seen order. `None` when nothing is plottable.
pub fn latest_snapshot(rows: &[SeriesRow]) -> Option<(i32, Vec<&SeriesRow>)> {
    let latest = rows
        .iter()
        .filter(|r| r.value.is_finite())
        .map(|r| r.year)
        .max()?;
    let mut snap: Vec<&SeriesRow> = Vec::new();
    for r in rows.iter().filter(|r| r.year == latest && r.value.is_finite()) {
        if !snap.iter().any(|s| s.country_name == r.country_name) {
            snap.push(r);
        }
    }
    Some((latest, snap))
}

/// How rows of one series are ordered on return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Sort by year, oldest first.
    #[default]
    YearAscending,
    /// Keep the order the API sent (usually newest first).
    AsReturned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rejects_inverted_and_out_of_window() {
        assert_eq!(
            YearRange::new(2010, 2000),
            Err(SelectionError::InvertedRange {
                start: 2010,
                end: 2000
            })
        );
        assert!(matches!(
            YearRange::new(1950, 2000),
            Err(SelectionError::OutsideWindow { .. })
        ));
        assert!(matches!(
            YearRange::new(2000, 2030),
            Err(SelectionError::OutsideWindow { .. })
        ));
    }

    #[test]
    fn range_query_param_and_bounds() {
        let r = YearRange::new(2001, 2022).unwrap();
        assert_eq!(r.to_query_param(), "2001:2022");
        assert!(r.contains(2001));
        assert!(r.contains(2022));
        assert!(!r.contains(2023));
        assert_eq!(YearRange::default(), r);
    }

    #[test]
    fn row_serializes_with_display_headers() {
        let row = SeriesRow::new("Kenya", 2020, -0.3);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Country"], "Kenya");
        assert_eq!(json["Year"], 2020);
        assert_eq!(json["Value"], -0.3);
    }

    #[test]
    fn snapshot_takes_latest_finite_year_once_per_country() {
        let rows = vec![
            SeriesRow::new("South Africa", 2021, 4.9),
            SeriesRow::new("South Africa", 2022, 1.9),
            SeriesRow::new("Nigeria", 2021, 3.6),
            SeriesRow::new("Nigeria", 2023, f64::NAN),
            SeriesRow::new("South Africa", 2022, 2.0),
        ];
        let (year, snap) = latest_snapshot(&rows).unwrap();
        assert_eq!(year, 2022);
        assert_eq!(snap, vec![&rows[1]]);
        assert!(latest_snapshot(&[]).is_none());
    }

    #[test]
    fn grouping_keeps_first_seen_country_order() {
        let rows = vec![
            SeriesRow::new("Nigeria", 2002, 15.3),
            SeriesRow::new("Chile", 2001, 3.2),
            SeriesRow::new("Nigeria", 2001, 5.9),
            SeriesRow::new("Chile", 2002, f64::NAN),
        ];
        let g = group_by_country(&rows);
        assert_eq!(g[0], ("Nigeria", vec![(2001, 5.9), (2002, 15.3)]));
        assert_eq!(g[1], ("Chile", vec![(2001, 3.2)]));
    }
}
