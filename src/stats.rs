use crate::models::{SeriesRow, group_by_country};
use serde::{Deserialize, Serialize};

/// Descriptive summary of one country's series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub country: String,
    pub count: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Value in `last_year`.
    pub latest: f64,
}

/// Summaries per country, in first-seen order.
pub fn summarize(rows: &[SeriesRow]) -> Vec<Summary> {
    group_by_country(rows)
        .into_iter()
        .filter_map(|(country, pts)| {
            let &(first_year, _) = pts.first()?;
            let &(last_year, latest) = pts.last()?;

            let mut vals: Vec<f64> = pts.iter().map(|(_, v)| *v).collect();
            vals.sort_by(f64::total_cmp);
            let count = vals.len();
            let mean = vals.iter().sum::<f64>() / count as f64;
            let median = if count % 2 == 1 {
                vals[count / 2]
            } else {
                (vals[count / 2 - 1] + vals[count / 2]) / 2.0
            };

            Some(Summary {
                country: country.to_string(),
                count,
                first_year,
                last_year,
                min: vals[0],
                max: vals[count - 1],
                mean,
                median,
                latest,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_per_country() {
        let rows = vec![
            SeriesRow::new("Ghana", 2003, 5.2),
            SeriesRow::new("Ghana", 2001, 4.0),
            SeriesRow::new("Ghana", 2002, 4.5),
            SeriesRow::new("Ghana", 2004, 5.6),
            SeriesRow::new("Chad", 2004, 33.6),
        ];
        let s = summarize(&rows);
        assert_eq!(s.len(), 2);

        let ghana = &s[0];
        assert_eq!(ghana.country, "Ghana");
        assert_eq!(ghana.count, 4);
        assert_eq!((ghana.first_year, ghana.last_year), (2001, 2004));
        assert_eq!((ghana.min, ghana.max), (4.0, 5.6));
        assert!((ghana.mean - 4.825).abs() < 1e-9);
        assert!((ghana.median - 4.85).abs() < 1e-9);
        assert_eq!(ghana.latest, 5.6);

        assert_eq!(s[1].median, 33.6);
    }

    #[test]
    fn no_rows_no_summaries() {
        assert!(summarize(&[]).is_empty());
    }
}
