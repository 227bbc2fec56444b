//! Selection validation and per-country aggregation.
//!
//! A [`Selection`] is resolved against the registry up front, so loading can
//! only fail per country. Failures are collected next to the rows instead of
//! aborting the whole load.

use crate::api::Client;
use crate::error::{FetchError, RegistryError, SelectionError};
use crate::models::{SeriesRow, YearRange};
use crate::registry;
use log::{info, warn};
use std::collections::BTreeMap;

/// Anything that can produce one country's series. [`Client`] is the real one.
pub trait SeriesSource {
    fn fetch_series(
        &self,
        country_code: &str,
        indicator_code: &str,
        range: Option<YearRange>,
    ) -> Result<Vec<SeriesRow>, FetchError>;
}

impl SeriesSource for Client {
    fn fetch_series(
        &self,
        country_code: &str,
        indicator_code: &str,
        range: Option<YearRange>,
    ) -> Result<Vec<SeriesRow>, FetchError> {
        self.try_fetch(country_code, indicator_code, range)
    }
}

/// A validated user choice: countries (by display name), one indicator, years.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    countries: Vec<(&'static str, &'static str)>,
    indicator_label: &'static str,
    indicator_code: &'static str,
    range: YearRange,
}

impl Selection {
    /// Resolve names against the registry. Duplicates keep their first position.
    pub fn new<S: AsRef<str>>(
        countries: &[S],
        indicator_label: &str,
        range: YearRange,
    ) -> Result<Self, SelectionError> {
        let mut resolved: Vec<(&'static str, &'static str)> = Vec::new();
        for name in countries {
            let c = registry::country(name.as_ref())
                .ok_or_else(|| RegistryError::UnknownCountry(name.as_ref().to_string()))?;
            if !resolved.iter().any(|(n, _)| *n == c.name) {
                resolved.push((c.name, c.code));
            }
        }
        if resolved.is_empty() {
            return Err(SelectionError::NoCountries);
        }
        let indicator = registry::indicator(indicator_label)
            .ok_or_else(|| RegistryError::UnknownIndicator(indicator_label.to_string()))?;
        Ok(Self {
            countries: resolved,
            indicator_label: indicator.label,
            indicator_code: indicator.code,
            range,
        })
    }

    /// Display names in selection order.
    pub fn country_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.countries.iter().map(|(n, _)| *n)
    }

    pub fn indicator_label(&self) -> &'static str {
        self.indicator_label
    }

    pub fn indicator_code(&self) -> &'static str {
        self.indicator_code
    }

    pub fn range(&self) -> YearRange {
        self.range
    }
}

/// A country whose request failed (transport, status or shape).
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFailure {
    pub country: String,
    pub reason: String,
}

/// Aggregated rows for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub indicator_label: String,
    pub indicator_code: String,
    pub range: YearRange,
    pub selected: Vec<String>,
    pub rows: Vec<SeriesRow>,
    pub failures: Vec<CountryFailure>,
}

/// Fetch every selected country, one after another, in selection order.
pub fn load<S: SeriesSource + ?Sized>(source: &S, selection: &Selection) -> Dataset {
    let mut rows = Vec::new();
    let mut failures = Vec::new();

    for (name, code) in &selection.countries {
        match source.fetch_series(code, selection.indicator_code, Some(selection.range)) {
            Ok(series) => {
                info!("{name}: {} observations", series.len());
                // Tag with the selected display name regardless of what the source used.
                rows.extend(series.into_iter().map(|r| SeriesRow {
                    country_name: (*name).to_string(),
                    ..r
                }));
            }
            Err(e) => {
                warn!("{name}: {e}");
                failures.push(CountryFailure {
                    country: (*name).to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Dataset {
        indicator_label: selection.indicator_label.to_string(),
        indicator_code: selection.indicator_code.to_string(),
        range: selection.range,
        selected: selection.country_names().map(str::to_string).collect(),
        rows,
        failures,
    }
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Countries that contributed at least one row, in first-seen order.
    pub fn countries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.rows {
            if !out.contains(&r.country_name.as_str()) {
                out.push(&r.country_name);
            }
        }
        out
    }

    /// `(year, value)` points per country, each sorted by year.
    pub fn series(&self) -> BTreeMap<&str, Vec<(i32, f64)>> {
        let mut groups: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
        for r in &self.rows {
            groups
                .entry(r.country_name.as_str())
                .or_default()
                .push((r.year, r.value));
        }
        for series in groups.values_mut() {
            series.sort_by_key(|(y, _)| *y);
        }
        groups
    }

    /// Selected countries that neither returned rows nor failed.
    pub fn missing_countries(&self) -> Vec<&str> {
        let have = self.countries();
        self.selected
            .iter()
            .map(String::as_str)
            .filter(|c| !have.contains(c) && !self.failures.iter().any(|f| f.country == *c))
            .collect()
    }

    /// Chart title, e.g. `GDP growth (%) (2001-2022)`.
    pub fn title(&self) -> String {
        format!(
            "{} ({}-{})",
            self.indicator_label,
            self.range.start(),
            self.range.end()
        )
    }
}
