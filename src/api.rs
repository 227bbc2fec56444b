//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! One call covers one country and one indicator on the
//! `country/{code}/indicator/{code}` endpoint and returns tidy
//! [`SeriesRow`](crate::models::SeriesRow)s.
//!
//! ### Notes
//! - Exactly one GET per call, no retries, no pagination (`per_page=100`
//!   covers the whole selectable year window).
//! - The API sometimes serializes `per_page` as a **string**; both forms are accepted.
//! - [`Client::fetch`] treats every failure as "no data". Use
//!   [`Client::try_fetch`] to see why a series came back empty.
//!
//! Typical usage:
//! ```no_run
//! # use econviz::{Client, YearRange};
//! # use econviz::config::ApiConfig;
//! let client = Client::new(&ApiConfig::default())?;
//! let rows = client.fetch("ZAF", "NY.GDP.MKTP.KD.ZG", Some(YearRange::new(2001, 2022)?));
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::{Entry, Meta, RowOrder, SeriesRow, YearRange};
use crate::registry;
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    pub per_page: u32,
    pub order: RowOrder,
    http: HttpClient,
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(part: &str) -> String {
    percent_encoding::utf8_percent_encode(part.trim(), SAFE).to_string()
}

impl Client {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(Policy::limited(5))
            .user_agent(concat!("econviz/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            order: config.order,
            http,
        })
    }

    /// Request URL for one country/indicator pair.
    pub fn series_url(
        &self,
        country_code: &str,
        indicator_code: &str,
        range: Option<YearRange>,
    ) -> String {
        let mut url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page={}",
            self.base_url,
            enc(country_code),
            enc(indicator_code),
            self.per_page
        );
        if let Some(r) = range {
            url.push_str(&format!("&date={}", r.to_query_param()));
        }
        url
    }

    /// Fetch one series; any failure yields an empty vector.
    ///
    /// "No data" and "error" are deliberately indistinguishable here. The
    /// cause is logged at `warn` level.
    pub fn fetch(
        &self,
        country_code: &str,
        indicator_code: &str,
        range: Option<YearRange>,
    ) -> Vec<SeriesRow> {
        match self.try_fetch(country_code, indicator_code, range) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("no data for {country_code}/{indicator_code}: {e}");
                Vec::new()
            }
        }
    }

    /// Fetch one series, reporting why it failed.
    pub fn try_fetch(
        &self,
        country_code: &str,
        indicator_code: &str,
        range: Option<YearRange>,
    ) -> Result<Vec<SeriesRow>, FetchError> {
        let url = self.series_url(country_code, indicator_code, range);
        debug!("GET {url}");

        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = resp.text()?;

        let rows = parse_series(&body, country_code, range, self.order)?;
        if rows.is_empty() {
            debug!("{country_code}/{indicator_code}: valid response without values");
        }
        Ok(rows)
    }
}

/// Decode a response body into rows for `country_code`.
///
/// Rows are named after the registry entry for `country_code`, else the
/// record's `country.value`, else the code itself. Records without a value
/// and records outside `range` are dropped.
pub fn parse_series(
    body: &str,
    country_code: &str,
    range: Option<YearRange>,
    order: RowOrder,
) -> Result<Vec<SeriesRow>, FetchError> {
    let v: Value = serde_json::from_str(body)?;

    // The API returns an array: [Meta, [Entry, ...]] or a "message" object in position 0 on error.
    let arr = v
        .as_array()
        .ok_or(FetchError::Shape("not a top-level array"))?;
    let head = arr.first().ok_or(FetchError::Shape("empty array"))?;
    if let Some(msg) = head.get("message") {
        return Err(FetchError::Api(api_message(msg)));
    }

    let meta: Meta = serde_json::from_value(head.clone())?;
    if meta.pages > 1 {
        warn!(
            "response spans {} pages of {}; only the first page is used",
            meta.pages, meta.per_page
        );
    }

    let records = arr
        .get(1)
        .ok_or(FetchError::Shape("missing records element"))?;
    // `[meta, null]` is how the API says "nothing for this query".
    if records.is_null() {
        return Ok(Vec::new());
    }
    let entries: Vec<Entry> = serde_json::from_value(records.clone())?;
    let display_name = registry::country_name(country_code);

    let mut rows = Vec::with_capacity(entries.len());
    for e in entries {
        let Some(value) = e.value else { continue };
        let year = e
            .date
            .trim()
            .parse::<i32>()
            .map_err(|_| FetchError::InvalidYear(e.date.clone()))?;
        if range.is_some_and(|r| !r.contains(year)) {
            continue;
        }
        let country_name = match display_name {
            Some(name) => name.to_string(),
            None => e
                .country
                .map(|c| c.value)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| country_code.trim().to_string()),
        };
        rows.push(SeriesRow {
            country_name,
            year,
            value,
        });
    }

    if order == RowOrder::YearAscending {
        rows.sort_by_key(|r| r.year);
    }
    Ok(rows)
}

/// Flatten the API's `message` payload (`[{"id":..,"key":..,"value":..}]`) to text.
fn api_message(msg: &Value) -> String {
    let parts: Vec<&str> = msg
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|m| m.get("value").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if parts.is_empty() {
        msg.to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = r#"{"page":1,"pages":1,"per_page":"100","total":3}"#;

    fn body(records: &str) -> String {
        format!("[{META},{records}]")
    }

    #[test]
    fn drops_nulls_and_sorts() {
        let b = body(
            r#"[
            {"country":{"id":"KE","value":"Kenya"},"date":"2021","value":7.6},
            {"country":{"id":"KE","value":"Kenya"},"date":"2020","value":null},
            {"country":{"id":"KE","value":"Kenya"},"date":"2019","value":5.1}
        ]"#,
        );
        let rows = parse_series(&b, "KEN", None, RowOrder::YearAscending).unwrap();
        assert_eq!(
            rows,
            vec![SeriesRow::new("Kenya", 2019, 5.1), SeriesRow::new("Kenya", 2021, 7.6)]
        );
    }

    #[test]
    fn keeps_api_order_when_asked() {
        let b = body(r#"[{"date":"2021","value":1.0},{"date":"2019","value":2.0}]"#);
        let rows = parse_series(&b, "PER", None, RowOrder::AsReturned).unwrap();
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2021, 2019]);
    }

    #[test]
    fn falls_back_to_record_country_name() {
        let b = body(r#"[{"country":{"id":"XK","value":"Kosovo"},"date":"2020","value":1.0}]"#);
        let rows = parse_series(&b, "XKX", None, RowOrder::YearAscending).unwrap();
        assert_eq!(rows[0].country_name, "Kosovo");
    }

    #[test]
    fn falls_back_to_requested_code() {
        let b = body(r#"[{"date":"2020","value":1.0},{"country":{"id":"","value":""},"date":"2021","value":2.0}]"#);
        let rows = parse_series(&b, "XKX", None, RowOrder::YearAscending).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.country_name.as_str()).collect();
        assert_eq!(names, ["XKX", "XKX"]);
    }

    #[test]
    fn filters_to_requested_range() {
        let b = body(
            r#"[{"date":"1999","value":1.0},{"date":"2005","value":2.0},{"date":"2023","value":3.0}]"#,
        );
        let range = YearRange::new(2001, 2022).unwrap();
        let rows = parse_series(&b, "CHL", Some(range), RowOrder::YearAscending).unwrap();
        assert_eq!(rows, vec![SeriesRow::new("Chile", 2005, 2.0)]);
    }

    #[test]
    fn null_records_mean_no_data() {
        let rows = parse_series(&body("null"), "PER", None, RowOrder::YearAscending);
        assert!(rows.unwrap().is_empty());
    }

    #[test]
    fn shape_errors() {
        let order = RowOrder::YearAscending;
        assert!(matches!(
            parse_series(&format!("[{META}]"), "ZAF", None, order),
            Err(FetchError::Shape("missing records element"))
        ));
        assert!(matches!(
            parse_series("{}", "ZAF", None, order),
            Err(FetchError::Shape(_))
        ));
        assert!(matches!(
            parse_series("[]", "ZAF", None, order),
            Err(FetchError::Shape(_))
        ));
        assert!(matches!(
            parse_series("not json", "ZAF", None, order),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            parse_series(&body(r#"[{"date":"2020Q1","value":1.0}]"#), "ZAF", None, order),
            Err(FetchError::InvalidYear(d)) if d == "2020Q1"
        ));
    }

    #[test]
    fn api_error_object_is_surfaced() {
        let b = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        match parse_series(b, "ZAF", None, RowOrder::YearAscending) {
            Err(FetchError::Api(m)) => assert!(m.contains("not valid")),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn url_includes_range_and_encodes_codes() {
        let client = Client::new(&ApiConfig {
            base_url: "http://example.test/v2/".into(),
            ..ApiConfig::default()
        })
        .unwrap();
        let range = YearRange::new(2001, 2022).unwrap();
        assert_eq!(
            client.series_url("ZAF", "NY.GDP.MKTP.KD.ZG", Some(range)),
            "http://example.test/v2/country/ZAF/indicator/NY.GDP.MKTP.KD.ZG?format=json&per_page=100&date=2001:2022"
        );
        assert_eq!(
            client.series_url(" a b ", "X", None),
            "http://example.test/v2/country/a%20b/indicator/X?format=json&per_page=100"
        );
    }
}
