mod common;

use common::{Stub, path, series_body};
use econviz::config::ApiConfig;
use econviz::error::FetchError;
use econviz::{Client, YearRange};

const GROWTH: &str = "NY.GDP.MKTP.KD.ZG";

fn range() -> Option<YearRange> {
    Some(YearRange::new(2018, 2022).unwrap())
}

#[test]
fn rows_are_sorted_complete_and_inside_the_range() {
    let body = series_body(
        "ZAF",
        "South Africa",
        &[
            (2022, Some(1.9)),
            (2021, Some(4.9)),
            (2020, None),
            (2019, Some(0.3)),
            (2018, Some(1.5)),
            (2017, Some(1.2)),
        ],
    );
    let stub = Stub::start(vec![(path("ZAF", GROWTH), 200, body)]);
    let client = Client::new(&stub.api_config()).unwrap();

    let rows = client.fetch("ZAF", GROWTH, range());
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2018, 2019, 2021, 2022]);
    assert!(rows.iter().all(|r| r.country_name == "South Africa"));
    assert!(rows.iter().all(|r| r.value.is_finite()));
}

#[test]
fn request_carries_format_page_size_and_date() {
    let stub = Stub::start(vec![(
        path("NGA", GROWTH),
        200,
        series_body("NGA", "Nigeria", &[(2001, Some(5.9))]),
    )]);
    let client = Client::new(&stub.api_config()).unwrap();
    client.fetch("NGA", GROWTH, Some(YearRange::default()));

    let seen = stub.requests();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("/country/NGA/indicator/NY.GDP.MKTP.KD.ZG?"));
    assert!(seen[0].contains("format=json"));
    assert!(seen[0].contains("per_page=100"));
    assert!(seen[0].contains("date=2001:2022"));
}

#[test]
fn server_error_means_no_rows() {
    let stub = Stub::start(vec![(path("ZAF", GROWTH), 500, "oops".into())]);
    let client = Client::new(&stub.api_config()).unwrap();

    assert!(client.fetch("ZAF", GROWTH, range()).is_empty());
    let err = client.try_fetch("ZAF", GROWTH, range()).unwrap_err();
    assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 500));
}

#[test]
fn missing_records_element_means_no_rows() {
    let body = r#"[{"page":1,"pages":1,"per_page":50,"total":0}]"#.to_string();
    let stub = Stub::start(vec![(path("ZAF", GROWTH), 200, body)]);
    let client = Client::new(&stub.api_config()).unwrap();

    assert!(client.fetch("ZAF", GROWTH, range()).is_empty());
    assert!(matches!(
        client.try_fetch("ZAF", GROWTH, range()),
        Err(FetchError::Shape(_))
    ));
}

#[test]
fn null_records_are_a_valid_empty_answer() {
    let body = r#"[{"page":0,"pages":0,"per_page":"100","total":0},null]"#.to_string();
    let stub = Stub::start(vec![(path("ZAF", GROWTH), 200, body)]);
    let client = Client::new(&stub.api_config()).unwrap();

    assert_eq!(client.try_fetch("ZAF", GROWTH, range()).unwrap(), vec![]);
}

#[test]
fn api_message_is_reported() {
    let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#
        .to_string();
    let stub = Stub::start(vec![(path("ZAF", "BAD.CODE"), 200, body)]);
    let client = Client::new(&stub.api_config()).unwrap();

    match client.try_fetch("ZAF", "BAD.CODE", range()) {
        Err(FetchError::Api(msg)) => assert!(msg.contains("not valid"), "{msg}"),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn garbage_body_means_no_rows() {
    let stub = Stub::start(vec![(path("ZAF", GROWTH), 200, "<html>".into())]);
    let client = Client::new(&stub.api_config()).unwrap();
    assert!(client.fetch("ZAF", GROWTH, range()).is_empty());
    assert!(matches!(
        client.try_fetch("ZAF", GROWTH, range()),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn unreachable_host_means_no_rows() {
    let cfg = ApiConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout_secs: 2,
        connect_timeout_secs: 1,
        ..ApiConfig::default()
    };
    let client = Client::new(&cfg).unwrap();
    assert!(client.fetch("ZAF", GROWTH, range()).is_empty());
    assert!(matches!(
        client.try_fetch("ZAF", GROWTH, range()),
        Err(FetchError::Transport(_))
    ));
}
