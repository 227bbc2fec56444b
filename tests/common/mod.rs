//! Loopback HTTP stub that answers like the World Bank API.
#![allow(dead_code)]

use econviz::config::ApiConfig;
use serde_json::json;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct Stub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    /// Serve canned `(status, body)` pairs keyed by request path (query
    /// ignored). Unknown paths get a 404.
    pub fn start(routes: Vec<(String, u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(path, status, body)| (path, (status, body)))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                // drain headers
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
                    line.clear();
                }

                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                let path = target.split('?').next().unwrap_or("/").to_string();
                seen.lock().unwrap().push(target);

                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..ApiConfig::default()
        }
    }
}

pub fn path(iso3: &str, indicator: &str) -> String {
    format!("/country/{iso3}/indicator/{indicator}")
}

/// A well-formed `[meta, records]` body, newest year first like the API.
pub fn series_body(iso3: &str, name: &str, points: &[(i32, Option<f64>)]) -> String {
    let mut points = points.to_vec();
    points.sort_by_key(|(y, _)| std::cmp::Reverse(*y));
    let records: Vec<_> = points
        .iter()
        .map(|(year, value)| {
            json!({
                "indicator": {"id": "NY.GDP.MKTP.KD.ZG", "value": "GDP growth (annual %)"},
                "country": {"id": &iso3[..2], "value": name},
                "countryiso3code": iso3,
                "date": year.to_string(),
                "value": value,
                "unit": "",
                "obs_status": "",
                "decimal": 1
            })
        })
        .collect();
    json!([
        {"page": 1, "pages": 1, "per_page": "100", "total": records.len(), "sourceid": "2"},
        records
    ])
    .to_string()
}
