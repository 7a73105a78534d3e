//! Tiny in-process HTTP server serving canned World Bank responses.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub struct FixtureServer {
    /// Base URL including the `/v2` prefix, e.g. `http://127.0.0.1:40123/v2`.
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    /// Request targets (path + query) received so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Serve `routes` (`path without query -> (status, body)`); anything else is a 404.
pub fn serve(routes: &[(&str, u16, &str)]) -> FixtureServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: HashMap<String, (u16, String)> = routes
        .iter()
        .map(|(p, s, b)| (format!("/v2{p}"), (*s, b.to_string())))
        .collect();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&hits);

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &routes, &seen);
        }
    });

    FixtureServer {
        base_url: format!("http://{addr}/v2"),
        hits,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, (u16, String)>, seen: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers.
    let mut line = String::new();
    while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
        line.clear();
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
    seen.lock().unwrap().push(target.clone());
    let path = target.split('?').next().unwrap_or("/");

    let (status, body) = routes
        .get(path)
        .cloned()
        .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));
    let response = format!(
        "HTTP/1.1 {status} Fixture\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Base URL of a port that nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v2")
}

pub const COUNTRY_LISTING: &str = r#"[
  {"page":1,"pages":1,"per_page":"300","total":4},
  [
    {"id":"NOR","iso2Code":"NO","name":"Norway","region":{"id":"ECS","value":"Europe & Central Asia"}},
    {"id":"SWE","iso2Code":"SE","name":"Sweden","region":{"id":"ECS","value":"Europe & Central Asia"}},
    {"id":"FIN","iso2Code":"FI","name":"Finland","region":{"id":"ECS","value":"Europe & Central Asia"}},
    {"id":"ISL","iso2Code":"IS","name":"Iceland","region":{"id":"ECS","value":"Europe & Central Asia"}}
  ]
]"#;

pub const EMPTY_SERIES: &str = r#"[{"page":0,"pages":0,"per_page":1000,"total":0,"sourceid":null,"lastupdated":null},null]"#;

/// Indicator response for one country with the given (year, raw value JSON) rows.
pub fn series_json(id: &str, name: &str, rows: &[(i32, &str)]) -> String {
    let entries: Vec<String> = rows
        .iter()
        .map(|(year, value)| {
            format!(
                r#"{{"indicator":{{"id":"SP.DYN.TFRT.IN","value":"Fertility rate, total (births per woman)"}},"country":{{"id":"{id}","value":"{name}"}},"countryiso3code":"{id}","date":"{year}","value":{value},"unit":"","obs_status":"","decimal":1}}"#
            )
        })
        .collect();
    format!(
        r#"[{{"page":1,"pages":1,"per_page":1000,"total":{}}},[{}]]"#,
        rows.len(),
        entries.join(",")
    )
}
