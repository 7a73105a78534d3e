mod common;

use common::{COUNTRY_LISTING, closed_port_url, serve};
use fertility_dashboard::Client;
use std::time::Duration;

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn client(base: &str) -> Client {
    Client::new(base, Duration::from_secs(5)).unwrap()
}

#[test]
fn resolves_known_names_and_passes_unknown_through() {
    let server = serve(&[("/country", 200, COUNTRY_LISTING)]);
    let input = names(&["Norway", "sweden", "Testland", "ICELAND"]);

    let codes = client(&server.base_url).country_codes(&input);

    assert_eq!(codes, names(&["NOR", "SWE", "Testland", "ISL"]));
    let hits = server.hits();
    assert_eq!(hits.len(), 1, "one lookup call for all names");
    assert!(hits[0].starts_with("/v2/country?"));
    assert!(hits[0].contains("format=json"));
    assert!(hits[0].contains("per_page=300"));
}

#[test]
fn http_error_returns_names_unchanged() {
    let server = serve(&[("/country", 503, "Service Unavailable")]);
    let input = names(&["Norway", "Sweden"]);
    assert_eq!(client(&server.base_url).country_codes(&input), input);
}

#[test]
fn api_error_payload_returns_names_unchanged() {
    let server = serve(&[(
        "/country",
        200,
        r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#,
    )]);
    let input = names(&["Finland"]);
    assert_eq!(client(&server.base_url).country_codes(&input), input);
}

#[test]
fn unreachable_api_returns_names_unchanged() {
    let input = names(&["Denmark", "Iceland", "Norway"]);
    let codes = client(&closed_port_url()).country_codes(&input);
    assert_eq!(codes.len(), input.len());
    assert_eq!(codes, input);
}

#[test]
fn malformed_body_returns_names_unchanged() {
    let server = serve(&[("/country", 200, "<html>not json</html>")]);
    let input = names(&["Sweden"]);
    assert_eq!(client(&server.base_url).country_codes(&input), input);
}
