//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! Two endpoints are used:
//! - `country?format=json&per_page=300` to map country names to provider ids
//!   (the Code Resolver), and
//! - `country/{code}/indicator/{indicator}` to pull one series per country
//!   (the Series Fetcher), which is then pivoted into a [`WideTable`].
//!
//! Both stages recover locally from request failures: they log and degrade
//! instead of returning an error. The only terminal condition is "no data",
//! reported by [`Client::fetch_series`] as `None`.
//!
//! ### Notes
//! - The API sometimes serializes `per_page` as a **string**; we accept both string/number.
//! - One page is requested per call (`per_page` 300 / 1000); a response that
//!   reports more pages is used as-is and logged.
//!
//! Typical usage:
//! ```no_run
//! # use fertility_dashboard::{Client, DateSpec};
//! # use std::time::Duration;
//! let client = Client::new("https://api.worldbank.org/v2", Duration::from_secs(30))?;
//! let codes = client.country_codes(&["Norway".into(), "Sweden".into()]);
//! let table = client.fetch_series(
//!     &codes,
//!     "SP.DYN.TFRT.IN",
//!     DateSpec::Range { start: 1960, end: 2022 },
//! );
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::error::ApiError;
use crate::models::{CountryEntry, DateSpec, Entry, Meta, Observation};
use crate::table::WideTable;
use log::{debug, error, info, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Page size for the country listing; the listing has just under 300 entries.
pub const COUNTRY_PAGE_SIZE: u32 = 300;
/// Page size for one country's indicator series.
pub const SERIES_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(part: &str) -> String {
    percent_encoding::utf8_percent_encode(part.trim(), SAFE).to_string()
}

/// URL of the country listing.
pub fn country_list_url(base_url: &str) -> String {
    format!(
        "{}/country?format=json&per_page={}",
        base_url.trim_end_matches('/'),
        COUNTRY_PAGE_SIZE
    )
}

/// URL of one country's indicator series. Path segments are percent-encoded so
/// pass-through names (`"United States"`) still form a valid request.
pub fn indicator_url(base_url: &str, code: &str, indicator: &str, date: DateSpec) -> String {
    format!(
        "{}/country/{}/indicator/{}?date={}&format=json&per_page={}",
        base_url.trim_end_matches('/'),
        enc(code),
        enc(indicator),
        date.to_query_param(),
        SERIES_PAGE_SIZE
    )
}

/// A decoded `[meta, rows]` response.
struct Page {
    meta: Option<Meta>,
    /// Error payload the API puts in position 0 instead of `Meta`.
    message: Option<Value>,
    /// Position 1; `None` when absent or `null`.
    rows: Option<Value>,
}

fn split_page(v: Value) -> Result<Page, ApiError> {
    let Value::Array(mut arr) = v else {
        return Err(ApiError::Shape("not a top-level array".into()));
    };
    if arr.is_empty() {
        return Err(ApiError::Shape("empty array".into()));
    }
    let rows = if arr.len() > 1 {
        Some(arr.swap_remove(1)).filter(|r| !r.is_null())
    } else {
        None
    };
    let head = arr.swap_remove(0);
    let message = head.get("message").cloned();
    let meta = if message.is_none() {
        serde_json::from_value::<Meta>(head).ok()
    } else {
        None
    };
    Ok(Page {
        meta,
        message,
        rows,
    })
}

fn warn_if_truncated(meta: Option<&Meta>, what: &str) {
    if let Some(m) = meta
        && m.pages > 1
    {
        warn!(
            "{} spans {} pages ({} rows); only page {} was fetched",
            what, m.pages, m.total, m.page
        );
    }
}

/// Build the case-insensitive `{lowercased name -> id}` map from listing rows.
pub fn build_lookup(entries: Vec<CountryEntry>) -> HashMap<String, String> {
    entries
        .into_iter()
        .filter(|e| !e.id.trim().is_empty())
        .map(|e| (e.name.to_lowercase(), e.id))
        .collect()
}

/// Map each name to its code; unknown names pass through unchanged (with a warning).
///
/// Output has the same length and order as `names`.
pub fn resolve_names(names: &[String], lookup: &HashMap<String, String>) -> Vec<String> {
    names
        .iter()
        .map(|name| match lookup.get(&name.to_lowercase()) {
            Some(code) => code.clone(),
            None => {
                warn!("Could not find code for {name}. Using name as is.");
                name.clone()
            }
        })
        .collect()
}

/// Parse one indicator response into observations.
///
/// `Ok(vec![])` for the provider's "no rows" and error-message shapes.
fn parse_series(v: Value, code: &str) -> Result<Vec<Observation>, ApiError> {
    let page = split_page(v)?;
    if let Some(msg) = &page.message {
        warn!("No data available for {code}: {msg}");
        return Ok(Vec::new());
    }
    let Some(rows) = page.rows else {
        warn!("No data available for {code}");
        return Ok(Vec::new());
    };
    warn_if_truncated(page.meta.as_ref(), &format!("series for {code}"));

    let entries: Vec<Entry> = serde_json::from_value(rows)
        .map_err(|e| ApiError::Shape(format!("parse entries: {e}")))?;

    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let date = entry.date.clone();
        match Observation::from_entry(entry) {
            Some(obs) => out.push(obs),
            None => warn!("Skipping {code} observation with non-year date {date:?}"),
        }
    }
    Ok(out)
}

impl Client {
    /// Build a client. `timeout` applies to every request made by this client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(timeout) // total request timeout
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("fertility-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().map_err(ApiError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        resp.json::<Value>().map_err(ApiError::Decode)
    }

    /// Fetch the country listing and build the case-insensitive name lookup.
    pub fn country_lookup(&self) -> Result<HashMap<String, String>, ApiError> {
        let v = self.get_json(&country_list_url(&self.base_url))?;
        let page = split_page(v)?;
        if let Some(msg) = page.message {
            return Err(ApiError::Shape(format!("world bank api error: {msg}")));
        }
        let rows = page
            .rows
            .ok_or_else(|| ApiError::Shape("country listing has no rows".into()))?;
        warn_if_truncated(page.meta.as_ref(), "country listing");
        let entries: Vec<CountryEntry> = serde_json::from_value(rows)
            .map_err(|e| ApiError::Shape(format!("parse country listing: {e}")))?;
        Ok(build_lookup(entries))
    }

    /// Code Resolver: map names to provider codes.
    ///
    /// Never fails. Unknown names pass through; if the lookup call itself fails,
    /// the input list is returned unchanged.
    pub fn country_codes(&self, names: &[String]) -> Vec<String> {
        match self.country_lookup() {
            Ok(lookup) => resolve_names(names, &lookup),
            Err(e) => {
                error!("An error occurred while fetching country codes: {e}");
                names.to_vec()
            }
        }
    }

    /// Fetch one country's series for `indicator` over `date`.
    pub fn fetch_country_series(
        &self,
        code: &str,
        indicator: &str,
        date: DateSpec,
    ) -> Result<Vec<Observation>, ApiError> {
        let url = indicator_url(&self.base_url, code, indicator, date);
        let v = self.get_json(&url)?;
        parse_series(v, code)
    }

    /// Series Fetcher: fetch every code and pivot into a [`WideTable`].
    ///
    /// Per-country failures are logged and skipped. Returns `None` when no
    /// observation at all was collected.
    pub fn fetch_series(
        &self,
        codes: &[String],
        indicator: &str,
        date: DateSpec,
    ) -> Option<WideTable> {
        let mut all: Vec<Observation> = Vec::new();
        for code in codes {
            info!("Fetching data for {code}...");
            match self.fetch_country_series(code, indicator, date) {
                Ok(obs) => all.extend(obs),
                Err(e) => error!("An error occurred while fetching data for {code}: {e}"),
            }
        }

        if all.is_empty() {
            warn!("No data was fetched from the World Bank API.");
            return None;
        }
        info!("Processing {} fetched observations...", all.len());
        WideTable::pivot(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn urls_carry_fixed_query_parameters() {
        assert_eq!(
            country_list_url("https://api.worldbank.org/v2/"),
            "https://api.worldbank.org/v2/country?format=json&per_page=300"
        );
        assert_eq!(
            indicator_url(
                "https://api.worldbank.org/v2",
                "NO",
                "SP.DYN.TFRT.IN",
                DateSpec::Range {
                    start: 1960,
                    end: 2022
                }
            ),
            "https://api.worldbank.org/v2/country/NO/indicator/SP.DYN.TFRT.IN?date=1960:2022&format=json&per_page=1000"
        );
    }

    #[test]
    fn pass_through_names_are_encoded() {
        let url = indicator_url("http://x", "Faroe Islands", "SP.DYN.TFRT.IN", DateSpec::Year(2020));
        assert!(url.contains("/country/Faroe%20Islands/indicator/"));
    }

    #[test]
    fn resolve_is_case_insensitive_and_order_preserving() {
        let lookup = build_lookup(vec![
            CountryEntry {
                id: "NOR".into(),
                name: "Norway".into(),
            },
            CountryEntry {
                id: "SWE".into(),
                name: "Sweden".into(),
            },
            CountryEntry {
                id: "".into(),
                name: "Nowhere".into(),
            },
        ]);
        let input = names(&["sweden", "Testland", "NORWAY", "Nowhere"]);
        let out = resolve_names(&input, &lookup);
        assert_eq!(out.len(), input.len());
        assert_eq!(out, names(&["SWE", "Testland", "NOR", "Nowhere"]));
    }

    #[test]
    fn series_parse_handles_null_and_message_shapes() {
        let empty = json!([{"page": 0, "pages": 0, "per_page": 1000, "total": 0}, null]);
        assert!(parse_series(empty, "XX").unwrap().is_empty());

        let message = json!([{"message": [{"id": "120", "key": "Invalid value"}]}]);
        assert!(parse_series(message, "XX").unwrap().is_empty());

        assert!(matches!(
            parse_series(json!({"oops": true}), "XX"),
            Err(ApiError::Shape(_))
        ));
    }

    #[test]
    fn series_parse_coerces_values_and_skips_bad_dates() {
        let v = json!([
            {"page": 1, "pages": 1, "per_page": 1000, "total": 3},
            [
                {"country": {"id": "NO", "value": "Norway"}, "date": "2022", "value": 1.41},
                {"country": {"id": "NO", "value": "Norway"}, "date": "2021", "value": "oops"},
                {"country": {"id": "NO", "value": "Norway"}, "date": "MRV", "value": 1.0}
            ]
        ]);
        let obs = parse_series(v, "NO").unwrap();
        assert_eq!(
            obs,
            vec![
                Observation::new("Norway", 2022, Some(1.41)),
                Observation::new("Norway", 2021, None)
            ]
        );
    }
}
