use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How to specify dates in API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpec {
    /// Single year like 2020
    Year(i32),
    /// Inclusive range like 1960..=2022
    Range { start: i32, end: i32 },
}

impl DateSpec {
    pub fn to_query_param(&self) -> String {
        match *self {
            DateSpec::Year(y) => y.to_string(),
            DateSpec::Range { start, end } => format!("{}:{}", start, end),
        }
    }

    /// Human label used in chart titles, e.g. `1960-2022`.
    pub fn label(&self) -> String {
        match *self {
            DateSpec::Year(y) => y.to_string(),
            DateSpec::Range { start, end } => format!("{}-{}", start, end),
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
            u32::try_from(v).map_err(|_| E::custom("value out of range for u32"))
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

/// One row of the country listing (`/country?format=json`).
///
/// The listing carries many more fields (region, income level, capital…);
/// only the display name and the provider id matter here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryEntry {
    pub id: String,
    pub name: String,
}

/// Raw entry from the indicator endpoint (position 1 array).
///
/// `value` is kept as raw JSON: the API normally sends a number or `null`,
/// but nothing guarantees that, so coercion happens in [`coerce_rate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub country: CodeName,
    pub date: String,
    #[serde(default)]
    pub value: Value,
}

/// One observation: (country label, year, rate-or-null).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    /// `None` means "no data", which is not the same thing as a rate of zero.
    pub rate: Option<f64>,
}

impl Observation {
    pub fn new(country: impl Into<String>, year: i32, rate: Option<f64>) -> Self {
        Self {
            country: country.into(),
            year,
            rate,
        }
    }

    /// Convert a raw API entry. Returns `None` when `date` is not an integer year.
    pub fn from_entry(e: Entry) -> Option<Self> {
        let year = e.date.trim().parse::<i32>().ok()?;
        Some(Self {
            rate: coerce_rate(&e.value),
            country: e.country.value,
            year,
        })
    }
}

/// Coerce a raw JSON value to a rate.
///
/// Numbers and numeric strings become `Some`; `null`, booleans, objects,
/// unparseable strings and non-finite values become `None`.
pub fn coerce_rate(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}
