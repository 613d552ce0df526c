//! Query Results
//!
//! Typed view of the JSON document the analysis backend returns for a query.
//!
//! The backend answers with one of three analyses, discriminated by `type`,
//! or with a bare `{ "error": "..." }` object. Chart and table payloads are
//! decoded leniently: a payload with an unexpected shape becomes `None` so
//! the corresponding section renders blank instead of failing the whole
//! result.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// A flat key-value record, in the column order the backend sent it.
pub type Row = Map<String, Value>;

/// A decoded backend response
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    AreaAnalysis(AreaAnalysis),
    Comparison(Comparison),
    PriceGrowth(PriceGrowth),
    /// Application error reported by the backend in an otherwise successful response
    Error(String),
}

/// Discriminant of a [`QueryResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    AreaAnalysis,
    Comparison,
    PriceGrowth,
    Error,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::AreaAnalysis => "area_analysis",
            ResultKind::Comparison => "comparison",
            ResultKind::PriceGrowth => "price_growth",
            ResultKind::Error => "error",
        }
    }
}

/// Analysis of a single area
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AreaAnalysis {
    pub area: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub chart_data: Option<PriceTrends>,
    #[serde(default, deserialize_with = "lenient")]
    pub table_data: Option<Vec<Row>>,
}

/// Side-by-side comparison of two or more areas
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comparison {
    pub areas: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub chart_data: Option<ComparisonChart>,
    #[serde(default, deserialize_with = "lenient")]
    pub table_data: Option<Vec<Row>>,
}

/// Price growth of one area over its most recent years
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceGrowth {
    pub area: String,
    pub years: u32,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub chart_data: Option<PriceTrends>,
    #[serde(default, deserialize_with = "lenient")]
    pub table_data: Option<Vec<Row>>,
}

/// Yearly price series for one area
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceTrends {
    #[serde(default)]
    pub area: Option<String>,
    pub price_trends: Vec<PriceTrendPoint>,
}

/// One year of weighted average rates. Missing rates stay `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceTrendPoint {
    #[serde(deserialize_with = "year")]
    pub year: i64,
    #[serde(default)]
    pub flat_price: Option<f64>,
    #[serde(default)]
    pub office_price: Option<f64>,
    #[serde(default)]
    pub shop_price: Option<f64>,
    #[serde(default)]
    pub total_sales: Option<f64>,
    #[serde(default)]
    pub units_sold: Option<f64>,
}

/// Chart payload of a comparison
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonChart {
    #[serde(default)]
    pub areas: Vec<String>,
    pub comparison: Vec<AreaSeries>,
}

/// Price and demand series of one compared area
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AreaSeries {
    pub area: String,
    pub data: Vec<ComparisonPoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonPoint {
    #[serde(deserialize_with = "year")]
    pub year: i64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub demand: Option<f64>,
}

/// Errors decoding a backend response into a [`QueryResult`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultError {
    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Response is not a JSON object")]
    NotAnObject,

    #[error("Response has neither an error nor a type")]
    MissingType,

    #[error("Unknown result type: {0}")]
    UnknownType(String),

    #[error("Invalid {kind} payload: {message}")]
    Payload { kind: &'static str, message: String },
}

impl QueryResult {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, ResultError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ResultError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed response body
    pub fn from_value(value: Value) -> Result<Self, ResultError> {
        let Value::Object(map) = value else {
            return Err(ResultError::NotAnObject);
        };

        if let Some(error) = map.get("error").filter(|e| is_truthy(e)) {
            return Ok(QueryResult::Error(value_text(error)));
        }

        let kind = match map.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => return Err(ResultError::UnknownType(other.to_string())),
            None => return Err(ResultError::MissingType),
        };

        let payload = Value::Object(map);
        match kind.as_str() {
            "area_analysis" => {
                decode(payload, ResultKind::AreaAnalysis).map(QueryResult::AreaAnalysis)
            }
            "comparison" => {
                decode(payload, ResultKind::Comparison).map(QueryResult::Comparison)
            }
            "price_growth" => {
                decode(payload, ResultKind::PriceGrowth).map(QueryResult::PriceGrowth)
            }
            _ => Err(ResultError::UnknownType(kind)),
        }
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            QueryResult::AreaAnalysis(_) => ResultKind::AreaAnalysis,
            QueryResult::Comparison(_) => ResultKind::Comparison,
            QueryResult::PriceGrowth(_) => ResultKind::PriceGrowth,
            QueryResult::Error(_) => ResultKind::Error,
        }
    }

    /// The bot's chat reply for this result
    pub fn summary_line(&self) -> String {
        match self {
            QueryResult::AreaAnalysis(a) => format!("Here's the analysis for {}:", a.area),
            QueryResult::Comparison(c) => {
                format!("Here's the comparison between {}:", c.areas.join(" and "))
            }
            QueryResult::PriceGrowth(g) => format!(
                "Here's the price growth analysis for {} over the last {} years:",
                g.area, g.years
            ),
            QueryResult::Error(error) => format!("Error: {}", error),
        }
    }

    /// Free-text analysis summary written by the backend, if any
    pub fn summary(&self) -> Option<&str> {
        match self {
            QueryResult::AreaAnalysis(a) => a.summary.as_deref(),
            QueryResult::Comparison(c) => c.summary.as_deref(),
            QueryResult::PriceGrowth(g) => g.summary.as_deref(),
            QueryResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryResult::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }

    /// Raw table rows, if the result carries any
    pub fn table_rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::AreaAnalysis(a) => a.table_data.as_deref(),
            QueryResult::Comparison(c) => c.table_data.as_deref(),
            QueryResult::PriceGrowth(g) => g.table_data.as_deref(),
            QueryResult::Error(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for QueryResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        QueryResult::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn decode<T: DeserializeOwned>(payload: Value, kind: ResultKind) -> Result<T, ResultError> {
    serde_json::from_value(payload).map_err(|e| ResultError::Payload {
        kind: kind.as_str(),
        message: e.to_string(),
    })
}

/// Display text of a JSON value: strings unquoted, integral floats without
/// a trailing `.0`, everything else as JSON
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64().filter(|_| n.is_f64()) {
            Some(f) if f == 0.0 => "0".to_string(),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Whether an `error` field counts as set: `null`, `false`, `0` and `""`
/// mean no error
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode an optional section, turning any shape mismatch into `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(section) => Ok(Some(section)),
        Err(e) => {
            tracing::debug!("Ignoring malformed result section: {}", e);
            Ok(None)
        }
    }
}

/// Years arrive as integers, but dataframe exports sometimes send `2021.0`
fn year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid year: {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid year: {}", s))),
        other => Err(serde::de::Error::custom(format!("invalid year: {}", other))),
    }
}
