//! Shared domain types used across the workspace.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Remote records ────────────────────────────────────────────────────

/// A wine as delivered by the remote data file.
///
/// The data file is generated from scraped spreadsheets, so scalar fields
/// show up as strings, numbers, or `null` depending on the source column.
/// Decoding never fails on a field's shape; absent values fall back to
/// empty/none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    /// Display name; also the join key for local annotations.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub wine_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub store: String,
    /// Numeric-as-string; parsed at sort time.
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub vivino_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub pairings: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

// ── Local annotations ─────────────────────────────────────────────────

/// User-authored pairings and notes for one wine, keyed by wine name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAnnotation {
    #[serde(default, deserialize_with = "lenient_tags")]
    pub pairings: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl LocalAnnotation {
    /// Decode one stored entry.
    ///
    /// `null`, `false`, `0`, and `""` mean "no annotation". Any other value
    /// is an annotation; only an object's `pairings` and `description`
    /// fields are read, so arrays and scalars decode as empty.
    pub fn from_stored(value: Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            obj @ Value::Object(_) => Some(serde_json::from_value(obj).unwrap_or_default()),
            _ => Some(Self::default()),
        }
    }
}

/// Annotations keyed by wine name.
pub type AnnotationMap = HashMap<String, LocalAnnotation>;

/// Personal scores (0–5) keyed by wine name.
pub type ScoreMap = HashMap<String, u8>;

/// Highest personal score a user can give.
pub const MAX_PERSONAL_SCORE: u8 = 5;

// ── Enriched wines ────────────────────────────────────────────────────

/// A remote record merged with the user's local annotation and rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedWine {
    #[serde(flatten)]
    pub record: WineRecord,
    /// 0 means unrated.
    #[serde(rename = "personalScore")]
    pub personal_score: u8,
}

impl EnrichedWine {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Whether this wine carries `tag` among its pairings.
    pub fn has_pairing(&self, tag: &str) -> bool {
        self.record
            .pairings
            .as_ref()
            .is_some_and(|p| p.iter().any(|t| t == tag))
    }
}

/// Display glyph for a known pairing tag.
pub fn pairing_emoji(tag: &str) -> Option<&'static str> {
    match tag {
        "Red meat" => Some("🥩"),
        "White meat" => Some("🍗"),
        "Seafood" => Some("🦞"),
        "Fish" => Some("🐟"),
        "Dessert" => Some("🍰"),
        _ => None,
    }
}

// ── Lenient decoding helpers ──────────────────────────────────────────

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn tags_from(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(tags_from(items))),
        _ => Ok(None),
    }
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string_list(deserializer)?.unwrap_or_default())
}
