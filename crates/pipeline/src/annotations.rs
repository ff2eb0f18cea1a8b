//! User-local ratings, pairings, and notes.
//!
//! Both maps live in the key-value store as JSON objects keyed by wine name
//! and are re-read on every pipeline run.

use std::sync::Arc;

use common::storage::{ANNOTATIONS_KEY, PERSONAL_SCORES_KEY};
use common::{
    AnnotationMap, Error, KeyValueStore, LocalAnnotation, Result, ScoreMap, MAX_PERSONAL_SCORE,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Partial edit of one wine's annotation; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationUpdate {
    pub pairings: Option<Vec<String>>,
    pub description: Option<String>,
}

/// Reads and writes annotations and personal scores.
#[derive(Clone)]
pub struct AnnotationStore {
    store: Arc<dyn KeyValueStore>,
}

impl AnnotationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All annotations. Falsy entries (`null`, `false`, `0`, `""`) count
    /// as unannotated; any other non-object entry is an empty annotation.
    pub fn annotations(&self) -> Result<AnnotationMap> {
        let mut out = AnnotationMap::new();
        for (name, value) in self.read_object(ANNOTATIONS_KEY)? {
            if let Some(ann) = LocalAnnotation::from_stored(value) {
                out.insert(name, ann);
            }
        }
        Ok(out)
    }

    /// All personal scores, clamped to 0–5.
    pub fn scores(&self) -> Result<ScoreMap> {
        let mut out = ScoreMap::new();
        for (name, value) in self.read_object(PERSONAL_SCORES_KEY)? {
            match score_from(&value) {
                Some(score) => {
                    out.insert(name, score);
                }
                None => warn!("Skipping malformed personal score for {:?}", name),
            }
        }
        Ok(out)
    }

    /// Rate a wine 1–5, or clear its rating with 0.
    pub fn set_personal_score(&self, name: &str, score: i64) -> Result<()> {
        let score = u8::try_from(score)
            .ok()
            .filter(|s| *s <= MAX_PERSONAL_SCORE)
            .ok_or(Error::InvalidScore(score))?;

        let mut scores = self.read_object(PERSONAL_SCORES_KEY)?;
        if score == 0 {
            scores.remove(name);
        } else {
            scores.insert(name.to_string(), Value::from(score));
        }
        self.write_object(PERSONAL_SCORES_KEY, scores)?;
        info!("Personal score for {:?} set to {}", name, score);
        Ok(())
    }

    /// Apply a partial edit to one wine's annotation and return the result.
    pub fn update_annotation(
        &self,
        name: &str,
        update: AnnotationUpdate,
    ) -> Result<LocalAnnotation> {
        let mut raw = self.read_object(ANNOTATIONS_KEY)?;
        let mut current = raw
            .remove(name)
            .and_then(LocalAnnotation::from_stored)
            .unwrap_or_default();
        if let Some(pairings) = update.pairings {
            current.pairings = pairings;
        }
        if let Some(description) = update.description {
            current.description = description;
        }

        // Other entries are written back exactly as stored.
        raw.insert(name.to_string(), serde_json::to_value(&current)?);
        self.write_object(ANNOTATIONS_KEY, raw)?;
        info!("Annotation for {:?} updated", name);
        Ok(current)
    }

    /// Forget every personal rating.
    pub fn reset_ratings(&self) -> Result<()> {
        info!("Resetting all personal ratings");
        self.store.remove(PERSONAL_SCORES_KEY)
    }

    /// Forget every pairing and note.
    pub fn reset_notes(&self) -> Result<()> {
        info!("Resetting all notes and pairings");
        self.store.remove(ANNOTATIONS_KEY)
    }

    /// Wipe the whole store, cached wine list included.
    pub fn factory_reset(&self) -> Result<()> {
        info!("Factory reset: clearing all local data");
        self.store.clear()
    }

    fn read_object(&self, key: &str) -> Result<Map<String, Value>> {
        match self.store.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Map::new()),
        }
    }

    fn write_object(&self, key: &str, map: Map<String, Value>) -> Result<()> {
        self.store.set(key, &serde_json::to_string(&Value::Object(map))?)
    }
}

fn score_from(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.trunc().clamp(0.0, f64::from(MAX_PERSONAL_SCORE)) as u8)
}
