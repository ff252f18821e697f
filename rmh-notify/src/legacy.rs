//! Legacy flat-settings extraction
//!
//! Before the nested schema, every option lived as its own flat key under
//! the module namespace. The extractor pulls whatever subset of those keys
//! still exists in the store and hands it to the migration mapper as a
//! plain mapping. No validation happens here — absent keys stay absent and
//! values pass through untouched, so the mapper owns all defaulting.

use std::collections::HashMap;

use serde_json::Value;
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::error::Result;

/// A flat key → value mapping recovered from the legacy store.
///
/// Any subset of keys may be missing, so every accessor takes a fallback.
/// Flag accessors follow the source's truthiness semantics: `false`, `0`,
/// `""` and `null` are falsy, everything else is truthy, and `null` counts
/// as absent for defaulted reads.
#[derive(Debug, Clone, Default)]
pub struct LegacyFlatSettings {
    values: HashMap<String, Value>,
}

impl LegacyFlatSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from key/value pairs (used by tests and hosts that
    /// hold legacy settings outside the store).
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Flag read with a default for absent (or null) keys; present values
    /// are interpreted by truthiness.
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => is_truthy(v),
        }
    }

    /// Bare truthiness check: absent keys are falsy.
    pub fn truthy(&self, key: &str) -> bool {
        self.flag_or(key, false)
    }

    /// Numeric read; anything that is not a number takes the default.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// String read; non-string values read as absent.
    pub fn string_opt(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Raw pass-through with a fallback, for fields whose range enforcement
    /// belongs to the validator.
    pub fn value_or(&self, key: &str, default: Value) -> Value {
        match self.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => v.clone(),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Enumerate the store for keys under `<namespace>.`, strip the prefix, and
/// return the plain mapping. Zero matches is the "nothing to migrate" case
/// and returns an empty mapping, not an error.
///
/// Stored values are TEXT; each is parsed as JSON where possible and kept
/// as a plain string otherwise (legacy stores held both shapes).
pub async fn extract_legacy_settings(
    pool: &Pool<Sqlite>,
    namespace: &str,
) -> Result<LegacyFlatSettings> {
    let prefix = format!("{namespace}.");
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT key, value FROM settings WHERE key LIKE ?")
            .bind(format!("{prefix}%"))
            .fetch_all(pool)
            .await?;

    let values: HashMap<String, Value> = rows
        .into_iter()
        .map(|(full_key, raw)| {
            let key = full_key[prefix.len()..].to_string();
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect();

    debug!(namespace, count = values.len(), "extracted legacy settings");
    Ok(LegacyFlatSettings { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_settings_table;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_settings_table(&pool).await.unwrap();
        pool
    }

    async fn insert(pool: &Pool<Sqlite>, key: &str, value: &str) {
        sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn extracts_only_namespaced_keys_and_strips_prefix() {
        let db = setup_test_db().await;
        insert(&db, "raise-my-hand.playSound", "true").await;
        insert(&db, "raise-my-hand.chatimagewidth", "50").await;
        insert(&db, "core.language", "\"en\"").await;
        insert(&db, "other-module.playSound", "false").await;

        let legacy = extract_legacy_settings(&db, "raise-my-hand").await.unwrap();
        assert_eq!(legacy.len(), 2);
        assert_eq!(legacy.get("playSound"), Some(&json!(true)));
        assert_eq!(legacy.get("chatimagewidth"), Some(&json!(50)));
        assert_eq!(legacy.get("language"), None);
    }

    #[tokio::test]
    async fn empty_store_yields_empty_mapping() {
        let db = setup_test_db().await;
        let legacy = extract_legacy_settings(&db, "raise-my-hand").await.unwrap();
        assert!(legacy.is_empty());
    }

    #[tokio::test]
    async fn non_json_values_read_as_plain_strings() {
        let db = setup_test_db().await;
        // A bare path is not valid JSON but must survive extraction
        insert(&db, "raise-my-hand.warningsoundpath", "sounds/gong.ogg").await;

        let legacy = extract_legacy_settings(&db, "raise-my-hand").await.unwrap();
        assert_eq!(legacy.string_opt("warningsoundpath"), Some("sounds/gong.ogg"));
    }

    #[test]
    fn truthiness_matches_source_semantics() {
        let legacy = LegacyFlatSettings::from_pairs([
            ("t_bool", json!(true)),
            ("f_bool", json!(false)),
            ("zero", json!(0)),
            ("num", json!(0.4)),
            ("empty", json!("")),
            ("path", json!("a/b.ogg")),
            ("null", json!(null)),
        ]);

        assert!(legacy.truthy("t_bool"));
        assert!(!legacy.truthy("f_bool"));
        assert!(!legacy.truthy("zero"));
        assert!(legacy.truthy("num"));
        assert!(!legacy.truthy("empty"));
        assert!(legacy.truthy("path"));
        assert!(!legacy.truthy("null"));
        assert!(!legacy.truthy("missing"));

        // Nullish defaulting: null and missing take the default, false does not
        assert!(legacy.flag_or("null", true));
        assert!(legacy.flag_or("missing", true));
        assert!(!legacy.flag_or("f_bool", true));
    }
}
