//! Field translation: re-keys a mod's positional "additional" parameters
//! into named output fields using the mod index.
//!
//! The mod index maps an output kind name (`Door`, `Sign`, ...) to a map of
//! positional slot -> field name. The special `CHOMP` entry names a field
//! that collects every slot at or past the end of the named slots as a list
//! of integers (e.g. sign text stored as character codes).

use crate::error::RegionError;
use crate::params::ParameterTable;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// First positional slot of additional parameters.
pub const CHOMP_START: i64 = 8;
pub const CHOMP_KEY: &str = "CHOMP";

/// A key inside one kind's translation entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TranslationKey {
    Index(i64),
    Chomp,
}

impl<'de> Deserialize<'de> for TranslationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = TranslationKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer slot index or \"CHOMP\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(TranslationKey::Index(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(TranslationKey::Index)
                    .map_err(|_| E::custom(format!("slot index {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == CHOMP_KEY {
                    return Ok(TranslationKey::Chomp);
                }
                v.trim()
                    .parse::<i64>()
                    .map(TranslationKey::Index)
                    .map_err(|_| E::custom(format!("invalid slot key '{}'", v)))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// Translation rules for one output kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindTranslation {
    pub fields: BTreeMap<i64, String>,
    pub chomp: Option<String>,
}

impl From<BTreeMap<TranslationKey, String>> for KindTranslation {
    fn from(raw: BTreeMap<TranslationKey, String>) -> Self {
        let mut kt = KindTranslation::default();
        for (key, field) in raw {
            match key {
                TranslationKey::Index(i) => {
                    kt.fields.insert(i, field);
                }
                TranslationKey::Chomp => kt.chomp = Some(field),
            }
        }
        kt
    }
}

/// The mod index, keyed by capitalized kind name. Loaded once and read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTranslationTable {
    kinds: BTreeMap<String, KindTranslation>,
}

type RawTable = BTreeMap<String, BTreeMap<TranslationKey, String>>;

impl FieldTranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: impl Into<String>, translation: KindTranslation) {
        self.kinds.insert(kind.into(), translation);
    }

    pub fn get(&self, kind: &str) -> Option<&KindTranslation> {
        self.kinds.get(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn from_raw(raw: RawTable) -> Self {
        FieldTranslationTable {
            kinds: raw.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }

    pub fn from_yaml_str(src: &str) -> Result<Self, RegionError> {
        // An empty document is an empty table, not an error
        if src.trim().is_empty() {
            return Ok(Self::new());
        }
        let raw: RawTable =
            serde_yaml::from_str(src).map_err(|e| RegionError::Config(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_json_str(src: &str) -> Result<Self, RegionError> {
        let raw: RawTable =
            serde_json::from_str(src).map_err(|e| RegionError::Config(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    /// Load from disk; `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, RegionError> {
        let src = std::fs::read_to_string(path).map_err(|source| RegionError::Io {
            path: path.to_owned(),
            source,
        })?;
        let table = if path.extension().is_some_and(|e| e == "json") {
            Self::from_json_str(&src)?
        } else {
            Self::from_yaml_str(&src)?
        };
        tracing::debug!(path = %path.display(), kinds = table.len(), "loaded mod index");
        Ok(table)
    }
}

/// Named fields get integers when the text parses as one, strings otherwise.
fn field_value(raw: &str) -> Value {
    match raw.trim().parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(raw.to_owned()),
    }
}

/// Translate `additional` params of a mod of output kind `kind` into named
/// output fields.
///
/// Each named slot found in `additional` is copied to its field. The chomp
/// cursor starts at `chomp_start` and advances once per named slot in the
/// table, hit or miss; the chomp field then receives every slot at or past
/// the cursor, sorted by slot index. Kinds absent from the table yield no
/// fields.
pub fn translate(
    kind: &str,
    identity: &str,
    additional: &ParameterTable,
    table: &FieldTranslationTable,
    chomp_start: i64,
) -> Result<Map<String, Value>, RegionError> {
    let mut out = Map::new();
    if additional.is_empty() {
        return Ok(out);
    }
    let Some(translation) = table.get(kind) else {
        tracing::debug!(kind, identity, "no mod index entry; additional params dropped");
        return Ok(out);
    };

    let mut cursor = chomp_start;
    for (index, field) in &translation.fields {
        if let Some(raw) = additional.get(&index.to_string()) {
            out.insert(field.clone(), field_value(raw));
        }
        cursor += 1;
    }

    if let Some(chomp_field) = &translation.chomp {
        let invalid = |field: String, value: &str| RegionError::InvalidNumber {
            field,
            value: value.to_owned(),
            kind: kind.to_owned(),
            identity: identity.to_owned(),
        };
        let mut slots: Vec<(i64, &str)> = Vec::with_capacity(additional.len());
        for (key, value) in additional.iter() {
            let slot = key
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid("additional parameter index".to_owned(), key))?;
            slots.push((slot, value));
        }
        slots.sort_by_key(|(slot, _)| *slot);

        let mut chomped = Vec::new();
        for (slot, value) in slots.into_iter().filter(|(slot, _)| *slot >= cursor) {
            let n = value
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid(format!("{}[{}]", chomp_field, slot), value))?;
            chomped.push(Value::from(n));
        }
        out.insert(chomp_field.clone(), Value::Array(chomped));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn radio_table() -> FieldTranslationTable {
        FieldTranslationTable::from_yaml_str("Radio:\n  8: power\n  CHOMP: message\n").unwrap()
    }

    fn additional(pairs: &[(&str, &str)]) -> ParameterTable {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn yaml_keys_accept_ints_strings_and_chomp() {
        let t = FieldTranslationTable::from_yaml_str(
            "Door:\n  8: open_flags\n  '9': key_lo\n  CHOMP: rest\n",
        )
        .unwrap();
        let door = t.get("Door").unwrap();
        assert_eq!(door.fields.get(&8).map(String::as_str), Some("open_flags"));
        assert_eq!(door.fields.get(&9).map(String::as_str), Some("key_lo"));
        assert_eq!(door.chomp.as_deref(), Some("rest"));
    }

    #[test]
    fn json_table_loads() {
        let t = FieldTranslationTable::from_json_str(r#"{"Sign": {"CHOMP": "ascii"}}"#).unwrap();
        assert_eq!(t.get("Sign").unwrap().chomp.as_deref(), Some("ascii"));
    }

    #[test]
    fn bad_key_is_config_error() {
        let err = FieldTranslationTable::from_yaml_str("Door:\n  eight: open_flags\n").unwrap_err();
        assert!(matches!(err, RegionError::Config(_)), "{:?}", err);
    }

    #[test]
    fn named_slot_and_chomp_tail() {
        let add = additional(&[("8", "1"), ("9", "72"), ("10", "73")]);
        let out = translate("Radio", "ab12", &add, &radio_table(), CHOMP_START).unwrap();
        assert_eq!(out.get("power"), Some(&json!(1)));
        assert_eq!(out.get("message"), Some(&json!([72, 73])));
    }

    #[test]
    fn cursor_advances_on_missing_named_slot() {
        // slot 8 absent: power is not emitted, but 8 is still consumed
        let add = additional(&[("9", "72"), ("10", "73")]);
        let out = translate("Radio", "ab12", &add, &radio_table(), CHOMP_START).unwrap();
        assert!(out.get("power").is_none());
        assert_eq!(out.get("message"), Some(&json!([72, 73])));
    }

    #[test]
    fn chomp_orders_numerically_not_lexically() {
        let t = FieldTranslationTable::from_yaml_str("Sign:\n  CHOMP: ascii\n").unwrap();
        let add = additional(&[("10", "3"), ("8", "1"), ("9", "2")]);
        let out = translate("Sign", "x", &add, &t, CHOMP_START).unwrap();
        assert_eq!(out.get("ascii"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn chomp_with_no_remaining_slots_is_empty_list() {
        let add = additional(&[("8", "1")]);
        let out = translate("Radio", "x", &add, &radio_table(), CHOMP_START).unwrap();
        assert_eq!(out.get("message"), Some(&json!([])));
    }

    #[test]
    fn no_additional_params_means_no_chomp_field() {
        let out = translate(
            "Radio",
            "x",
            &ParameterTable::new(),
            &radio_table(),
            CHOMP_START,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_kind_drops_everything() {
        let add = additional(&[("8", "1")]);
        let out = translate("Chair", "x", &add, &radio_table(), CHOMP_START).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn non_numeric_named_value_stays_string() {
        let t = FieldTranslationTable::from_yaml_str("Door:\n  8: connection\n").unwrap();
        let add = additional(&[("8", "context-hall")]);
        let out = translate("Door", "x", &add, &t, CHOMP_START).unwrap();
        assert_eq!(out.get("connection"), Some(&json!("context-hall")));
    }

    #[test]
    fn non_numeric_chomp_value_is_fatal() {
        let add = additional(&[("9", "H")]);
        let err = translate("Radio", "ab12", &add, &radio_table(), CHOMP_START).unwrap_err();
        match err {
            RegionError::InvalidNumber {
                field,
                value,
                identity,
                ..
            } => {
                assert_eq!(field, "message[9]");
                assert_eq!(value, "H");
                assert_eq!(identity, "ab12");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }
}
