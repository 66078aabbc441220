//! Parameter tables: `name: value;` token runs folded into a map.
//!
//! The scanner is permissive on purpose. A value with no preceding name, a
//! repeated terminator, or a trailing pair with no terminator never raises an
//! error; such input just yields a table missing or overwriting entries.

use std::collections::BTreeMap;

pub const NEWLINE: &str = "\n";
pub const SEPARATOR: char = ':';
pub const TERMINATOR: &str = ";";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    entries: BTreeMap<String, String>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a token run with a two-phase name/value state machine.
    ///
    /// - newline tokens are skipped
    /// - any token containing `:` switches to value mode and is dropped
    /// - `;` commits the pending pair and switches back to name mode
    /// - other tokens overwrite the pending name or pending value
    ///
    /// A terminator with no pending name commits nothing. A terminator with a
    /// name but no value yet commits the name with the most recent value seen,
    /// or an empty value if there has been none.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut table = ParameterTable::new();
        let mut name: Option<String> = None;
        let mut value: Option<String> = None;
        let mut on_name = true;

        for token in tokens {
            let token = token.as_ref();
            if token == NEWLINE {
                continue;
            } else if token.contains(SEPARATOR) {
                on_name = false;
            } else if token == TERMINATOR {
                if let Some(n) = &name {
                    table
                        .entries
                        .insert(n.clone(), value.clone().unwrap_or_default());
                }
                on_name = true;
            } else if on_name {
                name = Some(token.to_owned());
            } else {
                value = Some(token.to_owned());
            }
        }
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ParameterTable::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
