//! A placed object ("mod") and its item record.

use crate::error::RegionError;
use crate::params::ParameterTable;
use crate::serialize::Emit;
use crate::translate::{self, FieldTranslationTable, CHOMP_START};
use rand::Rng;
use serde_json::{json, Map, Value};
use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Python-style capitalize: first character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Short random tag distinguishing same-kind mods in generated refs.
/// Four hex digits; collisions are possible and not guarded against.
pub fn generate_identity<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:04x}", rng.gen::<u16>())
}

pub fn context_ref(region_name: &str) -> String {
    format!("context-{}", region_name)
}

pub struct Mod {
    kind: String,
    identity: String,
    region_name: Rc<str>,
    params: ParameterTable,
    additional: ParameterTable,
    children: Vec<Rc<Mod>>,
    parent: OnceCell<Weak<Mod>>,
}

impl Mod {
    /// Construct a mod that owns `children` and wire each child's parent
    /// link back to it. Children must not already belong to another mod.
    pub fn new(
        region_name: Rc<str>,
        kind: impl Into<String>,
        identity: impl Into<String>,
        params: ParameterTable,
        additional: ParameterTable,
        children: Vec<Rc<Mod>>,
    ) -> Rc<Mod> {
        let m = Rc::new(Mod {
            kind: kind.into(),
            identity: identity.into(),
            region_name,
            params,
            additional,
            children,
            parent: OnceCell::new(),
        });
        for child in &m.children {
            let attached = child.parent.set(Rc::downgrade(&m)).is_ok();
            debug_assert!(attached, "mod {} is already attached to a container", child.kind);
        }
        m
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    pub fn additional_params(&self) -> &ParameterTable {
        &self.additional
    }

    pub fn children(&self) -> &[Rc<Mod>] {
        &self.children
    }

    pub fn parent(&self) -> Option<Rc<Mod>> {
        self.parent.get().and_then(Weak::upgrade)
    }

    /// This mod plus all of its descendants.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    pub fn output_name(&self) -> String {
        capitalize(&self.kind)
    }

    pub fn output_ref(&self) -> String {
        format!(
            "item-{}.{}.{}",
            self.kind,
            self.identity,
            self.region_name.replace('-', ".")
        )
    }

    /// Ref of whatever holds this mod: its parent mod, or the region context.
    pub fn container_ref(&self) -> String {
        match self.parent() {
            Some(p) => p.output_ref(),
            None => context_ref(&self.region_name),
        }
    }

    fn int_error(&self, field: &str, value: &str) -> RegionError {
        RegionError::InvalidNumber {
            field: field.to_owned(),
            value: value.to_owned(),
            kind: self.kind.clone(),
            identity: self.identity.clone(),
        }
    }

    fn optional_int(&self, key: &str) -> Result<Option<i64>, RegionError> {
        match self.params.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.int_error(key, raw)),
            None => Ok(None),
        }
    }

    /// The first of `keys` present must hold an integer; none present is a
    /// missing-field error reported under `keys[0]`.
    fn required_int(&self, keys: &[&str]) -> Result<i64, RegionError> {
        for key in keys {
            if let Some(n) = self.optional_int(key)? {
                return Ok(n);
            }
        }
        Err(RegionError::MissingField {
            field: keys[0].to_owned(),
            kind: self.kind.clone(),
            identity: self.identity.clone(),
        })
    }

    /// The entry inside the item record's `mods` list.
    pub fn detail(&self, table: &FieldTranslationTable) -> Result<Map<String, Value>, RegionError> {
        let name = self.output_name();
        let mut m = Map::new();
        m.insert("type".to_owned(), json!(name));
        m.insert("x".to_owned(), json!(self.required_int(&["x"])?));
        m.insert("y".to_owned(), json!(self.required_int(&["y"])?));
        m.insert(
            "orientation".to_owned(),
            json!(self.required_int(&["or", "orientation"])?),
        );
        if let Some(style) = self.optional_int("style")? {
            m.insert("style".to_owned(), json!(style));
        }
        if let Some(gr_state) = self.optional_int("gr_state")? {
            m.insert("gr_state".to_owned(), json!(gr_state));
        }
        let translated =
            translate::translate(&name, &self.identity, &self.additional, table, CHOMP_START)?;
        m.extend(translated);
        Ok(m)
    }
}

impl Emit for Mod {
    fn output_record(&self, table: &FieldTranslationTable) -> Result<Value, RegionError> {
        let mut m = Map::new();
        m.insert("type".to_owned(), json!("item"));
        m.insert("ref".to_owned(), json!(self.output_ref()));
        m.insert("name".to_owned(), json!(self.output_name()));
        m.insert(
            "mods".to_owned(),
            Value::Array(vec![Value::Object(self.detail(table)?)]),
        );
        m.insert("in".to_owned(), json!(self.container_ref()));
        Ok(Value::Object(m))
    }
}

impl fmt::Debug for Mod {
    // Parent is printed by ref only; following it would recurse forever.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mod")
            .field("kind", &self.kind)
            .field("identity", &self.identity)
            .field("params", &self.params)
            .field("additional", &self.additional)
            .field("children", &self.children)
            .field("in", &self.container_ref())
            .finish()
    }
}
