//! The region: root of the mod forest, and its context record.

use crate::ast::{mod_group_name, ParseNode, MODS, REGION_PARAMS};
use crate::error::RegionError;
use crate::mod_node::{context_ref, generate_identity, Mod};
use crate::params::ParameterTable;
use crate::serialize::Emit;
use crate::translate::FieldTranslationTable;
use rand::Rng;
use serde_json::{json, Map, Value};
use std::rc::Rc;

/// Deepest `inner_mod_N` level the builder follows. Anything nested below
/// it is dropped with a warning.
pub const MAX_DEPTH: usize = 3;

pub const CONTEXT_CAPACITY: i64 = 6;
pub const NITTY_BITS: i64 = 3;

/// Neighbor parameter keys in output slot order.
pub const NEIGHBOR_KEYS: [&str; 4] = ["north", "east", "south", "west"];

/// Map a `region_orientation` value to its output id.
pub fn orientation_id(facing: &str) -> Option<i64> {
    match facing {
        "FACE_WEST" => Some(0),
        "FACE_NORTH" => Some(1),
        "FACE_EAST" => Some(2),
        "FACE_SOUTH" => Some(3),
        _ => None,
    }
}

/// Region name for an RDL file name: the last dot-separated segment before
/// the extension (`town-hall.rdl` -> `town-hall`, `a.b.rdl` -> `b`).
pub fn region_name_from_file(file_name: &str) -> String {
    let mut parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() > 1 {
        parts.pop();
    }
    parts.last().copied().unwrap_or_default().to_owned()
}

#[derive(Debug)]
pub struct Region {
    name: Rc<str>,
    params: ParameterTable,
    mods: Vec<Rc<Mod>>,
}

impl Region {
    pub fn new(name: &str, params: ParameterTable) -> Self {
        Region {
            name: Rc::from(name),
            params,
            mods: Vec::new(),
        }
    }

    /// Build the region and its mod forest from a parse tree.
    /// Mod identities are drawn from `rng`.
    pub fn build<R: Rng + ?Sized>(
        name: &str,
        tree: &ParseNode,
        rng: &mut R,
    ) -> Result<Region, RegionError> {
        let params = ParameterTable::parse(&tree.require(REGION_PARAMS)?.tokens);
        let mut region = Region::new(name, params);

        let mods = tree.require(MODS)?;
        let top_group = mod_group_name(0);
        for node in mods.children_named(&top_group) {
            let m = region.build_mod(node, 0, rng)?;
            region.mods.push(m);
        }
        tracing::debug!(
            region = name,
            top_level = region.mods.len(),
            total = region.mod_count(),
            "built region"
        );
        Ok(region)
    }

    /// Children are built first so the container can wire their parent links.
    fn build_mod<R: Rng + ?Sized>(
        &self,
        node: &ParseNode,
        depth: usize,
        rng: &mut R,
    ) -> Result<Rc<Mod>, RegionError> {
        let prefix = mod_group_name(depth);
        let ident_group = format!("{}_identifier", prefix);
        let kind = node
            .require(&ident_group)?
            .tokens
            .first()
            .cloned()
            .ok_or_else(|| RegionError::malformed(&ident_group))?;

        let params = node
            .child(&format!("{}_params", prefix))
            .map(|g| ParameterTable::parse(&g.tokens))
            .unwrap_or_default();
        let additional = node
            .child(&format!("{}_params_additional", prefix))
            .map(|g| ParameterTable::parse(&g.tokens))
            .unwrap_or_default();

        let inner_group = mod_group_name(depth + 1);
        let mut children = Vec::new();
        if depth < MAX_DEPTH {
            for inner in node.children_named(&inner_group) {
                children.push(self.build_mod(inner, depth + 1, rng)?);
            }
        } else {
            let dropped = node.children_named(&inner_group).count();
            if dropped > 0 {
                tracing::warn!(
                    region = %self.name,
                    container = %kind,
                    line = node.line,
                    dropped,
                    max_depth = MAX_DEPTH,
                    "mods nested deeper than the maximum depth were dropped"
                );
            }
        }

        let identity = generate_identity(rng);
        Ok(Mod::new(
            self.name.clone(),
            kind,
            identity,
            params,
            additional,
            children,
        ))
    }

    /// Append a top-level mod built elsewhere.
    pub fn push_mod(&mut self, m: Rc<Mod>) {
        self.mods.push(m);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    pub fn mods(&self) -> &[Rc<Mod>] {
        &self.mods
    }

    /// Total number of mods in the forest, nested ones included.
    pub fn mod_count(&self) -> usize {
        self.mods.iter().map(|m| m.subtree_len()).sum()
    }

    pub fn context_ref(&self) -> String {
        context_ref(&self.name)
    }

    /// `[N, E, S, W]` context refs; absent directions are empty strings.
    pub fn neighbors(&self) -> [String; 4] {
        NEIGHBOR_KEYS.map(|key| match self.params.get(key) {
            Some(target) => {
                let prefix = target.split('.').next().unwrap_or_default();
                context_ref(prefix)
            }
            None => String::new(),
        })
    }

    /// Unrecognized facings are ignored rather than rejected.
    pub fn orientation(&self) -> Option<i64> {
        self.params
            .get("region_orientation")
            .and_then(orientation_id)
    }

    pub fn detail(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("town_dir".to_owned(), json!(""));
        m.insert("port_dir".to_owned(), json!(""));
        m.insert("type".to_owned(), json!("Region"));
        m.insert("nitty_bits".to_owned(), json!(NITTY_BITS));
        m.insert("neighbors".to_owned(), json!(self.neighbors()));
        if let Some(o) = self.orientation() {
            m.insert("orientation".to_owned(), json!(o));
        }
        m
    }
}

impl Emit for Region {
    fn output_record(&self, _table: &FieldTranslationTable) -> Result<Value, RegionError> {
        let mut m = Map::new();
        m.insert("type".to_owned(), json!("context"));
        m.insert("ref".to_owned(), json!(self.context_ref()));
        m.insert("capacity".to_owned(), json!(CONTEXT_CAPACITY));
        m.insert(
            "name".to_owned(),
            json!(format!("{} - Generated by Regionator", self.name)),
        );
        m.insert("mods".to_owned(), Value::Array(vec![Value::Object(self.detail())]));
        Ok(Value::Object(m))
    }
}
