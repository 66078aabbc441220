//! Parse tree produced by the RDL parser.
//!
//! The tree is a generic nest of named groups rather than a typed AST: the
//! region builder looks groups up by name (`region_params`, `mods`, `mod`,
//! `inner_mod_1_params`, ...) and reports a missing group as malformed input.

use crate::error::RegionError;

pub const REGION_PARAMS: &str = "region_params";
pub const MODS: &str = "mods";

/// Group name prefix for a mod at the given nesting depth:
/// `mod` at the top level, `inner_mod_N` below it.
pub fn mod_group_name(depth: usize) -> String {
    if depth == 0 {
        "mod".to_owned()
    } else {
        format!("inner_mod_{}", depth)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseNode {
    pub name: String,
    /// Leaf tokens in source order (parameter groups and identifiers).
    pub tokens: Vec<String>,
    pub children: Vec<ParseNode>,
    pub line: u32,
}

impl ParseNode {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        ParseNode {
            name: name.into(),
            line,
            ..Default::default()
        }
    }

    pub fn with_tokens(name: impl Into<String>, line: u32, tokens: Vec<String>) -> Self {
        ParseNode {
            name: name.into(),
            tokens,
            children: Vec::new(),
            line,
        }
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Like [`child`](Self::child), but a missing group is a malformed-input error.
    pub fn require(&self, name: &str) -> Result<&ParseNode, RegionError> {
        self.child(name).ok_or_else(|| RegionError::malformed(name))
    }

    /// All direct children with the given name, in source order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParseNode> {
        self.children.iter().filter(move |c| c.name == name)
    }
}
