//! regionator-core: Region Definition Language (RDL) to region JSON.
//!
//! The pipeline runs strictly forward:
//!
//! - [`lexer::lex`] / [`parser::parse`]: RDL text to a named-group parse tree
//! - [`ParameterTable::parse`]: `name: value;` token runs to a map
//! - [`Region::build`]: parse tree to the region and its mod forest
//! - [`translate::translate`]: positional extra params to named fields
//! - [`serialize::to_records`]: context record, then mods children-first
//!
//! [`convert()`] runs all of it for one file.

pub mod ast;
pub mod convert;
pub mod error;
pub mod lexer;
pub mod mod_node;
pub mod params;
pub mod parser;
pub mod region;
pub mod serialize;
pub mod source;
pub mod translate;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::ParseNode;
pub use convert::{convert, convert_source, convert_with_provider, load_region};
pub use error::RegionError;
pub use mod_node::Mod;
pub use params::ParameterTable;
pub use region::{Region, MAX_DEPTH};
pub use serialize::{check_forward_refs, to_records, Emit};
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use translate::{FieldTranslationTable, KindTranslation};
