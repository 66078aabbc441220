//! RDL -> record array pipeline.
//!
//! Thin orchestrator: lex, parse, build the region tree, serialize.

use crate::error::RegionError;
use crate::lexer;
use crate::parser;
use crate::region::{region_name_from_file, Region};
use crate::serialize;
use crate::source::{FileSystemProvider, SourceProvider};
use crate::translate::FieldTranslationTable;
use rand::Rng;
use serde_json::Value;
use std::path::Path;

/// Region name for a source path, from its file name.
pub fn region_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    region_name_from_file(&file_name)
}

/// Lex, parse and build the region tree for in-memory source text.
pub fn build_region<R: Rng + ?Sized>(
    name: &str,
    src: &str,
    filename: &str,
    rng: &mut R,
) -> Result<Region, RegionError> {
    let tokens = lexer::lex(src, filename)?;
    tracing::debug!(file = filename, tokens = tokens.len(), "lexed");
    let tree = parser::parse(&tokens, filename)?;
    Region::build(name, &tree, rng)
}

/// Read and build the region tree for the file at `path`.
pub fn load_region<R: Rng + ?Sized>(
    path: &Path,
    provider: &dyn SourceProvider,
    rng: &mut R,
) -> Result<Region, RegionError> {
    let src = provider
        .read_source(path)
        .map_err(|source| RegionError::Io {
            path: path.to_owned(),
            source,
        })?;
    build_region(&region_name(path), &src, &path.to_string_lossy(), rng)
}

/// Convert in-memory RDL text to the output record array.
pub fn convert_source<R: Rng + ?Sized>(
    name: &str,
    src: &str,
    filename: &str,
    table: &FieldTranslationTable,
    rng: &mut R,
) -> Result<Value, RegionError> {
    let region = build_region(name, src, filename, rng)?;
    Ok(Value::Array(serialize::to_records(&region, table)?))
}

/// Convert the RDL file at `path`, reading it through `provider`.
pub fn convert_with_provider<R: Rng + ?Sized>(
    path: &Path,
    provider: &dyn SourceProvider,
    table: &FieldTranslationTable,
    rng: &mut R,
) -> Result<Value, RegionError> {
    let region = load_region(path, provider, rng)?;
    Ok(Value::Array(serialize::to_records(&region, table)?))
}

/// Convert the RDL file at `path` from the filesystem.
pub fn convert<R: Rng + ?Sized>(
    path: &Path,
    table: &FieldTranslationTable,
    rng: &mut R,
) -> Result<Value, RegionError> {
    convert_with_provider(path, &FileSystemProvider, table, rng)
}
