//! Flattening a region into its output record sequence.
//!
//! The context record comes first. Mods follow in post-order: every mod's
//! descendants are emitted before the mod itself, so each record's `in`
//! names either the context or a record already emitted.

use crate::error::RegionError;
use crate::mod_node::Mod;
use crate::region::Region;
use crate::translate::FieldTranslationTable;
use serde_json::Value;
use std::collections::HashSet;
use std::rc::Rc;

/// Anything that becomes one output record.
pub trait Emit {
    fn output_record(&self, table: &FieldTranslationTable) -> Result<Value, RegionError>;
}

fn collect_post_order<'a>(mods: &'a [Rc<Mod>], out: &mut Vec<&'a dyn Emit>) {
    for m in mods {
        collect_post_order(m.children(), out);
        out.push(&**m);
    }
}

/// Entities in emission order: the region, then every mod children-first.
pub fn emission_order(region: &Region) -> Vec<&dyn Emit> {
    let mut out: Vec<&dyn Emit> = Vec::with_capacity(region.mod_count() + 1);
    out.push(region);
    collect_post_order(region.mods(), &mut out);
    out
}

/// Build every record. The first failing record aborts the whole sequence.
pub fn to_records(
    region: &Region,
    table: &FieldTranslationTable,
) -> Result<Vec<Value>, RegionError> {
    let records = emission_order(region)
        .into_iter()
        .map(|e| e.output_record(table))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(region = region.name(), records = records.len(), "serialized region");
    Ok(records)
}

/// Check that every record's `in` names a `ref` that appears earlier in
/// `records`. Returns one message per violation.
pub fn check_forward_refs(records: &[Value]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut problems = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(container) = record.get("in").and_then(Value::as_str) {
            if !seen.contains(container) {
                problems.push(format!(
                    "record {} is in '{}', which is not emitted before it",
                    i, container
                ));
            }
        }
        if let Some(r) = record.get("ref").and_then(Value::as_str) {
            seen.insert(r);
        }
    }
    problems
}
