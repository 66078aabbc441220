use std::path::PathBuf;
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;
use regionator_core::{load_region, to_records, FieldTranslationTable, FileSystemProvider};

use crate::{report_region_error, OutputFormat};

/// Builds and serializes each file in memory; nothing is written.
pub(crate) fn cmd_check(
    files: &[PathBuf],
    table: &FieldTranslationTable,
    output: OutputFormat,
    quiet: bool,
) {
    // Identities are discarded after the check.
    let mut rng = StdRng::seed_from_u64(0);
    let mut failed = 0usize;

    for file in files {
        let result = load_region(file, &FileSystemProvider, &mut rng)
            .and_then(|region| to_records(&region, table).map(|_| region));
        match result {
            Ok(region) => {
                if quiet {
                    continue;
                }
                match output {
                    OutputFormat::Text => {
                        println!("ok {}: {} mods", region.name(), region.mod_count())
                    }
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::json!({
                            "region": region.name(),
                            "mods": region.mod_count(),
                            "valid": true,
                        })
                    ),
                }
            }
            Err(e) => {
                report_region_error(&e, output, quiet);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        process::exit(1);
    }
}
