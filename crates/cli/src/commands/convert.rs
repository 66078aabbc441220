use std::path::{Path, PathBuf};
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;
use regionator_core::convert::region_name;
use regionator_core::FieldTranslationTable;

use crate::{report_error, report_region_error, OutputFormat};

pub(crate) struct ConvertOptions<'a> {
    pub out: Option<&'a Path>,
    pub seed: Option<u64>,
    pub compact: bool,
    pub output: OutputFormat,
    pub quiet: bool,
}

fn render(value: &serde_json::Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|e| format!("serialization error: {}", e))
}

pub(crate) fn cmd_convert(files: &[PathBuf], table: &FieldTranslationTable, opts: ConvertOptions) {
    if files.len() > 1 && opts.out.is_none() {
        report_error(
            "error: --out is required when converting more than one file",
            opts.output,
            opts.quiet,
        );
        process::exit(1);
    }

    if let Some(dir) = opts.out {
        if let Err(e) = std::fs::create_dir_all(dir) {
            let msg = format!("error creating '{}': {}", dir.display(), e);
            report_error(&msg, opts.output, opts.quiet);
            process::exit(1);
        }
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut failed = 0usize;
    for file in files {
        let records = match regionator_core::convert(file, table, &mut rng) {
            Ok(v) => v,
            Err(e) => {
                report_region_error(&e, opts.output, opts.quiet);
                failed += 1;
                continue;
            }
        };
        let text = render(&records, opts.compact);

        match opts.out {
            None => println!("{}", text),
            Some(dir) => {
                let target = dir.join(format!("{}.json", region_name(file)));
                if let Err(e) = std::fs::write(&target, text + "\n") {
                    let msg = format!("error writing '{}': {}", target.display(), e);
                    report_error(&msg, opts.output, opts.quiet);
                    failed += 1;
                    continue;
                }
                if !opts.quiet {
                    match opts.output {
                        OutputFormat::Text => println!("wrote {}", target.display()),
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::json!({
                                "source": file.display().to_string(),
                                "written": target.display().to_string(),
                            })
                        ),
                    }
                }
            }
        }
    }

    if failed > 0 {
        process::exit(1);
    }
}
