pub mod cli;
pub mod compress;
pub mod console;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::console::Console;
use crate::writer::WrittenLayer;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    logging::init(args.verbose);

    let console = args.console.console();
    let mut failed = 0usize;

    for input in &args.inputs {
        match process_file(
            console.as_ref(),
            input,
            args.output.as_deref(),
            !args.no_manifest,
        ) {
            Ok(out) => tracing::info!(
                input = %input.display(),
                layers = out.layers.len(),
                "exported"
            ),
            Err(e) => {
                failed += 1;
                tracing::error!(input = %input.display(), "{e:#}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} map(s) failed", args.inputs.len());
    }
    Ok(())
}

/// What one input produced.
#[derive(Debug)]
pub struct Exported {
    pub layers: Vec<WrittenLayer>,
    pub manifest: Option<PathBuf>,
}

/// Load, decode and export a single map.
///
/// Output lands in `out_dir`, or next to the map when it is `None`.
pub fn process_file(
    console: &dyn Console,
    path: &Path,
    out_dir: Option<&Path>,
    manifest: bool,
) -> anyhow::Result<Exported> {
    // 1. ── Parse ──────────────────────────────────────────────────────
    let raw = parser::load(path).with_context(|| format!("Loading {}", path.display()))?;

    // 2. ── Process ────────────────────────────────────────────────────
    let map = processor::run(raw).with_context(|| format!("Decoding {}", path.display()))?;

    // 3. ── Write outputs ──────────────────────────────────────────────
    let out_dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    if !out_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Creating {}", out_dir.display()))?;
    }

    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());

    let layers = writer::emit_layers(console, &map, &base, &out_dir)?;

    let manifest = if manifest {
        let m = writer::manifest::Manifest::new(console.name(), &map, &layers);
        let path = writer::manifest::emit(&m, &out_dir, &base).with_context(|| "Writing manifest")?;
        tracing::debug!(path = %path.display(), "wrote manifest");
        Some(path)
    } else {
        None
    };

    Ok(Exported { layers, manifest })
}
