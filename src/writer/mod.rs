//! Everything that touches the output directory.
pub mod layer;
pub mod manifest;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::console::Console;
use crate::model::Map;

pub use layer::{LayerMode, LayerReport, export_layer};

/// A layer file that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WrittenLayer {
    #[serde(flatten)]
    pub report: LayerReport,
    pub file: String,
    pub bytes: usize,
}

/// `<out_dir>/<base>.<layer>.layer`
pub fn layer_path(out_dir: &Path, base: &str, layer: &str) -> PathBuf {
    let layer: String = layer
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    out_dir.join(format!("{base}.{layer}.layer"))
}

/// Export every layer of `map` into its own file.
///
/// Each layer is rendered in memory first, so a layer that fails its checks
/// leaves no file behind. Layers before it are already written.
pub fn emit_layers(
    console: &dyn Console,
    map: &Map,
    base: &str,
    out_dir: &Path,
) -> Result<Vec<WrittenLayer>> {
    let mut written = Vec::with_capacity(map.layers.len());

    for layer in &map.layers {
        let mut buf = Vec::new();
        let report = export_layer(console, map, layer, &mut buf)
            .with_context(|| format!("Exporting layer `{}`", layer.name))?;

        let path = layer_path(out_dir, base, &layer.name);
        fs::write(&path, &buf).with_context(|| format!("Writing {}", path.display()))?;
        tracing::info!(
            layer = %layer.name,
            path = %path.display(),
            bytes = buf.len(),
            mode = ?report.mode,
            "wrote layer"
        );

        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        written.push(WrittenLayer {
            report,
            file,
            bytes: buf.len(),
        });
    }

    Ok(written)
}
