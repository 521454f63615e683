// Rendering through the Graphviz layout engine.
//
// The engine writes into a temporary file inside the output directory; the
// file is checked and then moved over the target, so a failed render leaves
// neither a partial image nor a stray temp file behind.

use crate::config::{LayoutEngine, OutputConfig, OutputFormat, RenderConfig};
use crate::diagram::ArchGraph;
use crate::error::{Error, Result};
use crate::output::dot::{digest, DotWriter};
use graphviz_rust::cmd::{CommandArg, Format, Layout};
use graphviz_rust::exec_dot;
use log::{debug, info};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// First eight bytes of every PNG file
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Graphviz program run by the renderer
pub const ENGINE: &str = "dot";

/// Result of a render
#[derive(Debug, Clone)]
pub struct RenderReport {
    /// Written artifact
    pub output_path: PathBuf,
    /// DOT source, when kept
    pub source_path: Option<PathBuf>,
    /// Size of the artifact in bytes
    pub bytes: u64,
    /// SHA-256 of the DOT description
    pub digest: String,
}

impl RenderReport {
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} ({} bytes, description {})",
            self.output_path.display(),
            self.bytes,
            &self.digest[..12.min(self.digest.len())]
        )
    }
}

/// Drives the external layout engine
pub struct Renderer {
    layout: LayoutEngine,
    keep_source: bool,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            layout: config.layout,
            keep_source: config.keep_source,
        }
    }

    pub fn layout(&self) -> LayoutEngine {
        self.layout
    }

    /// Run the engine on an empty graph
    pub fn is_engine_available(&self) -> bool {
        exec_dot(
            "digraph {}".to_string(),
            vec![CommandArg::Format(Format::Dot)],
        )
        .is_ok()
    }

    /// Lay out `graph` and write it as configured by `output`
    pub fn render(&self, graph: &ArchGraph, output: &OutputConfig) -> Result<RenderReport> {
        prepare_dir(&output.directory, output.create_dirs)?;

        let dot = DotWriter::new().write(graph);
        let digest = digest(&dot);
        let output_path = output.output_path();

        if output.format == OutputFormat::Dot {
            std::fs::write(&output_path, &dot)?;
            info!("wrote DOT description to {}", output_path.display());
            return Ok(RenderReport {
                bytes: dot.len() as u64,
                source_path: Some(output_path.clone()),
                output_path,
                digest,
            });
        }

        let staged = tempfile::Builder::new()
            .prefix(&format!(".{}.", output.file_stem))
            .suffix(&format!(".{}", output.format.extension()))
            .tempfile_in(&output.directory)?;

        let args = vec![
            CommandArg::Format(graphviz_format(output.format)),
            CommandArg::Layout(graphviz_layout(self.layout)),
            CommandArg::Output(staged.path().to_string_lossy().into_owned()),
        ];
        debug!(
            "running {} -T{} -K{} into {}",
            ENGINE,
            output.format.extension(),
            self.layout.as_str(),
            staged.path().display()
        );

        exec_dot(dot.clone(), args).map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                Error::engine_unavailable(ENGINE, e.to_string())
            }
            _ => Error::Render(e.to_string().trim().to_string()),
        })?;

        if output.format == OutputFormat::Png {
            verify_png(staged.path())?;
        }
        let bytes = std::fs::metadata(staged.path())?.len();
        if bytes == 0 {
            return Err(Error::invalid_output(&output_path, "engine produced an empty file"));
        }

        staged.persist(&output_path).map_err(|e| Error::Io(e.error))?;

        let source_path = if self.keep_source {
            let kept = output.source_path();
            std::fs::write(&kept, &dot)?;
            Some(kept)
        } else {
            None
        };

        info!("rendered {} ({} bytes)", output_path.display(), bytes);

        Ok(RenderReport {
            output_path,
            source_path,
            bytes,
            digest,
        })
    }
}

fn graphviz_format(format: OutputFormat) -> Format {
    match format {
        OutputFormat::Png => Format::Png,
        OutputFormat::Svg => Format::Svg,
        OutputFormat::Pdf => Format::Pdf,
        OutputFormat::Dot => Format::Dot,
    }
}

fn graphviz_layout(layout: LayoutEngine) -> Layout {
    match layout {
        LayoutEngine::Dot => Layout::Dot,
        LayoutEngine::Neato => Layout::Neato,
        LayoutEngine::Fdp => Layout::Fdp,
        LayoutEngine::Sfdp => Layout::Sfdp,
        LayoutEngine::Twopi => Layout::Twopi,
        LayoutEngine::Circo => Layout::Circo,
    }
}

fn prepare_dir(dir: &Path, create: bool) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if create {
        std::fs::create_dir_all(dir)?;
        return Ok(());
    }
    Err(Error::PathNotFound(dir.to_path_buf()))
}

/// Check whether `bytes` start with the PNG signature
pub fn has_png_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

fn verify_png(path: &Path) -> Result<()> {
    let mut header = [0u8; 8];
    let mut file = std::fs::File::open(path)?;
    let n = file.read(&mut header)?;
    if !has_png_signature(&header[..n]) {
        return Err(Error::invalid_output(path, "missing PNG signature"));
    }
    Ok(())
}
