//! drugcheck-arch - Build and render the DrugCheck architecture diagram
//!
//! Declares the DrugCheck system architecture as a clustered, labeled graph
//! and hands it to the Graphviz `dot` engine, which writes
//! `DrugCheck_IEEE_Architecture.png` at 300 dpi.

pub mod cli;
pub mod config;
pub mod diagram;
pub mod error;
pub mod output;

// Re-export main types
pub use config::{Config, LayoutEngine, OutputConfig, OutputFormat, RenderConfig};
pub use diagram::{drugcheck_architecture, ArchGraph, Edge, GraphStats, Node};
pub use error::{Error, Result};
pub use output::{DotWriter, RenderReport, Renderer};

/// Build the diagram with default settings and render it into the
/// working directory, overwriting any previous image.
pub fn build_and_render() -> Result<RenderReport> {
    render_with(&Config::default())
}

/// Build the diagram and render it as configured
pub fn render_with(config: &Config) -> Result<RenderReport> {
    config.validate()?;
    let graph = drugcheck_architecture(config.output.dpi)?;
    Renderer::new(&config.render).render(&graph, &config.output)
}

/// DOT description of the diagram at `dpi`
pub fn describe_dot(dpi: u32) -> Result<String> {
    let graph = drugcheck_architecture(dpi)?;
    Ok(DotWriter::new().write(&graph))
}
