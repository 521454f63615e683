use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "drugcheck-arch.toml";

/// File stem of the rendered diagram
pub const DEFAULT_FILE_STEM: &str = "DrugCheck_IEEE_Architecture";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub render: RenderConfig,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub file_stem: String,
    pub format: OutputFormat,
    pub dpi: u32,
    pub create_dirs: bool,
}

/// Layout engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Graphviz layout algorithm passed as `-K`
    pub layout: LayoutEngine,
    /// Keep the intermediate DOT source next to the image
    pub keep_source: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Dot,
}

/// Graphviz layout algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    #[default]
    Dot,
    Neato,
    Fdp,
    Sfdp,
    Twopi,
    Circo,
}

impl LayoutEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutEngine::Dot => "dot",
            LayoutEngine::Neato => "neato",
            LayoutEngine::Fdp => "fdp",
            LayoutEngine::Sfdp => "sfdp",
            LayoutEngine::Twopi => "twopi",
            LayoutEngine::Circo => "circo",
        }
    }

    /// Parse a user-supplied layout name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Some(LayoutEngine::Dot),
            "neato" => Some(LayoutEngine::Neato),
            "fdp" => Some(LayoutEngine::Fdp),
            "sfdp" => Some(LayoutEngine::Sfdp),
            "twopi" => Some(LayoutEngine::Twopi),
            "circo" => Some(LayoutEngine::Circo),
            _ => None,
        }
    }
}

impl OutputFormat {
    /// File extension and Graphviz `-T` value
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "gv",
        }
    }

    /// Parse a user-supplied format name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            "pdf" => Some(OutputFormat::Pdf),
            "dot" | "gv" => Some(OutputFormat::Dot),
            _ => None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_stem: DEFAULT_FILE_STEM.to_string(),
            format: OutputFormat::default(),
            dpi: 300,
            create_dirs: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: LayoutEngine::default(),
            keep_source: false,
        }
    }
}

impl OutputConfig {
    /// Full path of the rendered artifact
    pub fn output_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.file_stem, self.format.extension()))
    }

    /// Path of the DOT source kept when `keep_source` is set
    pub fn source_path(&self) -> PathBuf {
        self.directory.join(format!("{}.gv", self.file_stem))
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults.
    ///
    /// A file that exists but fails to load or validate is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    warn!("ignoring config {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output_dir: Option<PathBuf>,
        format: Option<String>,
        dpi: Option<u32>,
        layout: Option<String>,
        keep_source: bool,
    ) -> Result<()> {
        if let Some(dir) = output_dir {
            self.output.directory = dir;
        }

        if let Some(fmt) = format {
            self.output.format = OutputFormat::parse(&fmt)
                .ok_or_else(|| Error::config_validation(format!("unknown format: {}", fmt)))?;
        }

        if let Some(d) = dpi {
            self.output.dpi = d;
        }

        if let Some(l) = layout {
            self.render.layout = LayoutEngine::parse(&l)
                .ok_or_else(|| Error::config_validation(format!("unknown layout: {}", l)))?;
        }

        if keep_source {
            self.render.keep_source = true;
        }

        self.validate()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.dpi == 0 {
            return Err(Error::config_validation("dpi must be at least 1"));
        }

        if self.output.dpi > 2400 {
            return Err(Error::config_validation("dpi cannot exceed 2400"));
        }

        if self.output.file_stem.trim().is_empty() {
            return Err(Error::config_validation("file_stem must not be empty"));
        }

        if self.output.file_stem.contains(['/', '\\']) {
            return Err(Error::config_validation(
                "file_stem must not contain path separators",
            ));
        }

        Ok(())
    }
}
