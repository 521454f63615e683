//! CLI module for drugcheck-arch

mod args;

pub use args::{Args, Command};

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::diagram::architecture::{self, ACTOR};
use crate::diagram::{drugcheck_architecture, ArchGraph};
use crate::error::Result;
use crate::output::{digest, DotWriter, Renderer};
use log::{debug, error, info, LevelFilter};
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(&args.log_level);
    debug!("parsed arguments: {:?}", args);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", level);
        LevelFilter::Warn
    });

    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        // An explicit config must load; the implicit one is optional
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))),
    }
}

fn execute(args: Args) -> Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    debug!("configuration: {:?}", cfg);

    match args.command {
        None => render(&cfg),

        Some(Command::Render {
            output_dir,
            format,
            dpi,
            layout,
            keep_source,
        }) => {
            cfg.merge_cli(output_dir, format, dpi, layout, keep_source)?;
            render(&cfg)
        }

        Some(Command::Dot { output }) => {
            let graph = drugcheck_architecture(cfg.output.dpi)?;
            let dot = DotWriter::new().write(&graph);
            match output {
                Some(path) => {
                    std::fs::write(&path, &dot)?;
                    println!("DOT written to: {}", path.display());
                }
                None => print!("{}", dot),
            }
            Ok(())
        }

        Some(Command::Check) => {
            let graph = drugcheck_architecture(cfg.output.dpi)?;
            graph.validate()?;
            print!("{}", check_report(&graph));
            Ok(())
        }

        Some(Command::Describe) => {
            let graph = drugcheck_architecture(cfg.output.dpi)?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
            Ok(())
        }

        Some(Command::Version) => {
            println!("drugcheck-arch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn render(cfg: &Config) -> Result<()> {
    let renderer = Renderer::new(&cfg.render);
    info!("rendering with layout {}", renderer.layout().as_str());

    let graph = drugcheck_architecture(cfg.output.dpi)?;
    let stats = graph.stats();
    println!(
        "Diagram: {} nodes, {} clusters, {} edges",
        stats.nodes, stats.clusters, stats.edges
    );

    let report = renderer.render(&graph, &cfg.output)?;
    println!("{}", report.summary());
    if let Some(source) = &report.source_path {
        if *source != report.output_path {
            println!("DOT source kept at: {}", source.display());
        }
    }
    Ok(())
}

/// Human-readable integrity report
fn check_report(graph: &ArchGraph) -> String {
    let mut out = String::new();
    let stats = graph.stats();

    out.push_str("Graph integrity: ok\n");
    for name in [
        architecture::CONTEXT,
        architecture::PRESENTATION,
        architecture::BUSINESS,
        architecture::DATA,
    ] {
        if let Some(id) = graph.cluster_by_name(name) {
            let label = graph.get_cluster(id).map(|c| c.label.as_str()).unwrap_or(name);
            out.push_str(&format!("  {}: {} nodes\n", label, graph.nodes_within(id).len()));
        }
    }
    out.push_str(&format!("Nodes: {}\n", stats.nodes));
    out.push_str(&format!("Edges: {}\n", stats.edges));

    let unreachable = graph.unreachable_from(ACTOR);
    if unreachable.is_empty() {
        out.push_str(&format!("All nodes reachable from {}\n", ACTOR));
    } else {
        out.push_str(&format!(
            "Not reachable from {}: {}\n",
            ACTOR,
            unreachable.join(", ")
        ));
    }

    out.push_str(&format!("Digest: {}\n", digest(&DotWriter::new().write(graph))));
    out
}
