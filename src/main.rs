//! Struge CLI
//!
//! Usage:
//!   struge [OPTIONS]
//!
//! Options:
//!   -p, --project <FILE>         Main YAML project layout
//!   -c, --components <FILE>      YAML component library
//!   -i, --implementation <FILE>  YAML implementation templates
//!   -o, --output <FILE>          Generated output
//!       --config <FILE>          TOML config file (default: struge.toml if present)
//!       --dump-tree              Print the resolved tree as JSON
//!       --stdout                 Print the document instead of writing it
//!   -v, --verbose                More log output (repeatable)
//!   -h, --help                   Print help

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use struge::{resolve_document, Config, DefinitionStore, LoadError, Renderer};

#[derive(Parser)]
#[command(name = "struge")]
#[command(about = "Render a document from layered YAML model, component and layout definitions")]
struct Cli {
    /// The main YAML project layout [default: project.yaml]
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// The YAML component library [default: components.yaml]
    #[arg(short, long)]
    components: Option<PathBuf>,

    /// The YAML implementation (layout templates) [default: implementation.yaml]
    #[arg(short, long)]
    implementation: Option<PathBuf>,

    /// The generated output [default: dist/index.html]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file (struge.toml is used when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the resolved tree as JSON before rendering
    #[arg(long)]
    dump_tree: bool,

    /// Print the document to stdout instead of writing the output file
    #[arg(long)]
    stdout: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Flags take precedence over the config file
    fn apply(&self, mut config: Config) -> Config {
        if let Some(path) = &self.project {
            config.sources.project = path.clone();
        }
        if let Some(path) = &self.components {
            config.sources.components = path.clone();
        }
        if let Some(path) = &self.implementation {
            config.sources.implementation = path.clone();
        }
        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::discover(cli.config.as_deref()) {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    let (store, diagnostics) = DefinitionStore::load(&config.sources);
    for diagnostic in &diagnostics {
        report_load_error(diagnostic);
    }

    let tree = match resolve_document(&store, &config.resolve) {
        Ok(tree) => tree,
        Err(e) => {
            error!("{}", e);
            eprintln!("FATAL: {} - Aborting..", e);
            process::exit(1);
        }
    };

    if cli.dump_tree {
        match serde_json::to_string_pretty(&tree) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing tree: {}", e),
        }
    }

    let document = match Renderer::new(&config.render).render(&tree) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if cli.stdout {
        print!("{}", document);
        return;
    }

    if let Err(e) = write_output(&config.output.path, &document) {
        eprintln!("Error writing '{}': {}", config.output.path.display(), e);
        process::exit(1);
    }
    info!(path = %config.output.path.display(), bytes = document.len(), "wrote document");
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "struge=warn",
        1 => "struge=info",
        _ => "struge=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Show where a malformed source went wrong; missing sources are already
/// logged and simply leave their table empty
fn report_load_error(err: &LoadError) {
    if err.span().is_none() {
        return;
    }
    let path = err.path();
    match fs::read_to_string(path) {
        Ok(source) => eprint!("{}", err.format(&source, &path.display().to_string())),
        Err(_) => eprintln!("{}", err),
    }
}

fn write_output(path: &Path, document: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document)
}
