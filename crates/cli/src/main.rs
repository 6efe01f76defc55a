//! apidox CLI
//!
//! Command-line interface for loading Swagger 2.x and OpenAPI 3.x documents
//! and inspecting the resolved documentation model.

use anyhow::{bail, Context, Result};
use apidox_common::{Method, Specification, SuiteConfig};
use apidox_parser::ApiSuite;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidox")]
#[command(version, about = "Resolve Swagger and OpenAPI documents into a documentation model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Which documents to load
#[derive(clap::Args)]
struct SuiteArgs {
    /// Document files (JSON or YAML)
    specs: Vec<PathBuf>,

    /// Suite configuration file listing the documents to load
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Merge every document into a single specification
    #[arg(long)]
    collapse: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load documents and summarise the resolved groups, methods and resources
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect a single document\n  \
        apidox inspect petstore.json\n\n  \
        # Inspect every document of a suite, merged into one specification\n  \
        apidox inspect --config suite.yaml --collapse")]
    Inspect {
        #[command(flatten)]
        suite: SuiteArgs,
    },

    /// Load documents and print the resolved model
    #[command(after_help = "EXAMPLES:\n  \
        # Dump as JSON to stdout\n  \
        apidox dump petstore.yaml\n\n  \
        # Dump as YAML to a file\n  \
        apidox dump petstore.yaml --format yaml --output petstore.model.yaml")]
    Dump {
        #[command(flatten)]
        suite: SuiteArgs,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect { suite } => {
            let suite = load_suite(&suite)?;
            inspect_command(&suite, cli.verbose);
        }
        Commands::Dump {
            suite,
            format,
            output,
        } => {
            let suite = load_suite(&suite)?;
            dump_command(&suite, format, output.as_deref())?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_suite(args: &SuiteArgs) -> Result<ApiSuite> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::load(path)
            .with_context(|| format!("Failed to load suite configuration {}", path.display()))?,
        None => SuiteConfig::default(),
    };
    config.specs.extend(args.specs.iter().cloned());
    config.collapse |= args.collapse;

    if config.specs.is_empty() {
        bail!("No documents to load: pass document paths or --config");
    }
    debug!(specs = config.specs.len(), collapse = config.collapse, "Loading suite");

    let mut suite = ApiSuite::with_files(config.collapse);
    for path in &config.specs {
        eprintln!("{} Loading {}", "→".cyan(), path.display());
        suite
            .load(&path.display().to_string())
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    eprintln!(
        "{} Loaded {} specification(s)",
        "✓".green(),
        suite.len()
    );
    Ok(suite)
}

fn inspect_command(suite: &ApiSuite, verbose: bool) {
    for spec in suite.specifications() {
        print_specification(spec, verbose);
    }
}

fn print_specification(spec: &Specification, verbose: bool) {
    println!("\n{}", spec.info.title.bold());
    println!("  ID: {}", spec.id.yellow());
    if !spec.info.version.is_empty() {
        println!("  Version: {}", spec.info.version.yellow());
    }
    println!("  Groups: {}", spec.groups.len());
    println!("  Methods: {}", spec.methods().count());
    println!("  Resources: {}", spec.resources.len());

    for group in &spec.groups {
        println!("\n  {} ({})", group.name.cyan().bold(), group.id);
        for method in &group.methods {
            print_method(method, verbose);
        }
    }

    if verbose {
        println!("\n  {}", "Resources:".bold());
        for version in spec.resources.versions() {
            let resources = spec.resources_for_version(version).into_iter().flatten();
            for resource in resources.map(|(_, r)| r) {
                let methods: Vec<&str> = resource.methods.keys().map(String::as_str).collect();
                println!(
                    "    • {} [{}] {} ← {}",
                    resource.id.cyan(),
                    version,
                    resource.type_label,
                    methods.join(", ")
                );
            }
        }
    }
}

fn print_method(method: &Method, verbose: bool) {
    let verb = format!("{:<7}", method.verb.to_uppercase());
    let deprecated = if method.deprecated {
        " (deprecated)".red().to_string()
    } else {
        String::new()
    };
    println!(
        "    {} {} {}{}",
        verb.green(),
        method.path,
        method.id.dimmed(),
        deprecated
    );

    if !verbose {
        return;
    }

    let params = method
        .path_params
        .iter()
        .chain(&method.query_params)
        .chain(&method.header_params)
        .chain(&method.form_params)
        .chain(&method.body_param);
    for param in params {
        let required = if param.required { "*" } else { "" };
        println!(
            "      {} {}{}: {}",
            param.location.to_string().dimmed(),
            param.name,
            required,
            param.type_label
        );
    }

    for (status, response) in &method.responses {
        let resource = response
            .resource
            .as_ref()
            .map(|key| key.id.as_str())
            .unwrap_or("-");
        println!(
            "      {} {} → {}",
            status.to_string().yellow(),
            response.status_description,
            resource
        );
    }
}

fn dump_command(suite: &ApiSuite, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let specs: Vec<&Specification> = suite.specifications().collect();

    let text = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&specs).context("Failed to serialize model as JSON")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&specs).context("Failed to serialize model as YAML")?
        }
    };

    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}
