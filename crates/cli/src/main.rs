//! Collection Generator CLI
//!
//! Command-line interface for compiling Swagger/OpenAPI documents into
//! automation collection modules.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use collection_generator_common::{GeneratorConfig, GroupingPolicy};
use collection_generator_generator::{write_report, CompileReport, Compiler, Severity};
use collection_generator_parser::{
    build_operations, normalize, normalize_identifier, SpecDocument, TypeMapper,
};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collection-generator")]
#[command(version, about = "Generate automation collection modules from Swagger/OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one document into module files
    #[command(after_help = "EXAMPLES:\n  \
        # Vendor and app inferred from <vendor>/<app>/<file>\n  \
        collection-generator compile --spec swagger/acme/widgets/widgets.json --output ./collections\n\n  \
        # One module per operation\n  \
        collection-generator compile \\\n    \
        --spec widgets.yaml \\\n    \
        --vendor acme \\\n    \
        --app widgets \\\n    \
        --grouping per-operation")]
    Compile {
        /// Path to the Swagger/OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Vendor namespace (inferred from the document path if not specified)
        #[arg(long)]
        vendor: Option<String>,

        /// Application namespace (inferred from the document path if not specified)
        #[arg(long)]
        app: Option<String>,

        /// Output root directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Generator configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured grouping policy
        #[arg(short, long)]
        grouping: Option<Grouping>,

        /// Keep module files from previous runs that this run did not emit
        #[arg(long)]
        no_prune: bool,
    },

    /// Normalize a document and list the operations it declares
    Inspect {
        /// Path to the Swagger/OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Generator configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grouping {
    /// One module per resource, actions selected with `state`
    PerResource,
    /// One module per operation
    PerOperation,
}

impl From<Grouping> for GroupingPolicy {
    fn from(grouping: Grouping) -> Self {
        match grouping {
            Grouping::PerResource => GroupingPolicy::PerResource,
            Grouping::PerOperation => GroupingPolicy::PerOperation,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Compile {
            spec,
            vendor,
            app,
            output,
            config,
            grouping,
            no_prune,
        } => {
            let (vendor, app) = namespace(&spec, vendor, app)?;
            compile_command(CompileArgs {
                spec_path: &spec,
                vendor: &vendor,
                app: &app,
                output: &output,
                config_path: config.as_deref(),
                grouping: grouping.map(GroupingPolicy::from),
                prune: !no_prune,
                verbose: cli.verbose,
            })?;
        }
        Commands::Inspect { spec, config } => {
            inspect_command(&spec, config.as_deref(), cli.verbose)?;
        }
    }

    Ok(())
}

/// Log to stderr, `RUST_LOG` first, then `--verbose`
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

struct CompileArgs<'a> {
    spec_path: &'a Path,
    vendor: &'a str,
    app: &'a str,
    output: &'a Path,
    config_path: Option<&'a Path>,
    grouping: Option<GroupingPolicy>,
    prune: bool,
    verbose: bool,
}

fn compile_command(args: CompileArgs) -> Result<()> {
    println!(
        "{} Compiling {} as {}/{}",
        "→".cyan(),
        args.spec_path.display(),
        args.vendor.yellow(),
        args.app.yellow()
    );

    let mut config = load_config(args.config_path)?;
    if let Some(grouping) = args.grouping {
        config = config.with_grouping(grouping);
    }
    if args.verbose {
        println!("  Grouping: {}", config.layout.grouping);
        println!("  Output: {}", args.output.display());
    }

    let doc = SpecDocument::from_file(args.spec_path).context("Failed to load document")?;
    let compiler = Compiler::new(config).context("Failed to initialize compiler")?;
    let report = compiler.compile(&doc, args.vendor, args.app);

    print_diagnostics(&report);
    if report.is_fatal() {
        bail!(
            "Compilation of {}/{} failed, no files written",
            args.vendor,
            args.app
        );
    }

    let summary = write_report(&report, args.output, args.prune)
        .with_context(|| format!("Failed to write output to {}", args.output.display()))?;

    if args.verbose {
        for path in &summary.written {
            println!("  {} {}", "+".green(), path.display());
        }
        for path in &summary.pruned {
            println!("  {} {}", "-".red(), path.display());
        }
    }

    println!(
        "\n{} {} modules ({} written, {} unchanged, {} pruned)",
        if report.is_success() {
            "✓".green().bold()
        } else {
            "!".yellow().bold()
        },
        report.modules.len(),
        summary.written.len(),
        summary.unchanged,
        summary.pruned.len()
    );

    if !report.is_success() {
        bail!(
            "{} operation(s) of {}/{} could not be compiled",
            report.errors().count(),
            args.vendor,
            args.app
        );
    }

    Ok(())
}

fn print_diagnostics(report: &CompileReport) {
    for diagnostic in &report.diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        println!("  {} [{}] {}", severity, diagnostic.scope, diagnostic.error);
    }
}

fn inspect_command(spec_path: &Path, config_path: Option<&Path>, verbose: bool) -> Result<()> {
    println!("{} Inspecting {}", "→".cyan(), spec_path.display());

    let config = load_config(config_path)?;
    let doc = SpecDocument::from_file(spec_path).context("Failed to load document")?;
    let spec = normalize(&doc).context("Failed to normalize document")?;
    let operations = build_operations(&spec, "vendor", "app", &config.naming);

    println!("\n{}", "✓ Normalization successful!".green().bold());
    if let Some(title) = &spec.info.title {
        println!("  Title: {}", title.yellow());
    }
    if let Some(version) = &spec.info.version {
        println!("  Version: {}", version.yellow());
    }
    println!("  Base path: {}", spec.info.base_path);
    println!("  Paths: {}", spec.paths.len());
    println!("  Definitions: {}", spec.definitions.len());
    println!("  Operations: {}", operations.len());

    println!("\n{}", "Operations:".bold());
    for operation in operations {
        let label = operation.label();
        let resource = operation.resource.clone();
        let inputs = operation.inputs.len();
        match TypeMapper::map_operation(operation) {
            Ok(mapped) => {
                println!("  • {} → {}", label.cyan(), resource);
                if verbose {
                    for parameter in &mapped.parameters {
                        println!(
                            "      {} ({}{})",
                            parameter.name,
                            parameter.mapped_type.type_name(),
                            if parameter.required { ", required" } else { "" }
                        );
                    }
                } else {
                    println!("      Inputs: {}", inputs);
                }
            }
            Err(e) => println!("  • {} {} {}", label.cyan(), "✗".red(), e),
        }
    }

    Ok(())
}

/// Resolve vendor and app, falling back to the `<vendor>/<app>/<file>` layout
fn namespace(
    spec_path: &Path,
    vendor: Option<String>,
    app: Option<String>,
) -> Result<(String, String)> {
    let (inferred_vendor, inferred_app) = infer_namespace(spec_path);

    let vendor = vendor.or(inferred_vendor).with_context(|| {
        format!(
            "Cannot infer vendor from {}, pass --vendor",
            spec_path.display()
        )
    })?;
    let app = app.or(inferred_app).with_context(|| {
        format!("Cannot infer app from {}, pass --app", spec_path.display())
    })?;

    Ok((normalize_identifier(&vendor), normalize_identifier(&app)))
}

fn infer_namespace(spec_path: &Path) -> (Option<String>, Option<String>) {
    let mut parents = spec_path
        .parent()
        .into_iter()
        .flat_map(|p| p.components().rev())
        .filter_map(|c| c.as_os_str().to_str())
        .filter(|c| !c.is_empty() && *c != "." && *c != "..")
        .map(String::from);

    let app = parents.next();
    let vendor = parents.next();
    (vendor, app)
}
