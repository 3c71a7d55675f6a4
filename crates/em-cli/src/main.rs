//! CLI entry point for inspecting entity metadata models.
//!
//! This binary loads a domain catalog (classes plus translation messages)
//! from JSON, derives entity models from it and prints them.
//!
//! # Usage
//!
//! ```bash
//! em-inspect [OPTIONS] <COMMAND>
//!
//! # Print the attribute table of a model
//! em-inspect --catalog shop.json show Order
//!
//! # Nested models are found through their owner
//! em-inspect --catalog shop.json --locale de show Order.customer
//!
//! # Write a model snapshot as JSON or CSV
//! em-inspect --catalog shop.json dump Order --format csv --output order.csv
//!
//! # Build every entity and report configuration errors
//! em-inspect --catalog shop.json check
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::eyre;
use em_core::{CatalogFile, ClassRef, Config, Locale};
use em_engine::{AttributeModel, EntityModel, ModelFactory, ModelSnapshot, StatsSnapshot};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Inspect and validate entity metadata models.
///
/// Reads a JSON catalog with `classes` and `messages`, derives the metadata
/// model of each entity and prints it.
#[derive(Parser)]
#[command(name = "em-inspect", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog JSON file.
    ///
    /// Defaults to `./catalog.json` if not specified.
    #[arg(short, long, global = true, env = "EM_INSPECT_CATALOG")]
    catalog: Option<Utf8PathBuf>,

    /// Path to an engine configuration JSON file.
    #[arg(long, global = true, env = "EM_INSPECT_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Locale used for display names (defaults to the engine's default
    /// locale).
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the attribute table of a model.
    Show {
        /// Model reference, e.g. `Order` or `Order.customer`.
        reference: String,

        /// Entity class, if it cannot be found from the reference.
        #[arg(long)]
        class: Option<String>,
    },

    /// Write a model snapshot.
    Dump {
        /// Model reference, e.g. `Order` or `Order.customer`.
        reference: String,

        /// Entity class, if it cannot be found from the reference.
        #[arg(long)]
        class: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Build every entity of the catalog and report configuration errors.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Dump output format.
#[derive(Clone, Copy, ValueEnum)]
enum DumpFormat {
    /// Full snapshot as JSON.
    Json,
    /// Attribute table as CSV.
    Csv,
}

/// A loaded catalog and the factory built over it.
struct Workspace {
    factory: ModelFactory,
    entities: Vec<ClassRef>,
    locale: Locale,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `no_color` - Disable ANSI colors in output
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Loads the catalog and configuration named on the command line.
///
/// # Errors
///
/// Returns an error if the catalog or configuration cannot be read.
fn load_workspace(cli: &Cli) -> color_eyre::Result<Workspace> {
    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("./catalog.json"));

    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .map_err(|e| eyre!("Failed to load configuration {path}: {e}"))?,
        None => Config::default(),
    };

    let (catalog, messages) = CatalogFile::from_json_file(&catalog_path)
        .map_err(|e| eyre!("Failed to load catalog {catalog_path}: {e}"))?
        .into_parts();
    info!(
        path = %catalog_path,
        classes = catalog.len(),
        messages = messages.len(),
        "Catalog loaded"
    );

    let entities = catalog.entity_classes().cloned().collect();
    let locale = cli
        .locale
        .as_deref()
        .map_or_else(|| config.engine.default_locale.clone(), Locale::new);

    Ok(Workspace {
        factory: ModelFactory::from_catalog(catalog, messages, config.engine),
        entities,
        locale,
    })
}

/// Finds the model for `reference`.
///
/// With an explicit class the model is requested directly. Otherwise the
/// first segment names the root entity and nested references are followed
/// through the nested models of their owners.
///
/// # Errors
///
/// Returns an error if a model cannot be built or the reference leads
/// nowhere.
fn find_model(
    factory: &ModelFactory,
    reference: &str,
    class: Option<&str>,
) -> color_eyre::Result<Arc<EntityModel>> {
    if let Some(class) = class {
        return Ok(factory.get_model_for(reference, &ClassRef::new(class))?);
    }

    let root = reference.split('.').next().unwrap_or(reference);
    let mut model = factory.get_model(&ClassRef::new(root))?;

    while model.reference() != reference {
        let next = model
            .attributes()
            .iter()
            .filter_map(AttributeModel::nested_model)
            .find(|nested| {
                reference
                    .strip_prefix(nested.reference())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
            })
            .ok_or_else(|| {
                eyre!(
                    "No nested model leads from {} to {reference}; pass --class",
                    model.reference()
                )
            })?;
        model = next.get()?;
    }

    Ok(model)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Prints the attribute table of a model.
///
/// # Errors
///
/// Returns an error if the model cannot be built or output fails.
fn run_show(workspace: &Workspace, reference: &str, class: Option<&str>) -> color_eyre::Result<()> {
    let model = find_model(&workspace.factory, reference, class)?;
    let snapshot = model.snapshot(&workspace.locale);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "{}", snapshot.summary_line())?;
    writeln!(
        handle,
        "{} / {} ({})",
        snapshot.display_name, snapshot.display_name_plural, snapshot.locale
    )?;
    if !snapshot.sort_order.is_empty() {
        let order: Vec<String> = snapshot
            .sort_order
            .iter()
            .map(|key| format!("{} {}", key.attribute, if key.ascending { "ASC" } else { "DESC" }))
            .collect();
        writeln!(handle, "Sort order: {}", order.join(", "))?;
    }
    writeln!(handle)?;
    writeln!(
        handle,
        "{:>3}  {:<24} {:<22} {:<14} {:<12} FLAGS",
        "#", "NAME", "KIND", "TYPE", "GROUP"
    )?;
    for attribute in &snapshot.attributes {
        writeln!(
            handle,
            "{:>3}  {:<24} {:<22} {:<14} {:<12} {}",
            attribute.order,
            attribute.name,
            attribute.kind.to_string(),
            attribute.declared_type,
            attribute.group.as_deref().unwrap_or("-"),
            attribute.flags(),
        )?;
    }

    Ok(())
}

/// Writes a model snapshot in the requested format.
///
/// # Errors
///
/// Returns an error if the model cannot be built or writing fails.
fn run_dump(
    workspace: &Workspace,
    reference: &str,
    class: Option<&str>,
    format: DumpFormat,
    output: Option<&Utf8PathBuf>,
) -> color_eyre::Result<()> {
    let model = find_model(&workspace.factory, reference, class)?;
    let snapshot = model.snapshot(&workspace.locale);

    let content = match format {
        DumpFormat::Json => serde_json::to_string_pretty(&snapshot)
            .map_err(|e| eyre!("Failed to serialize JSON: {}", e))?,
        DumpFormat::Csv => generate_csv(&snapshot),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path.as_std_path(), &content)?;
        info!(path = %output_path, reference, "Snapshot written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{content}")?;
    }

    Ok(())
}

/// Builds every entity of the catalog in parallel and reports failures.
///
/// # Errors
///
/// Returns an error if any entity model fails to build.
fn run_check(workspace: &Workspace, json: bool) -> color_eyre::Result<()> {
    info!(entities = workspace.entities.len(), "Checking catalog");

    let results = workspace.factory.warm_up(&workspace.entities);
    let failures: Vec<(String, String)> = results
        .iter()
        .filter_map(|(class, result)| {
            result
                .as_ref()
                .err()
                .map(|error| (class.to_string(), error.to_string()))
        })
        .collect();
    let stats = workspace.factory.stats();

    if json {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", generate_json_report(&stats, &failures)?)?;
    } else {
        print_stats_summary(&stats, workspace.factory.references().len());
        if !failures.is_empty() {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            writeln!(handle)?;
            writeln!(handle, "Errors ({}):", failures.len())?;
            for (class, error) in &failures {
                writeln!(handle, "  {class} - {error}")?;
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(eyre!("{} of {} entity models failed to build", failures.len(), results.len()))
    }
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints a summary of build statistics.
fn print_stats_summary(stats: &StatsSnapshot, models: usize) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Model Build Summary");
    let _ = writeln!(handle, "===================");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Models cached:      {models}");
    let _ = writeln!(handle, "  Built:            {}", stats.models_built);
    let _ = writeln!(handle, "  Attributes:       {}", stats.attributes_built);
    let _ = writeln!(handle, "  Lazy handles:     {}", stats.lazy_handles);
    let _ = writeln!(handle, "  Depth truncated:  {}", stats.depth_truncations);
    let _ = writeln!(handle, "  Cycles skipped:   {}", stats.cycle_guard_hits);
    let _ = writeln!(handle, "  Failures:         {}", stats.failures);
    let _ = writeln!(handle);
    let _ = writeln!(
        handle,
        "Requests: {} ({:.1}% cache hits)",
        stats.requests,
        stats.hit_rate()
    );
}

/// Generates a JSON check report.
fn generate_json_report(stats: &StatsSnapshot, failures: &[(String, String)]) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct Failure<'a> {
        class: &'a str,
        error: &'a str,
    }

    #[derive(serde::Serialize)]
    struct Report<'a> {
        stats: &'a StatsSnapshot,
        failures: Vec<Failure<'a>>,
    }

    let report = Report {
        stats,
        failures: failures
            .iter()
            .map(|(class, error)| Failure { class, error })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| eyre!("Failed to serialize JSON: {}", e))
}

/// Generates the attribute table of a snapshot as CSV.
fn generate_csv(snapshot: &ModelSnapshot) -> String {
    use std::fmt::Write;

    let mut output = String::from("order,name,path,kind,type,group,display_name,flags\n");

    for attribute in &snapshot.attributes {
        let _ = writeln!(
            output,
            "{},{},{},{},{},{},{},{}",
            attribute.order,
            escape_csv(&attribute.name),
            escape_csv(&attribute.path),
            attribute.kind,
            escape_csv(&attribute.declared_type),
            escape_csv(attribute.group.as_deref().unwrap_or_default()),
            escape_csv(&attribute.display_name),
            escape_csv(&attribute.flags()),
        );
    }

    output
}

/// Escapes a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load catalog and configuration
    let workspace = load_workspace(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Show { reference, class } => run_show(&workspace, reference, class.as_deref()),
        Commands::Dump {
            reference,
            class,
            format,
            output,
        } => run_dump(&workspace, reference, class.as_deref(), *format, output.as_ref()),
        Commands::Check { json } => run_check(&workspace, *json),
    }
}
