// Rust guideline compliant 2026-02-06

//! sorm
//!
//! Command-line interface for scylla-orm schema files.

use clap::Parser;
use scylla_orm_cli::{commands, create_formatter, error_message, init_tracing};
use scylla_orm_core::{ApplicationEnvironment, Config, OutputFormat};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sorm",
    version,
    about = "sorm: ScyllaDB schema tooling",
    long_about = "sorm reads table and materialized view definitions from TOML or JSON schema files, validates them and renders the CQL that creates them.",
    after_help = "Examples:\n  sorm init\n  sorm check schema.toml\n  sorm ddl schema.toml --format plain\n  sorm tables schema.toml --json\n  sorm search-schema schema.toml app.users\n  sorm env --env prod\n"
)]
struct Cli {
    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// Directory containing sorm.toml
    #[arg(long, global = true, default_value = ".")]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Application environment (overrides APPLICATION_ENV)
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Json,
    Table,
    Plain,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Write a default sorm.toml
    Init,

    /// Print the DDL that creates every keyspace, table and view
    Ddl {
        /// Schema file (.toml or .json)
        schema: PathBuf,
    },

    /// List the tables of a schema file
    Tables {
        /// Schema file (.toml or .json)
        schema: PathBuf,
    },

    /// Show the search index schema of a table
    SearchSchema {
        /// Schema file (.toml or .json)
        schema: PathBuf,

        /// Table name (keyspace.table, or table in the default keyspace)
        table: String,
    },

    /// Validate a schema file
    Check {
        /// Schema file (.toml or .json)
        schema: PathBuf,
    },

    /// Show the active application environment
    Env,
}

fn main() {
    let cli = Cli::parse();
    let requested = requested_format(cli.format, cli.json);

    if let Err(e) = init_tracing(&cli.log_level, cli.log_json) {
        fail(requested.unwrap_or_default(), &e);
    }

    ApplicationEnvironment::init_from_env();
    if let Some(env) = &cli.env {
        ApplicationEnvironment::set_environment(env.as_str());
    }

    // `init` must work before a config file exists.
    if let Commands::Init = cli.command {
        finish(
            commands::init::execute(&cli.config),
            requested.unwrap_or_default(),
        );
        return;
    }

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(requested.unwrap_or_default(), &e.into()),
    };
    let format = requested.unwrap_or(config.output_format);
    let json_output = format == OutputFormat::Json;
    let formatter = create_formatter(format);

    let result = match &cli.command {
        Commands::Init => commands::init::execute(&cli.config),
        Commands::Ddl { schema } => commands::ddl::execute(schema, &config, formatter.as_ref()),
        Commands::Tables { schema } => {
            commands::tables::execute(schema, &config, formatter.as_ref())
        }
        Commands::SearchSchema { schema, table } => {
            commands::search_schema::execute(schema, table, &config, formatter.as_ref())
        }
        Commands::Check { schema } => commands::check::execute(schema, &config, json_output),
        Commands::Env => commands::env::execute(&config, json_output),
    };

    finish(result, format);
}

/// Format chosen on the command line; `--format` wins over `--json`.
fn requested_format(format: Option<FormatArg>, json: bool) -> Option<OutputFormat> {
    match format {
        Some(format) => Some(format.into()),
        None if json => Some(OutputFormat::Json),
        None => None,
    }
}

fn finish(result: anyhow::Result<String>, format: OutputFormat) {
    match result {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => fail(format, &e),
    }
}

/// Prints `error` through the formatter for `format` and exits with status 1.
fn fail(format: OutputFormat, error: &anyhow::Error) -> ! {
    tracing::debug!(error = ?error, "command failed");
    eprintln!("{}", create_formatter(format).format_error(&error_message(error)));
    std::process::exit(1);
}
