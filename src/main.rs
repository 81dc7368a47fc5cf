use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use treelens::config::Config;
use treelens::document::node::Node;
use treelens::document::path::Path;
use treelens::document::tree::{Document, SourceFormat};
use treelens::file::loader::{load_file, load_stdin};
use treelens::introspect::{describe_with, flatten, flatten_records, stats, validate};

/// treelens - structural introspection for JSON, YAML and XML documents
#[derive(Parser)]
#[command(name = "treelens")]
#[command(version)]
#[command(about = "Inspect and flatten semi-structured documents", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/treelens/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Input {
    /// Document to read (omit to read from stdin)
    file: Option<PathBuf>,

    /// Only inspect the subtree at this path, e.g. `investigacion.experimentos[0]`
    #[arg(long)]
    at: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a depth-limited structural outline
    Describe {
        #[command(flatten)]
        input: Input,

        /// Container levels to descend (default from config: 5)
        #[arg(short = 'd', long, allow_negative_numbers = true)]
        max_depth: Option<i64>,

        /// Descend every sequence element instead of only the first
        #[arg(long)]
        all: bool,

        /// Maximum characters in a scalar preview
        #[arg(long)]
        preview_width: Option<usize>,
    },
    /// Print every scalar leaf keyed by its path
    Flatten {
        #[command(flatten)]
        input: Input,

        /// Emit a JSON object instead of `path = value` lines
        #[arg(long)]
        json: bool,
    },
    /// Print each sequence element as a row of a delimited table
    Table {
        #[command(flatten)]
        input: Input,

        /// Column delimiter
        #[arg(long, default_value_t = '\t')]
        delimiter: char,
    },
    /// Print node counts and maximum depth
    Stats {
        #[command(flatten)]
        input: Input,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the document against a JSON Schema (JSON or YAML file)
    Validate {
        #[command(flatten)]
        input: Input,

        /// Schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Emit violations as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(input: &Input, config: &Config) -> Result<Document> {
    match &input.file {
        Some(path) => load_file(path, config),
        None => load_stdin(config),
    }
}

/// Resolves `--at` against the document, or returns the root.
fn select<'a>(doc: &'a Document, at: Option<&str>) -> Result<&'a Node> {
    let Some(raw) = at else {
        return Ok(doc.root());
    };
    let path = Path::parse(raw)?;
    doc.get(&path)
        .with_context(|| format!("No node at path '{}'", raw))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    init_tracing(&config.log_level);
    debug!(?config, "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Describe {
            input,
            max_depth,
            all,
            preview_width,
        } => {
            let mut options = config.describe_options();
            if let Some(depth) = max_depth {
                options = options.with_max_depth(depth)?;
            }
            if all {
                options.sample_sequences = false;
            }
            if let Some(width) = preview_width {
                options.preview_width = width;
            }

            let doc = load(&input, &config)?;
            info!(format = %doc.format(), "describing document");
            for line in describe_with(select(&doc, input.at.as_deref())?, &options) {
                writeln!(out, "{}", line)?;
            }
        }
        Command::Flatten { input, json } => {
            let doc = load(&input, &config)?;
            let flat = flatten(select(&doc, input.at.as_deref())?);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&flat)?)?;
            } else {
                for (path, value) in &flat {
                    writeln!(out, "{} = {}", path, value.preview())?;
                }
            }
        }
        Command::Table { input, delimiter } => {
            let doc = load(&input, &config)?;
            let table = flatten_records(select(&doc, input.at.as_deref())?);
            info!(rows = table.rows.len(), columns = table.columns.len(), "built table");
            table.write_delimited(&mut out, delimiter)?;
        }
        Command::Stats { input, json } => {
            let doc = load(&input, &config)?;
            let node = select(&doc, input.at.as_deref())?;
            let s = stats(node);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&s)?)?;
            } else {
                writeln!(out, "Format: {}", doc.format())?;
                if doc.format() == SourceFormat::Xml && input.at.is_none() {
                    if let Some(tag) = doc.root().as_mapping().and_then(|m| m.keys().next()) {
                        writeln!(out, "Root element: <{}>", tag)?;
                    }
                }
                writeln!(out, "Nodes: {}", s.nodes)?;
                writeln!(out, "Scalars: {}", s.scalars)?;
                writeln!(out, "Mappings: {}", s.mappings)?;
                writeln!(out, "Sequences: {}", s.sequences)?;
                writeln!(out, "Max depth: {}", s.max_depth)?;
            }
        }
        Command::Validate {
            input,
            schema,
            json,
        } => {
            let schema_doc = load_file(&schema, &config)
                .with_context(|| format!("Failed to load schema '{}'", schema.display()))?;
            let doc = load(&input, &config)?;
            let violations = validate(select(&doc, input.at.as_deref())?, schema_doc.root())?;

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&violations)?)?;
            } else if violations.is_empty() {
                writeln!(out, "Document is valid")?;
            } else {
                for violation in &violations {
                    writeln!(out, "{}", violation)?;
                }
            }
            out.flush()?;

            if !violations.is_empty() {
                bail!("{} schema violation(s)", violations.len());
            }
        }
    }

    out.flush()?;
    Ok(())
}
