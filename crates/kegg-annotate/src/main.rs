//! KEGG Annotate - KEGG annotation for DIAMOND search results

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use kegg_annotate::annotate::{self, AnnotateOptions, DEFAULT_ORGANISM_TAG};
use kegg_annotate::config::{
    MappingConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAPPING_URL, DEFAULT_RETRY_DELAY_SECS,
};
use kegg_annotate::error::AnnotateError;
use kegg_annotate::idmapping::{MappingClient, MappingRow};
use kegg_common::logging::{init_logging, LogConfig, LogLevel};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kegg-annotate")]
#[command(author, version, about = "KEGG annotation for DIAMOND search results")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a DIAMOND hit table with KEGG identifiers
    Annotate {
        /// Input DIAMOND hit table (12 columns, no header)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the annotated CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Field delimiter of the input table
        #[arg(long, default_value = ",")]
        delimiter: char,

        /// Substring selecting organism-specific KEGG identifiers
        #[arg(long, default_value = DEFAULT_ORGANISM_TAG)]
        organism_tag: String,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Map identifiers between database namespaces
    Map {
        /// Source namespace
        #[arg(long, default_value = "ACC+ID")]
        from: String,

        /// Target namespace
        #[arg(long, default_value = "KEGG_ID")]
        to: String,

        /// Identifiers to map
        #[arg(long, num_args = 1..)]
        ids: Vec<String>,

        /// File with one identifier per line
        #[arg(long)]
        ids_file: Option<PathBuf>,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = MapFormat::Tab)]
        format: MapFormat,

        #[command(flatten)]
        mapping: MappingArgs,
    },
}

/// Mapping service options shared by both subcommands
#[derive(Args, Debug)]
struct MappingArgs {
    /// Mapping service endpoint
    #[arg(long, env = "KEGG_MAPPING_URL", default_value = DEFAULT_MAPPING_URL)]
    mapping_url: String,

    /// Maximum identifiers per mapping request
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Seconds to wait before retrying a failed chunk
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_SECS)]
    retry_delay_secs: u64,

    /// Give up on a chunk after this many retries (default: retry forever)
    #[arg(long)]
    max_retries: Option<u32>,
}

impl MappingArgs {
    /// Build the client config; CLI flags take precedence over
    /// environment variables, which take precedence over defaults.
    fn to_config(&self) -> Result<MappingConfig> {
        let mut config = MappingConfig::from_env()?;
        config.url = self.mapping_url.clone();
        config.chunk_size = self.chunk_size;
        config.retry_delay = Duration::from_secs(self.retry_delay_secs);
        config.max_retries = self.max_retries;
        Ok(config)
    }
}

/// Output format for the `map` subcommand
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum MapFormat {
    /// Tab-separated, as returned by the mapping service
    Tab,
    /// JSON array of mapping rows
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_file_prefix("kegg-annotate");
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }
    init_logging(&log_config)?;

    match cli.command {
        Command::Annotate {
            input,
            output,
            delimiter,
            organism_tag,
            mapping,
        } => {
            let client = MappingClient::new(mapping.to_config()?)?;

            let mut options = AnnotateOptions::new(input, output);
            options.delimiter = parse_delimiter(delimiter)?;
            options.organism_tag = organism_tag;

            annotate::run(&client, &options).await?;
        },
        Command::Map {
            from,
            to,
            ids,
            ids_file,
            output,
            format,
            mapping,
        } => {
            let query = collect_ids(ids, ids_file.as_deref())?;
            let client = MappingClient::new(mapping.to_config()?)?;

            let rows = client.map_identifiers(&from, &to, &query).await?;
            let rendered = render_rows(&rows, format)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    info!(output = %path.display(), rows = rows.len(), "Mapping written");
                },
                None => print!("{}", rendered),
            }
        },
    }

    Ok(())
}

/// The csv reader wants a single-byte delimiter
fn parse_delimiter(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(AnnotateError::invalid_input(format!(
            "delimiter must be a single ASCII character, got '{}'",
            delimiter
        ))
        .into())
    }
}

/// Combine identifiers from --ids and --ids-file
fn collect_ids(mut ids: Vec<String>, ids_file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = ids_file {
        let contents = std::fs::read_to_string(path)?;
        ids.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    if ids.is_empty() {
        return Err(
            AnnotateError::invalid_input("no identifiers given; pass --ids or --ids-file").into(),
        );
    }

    Ok(ids)
}

/// Render mapping rows in the requested output format
fn render_rows(rows: &[MappingRow], format: MapFormat) -> Result<String> {
    match format {
        MapFormat::Tab => {
            let mut out = String::from("From\tTo\n");
            for row in rows {
                out.push_str(&row.from);
                out.push('\t');
                out.push_str(&row.to);
                out.push('\n');
            }
            Ok(out)
        },
        MapFormat::Json => {
            let mut out = serde_json::to_string_pretty(rows).map_err(AnnotateError::from)?;
            out.push('\n');
            Ok(out)
        },
    }
}
