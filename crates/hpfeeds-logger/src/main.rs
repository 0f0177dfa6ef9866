//! hpfeeds-logger - honeypot event normalization
//!
//! Reads raw hpfeeds events, decodes them per channel into flat canonical
//! records, optionally enriches endpoints with GeoIP/ASN attributes, and
//! writes JSONL.

mod normalize;
mod sink;
mod source;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hpfeeds_core::config::{ConfigLoader, LoggerConfig};
use hpfeeds_core::{ErrorPolicy, Processor, NORMALIZER_VERSION};
use hpfeeds_decode::default_registry;
use hpfeeds_enrich::open_enricher;
use normalize::{normalize_line, Summary};
use sink::{JsonlWriter, JsonlWriterConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "hpfeeds-logger")]
#[command(version)]
#[command(about = "Normalize hpfeeds honeypot events into flat JSON records", long_about = None)]
struct Cli {
    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HPFEEDS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw events (JSONL) into canonical records (JSONL)
    Normalize {
        /// Input file of raw events, stdin when absent
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file, overrides the configured output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort on the first decoder failure
        #[arg(long)]
        strict: bool,
    },

    /// List channels and their decoders
    Channels,

    /// Look up geo/ASN attributes for an address
    Lookup {
        /// IPv4 or IPv6 address
        ip: IpAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = ConfigLoader::new().with_cli_path(cli.config.clone()).load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // CLI verbose flag takes precedence over the configured level
    let log_level = if cli.verbose > 0 {
        match cli.verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    } else {
        match config.logger.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    // RUST_LOG overrides the CLI/config level; stdout may carry records, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = &loaded {
        warn!("Failed to load configuration: {}, using defaults", e);
    }

    match cli.command {
        Commands::Normalize {
            input,
            output,
            strict,
        } => normalize_command(&config, input, output, strict).await,
        Commands::Channels => channels_command(),
        Commands::Lookup { ip } => lookup_command(&config, ip),
    }
}

async fn normalize_command(
    config: &LoggerConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    strict: bool,
) -> anyhow::Result<()> {
    let policy = if strict {
        ErrorPolicy::Strict
    } else {
        config.logger.error_policy
    };

    let enricher = open_enricher(&config.geo)?;
    let processor = Processor::new(default_registry()).with_enricher(enricher);

    let mut sink = JsonlWriter::open(JsonlWriterConfig {
        path: output.or_else(|| config.output.path.clone()),
        append: config.output.append,
        pretty: config.output.pretty,
        ..Default::default()
    })?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut lines = reader.lines();

    info!(
        "hpfeeds-logger {} normalizing {} channels (error policy: {})",
        NORMALIZER_VERSION,
        processor.registry().len(),
        policy
    );

    let mut summary = Summary::default();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Err(e) = normalize_line(&processor, &line, policy, &mut sink, &mut summary) {
                        break Err(e);
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e.into()),
            },
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break Ok(());
            }
        }
    };

    sink.flush()?;
    info!("Done: {}", summary);

    result
}

fn channels_command() -> anyhow::Result<()> {
    let registry = default_registry();

    println!("Registered channels:");
    for channel in registry.channels() {
        for decoder in registry.decoders_for(channel) {
            println!(
                "  {:<22} {:<14} {}",
                channel,
                decoder.name(),
                decoder.description()
            );
        }
    }

    Ok(())
}

fn lookup_command(config: &LoggerConfig, ip: IpAddr) -> anyhow::Result<()> {
    if !config.geo.is_enabled() {
        anyhow::bail!("No geo or ASN database configured (set [geo] in config or HPFEEDS_GEO_DB)");
    }

    let enricher = open_enricher(&config.geo)?;
    let record = enricher.lookup_addr(ip);
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
