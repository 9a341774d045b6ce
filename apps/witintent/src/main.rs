use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use witintent_client::IntentClient;
use witintent_config::{load_config, save_config, ClientConfig};
use witintent_logging::{LogFormat, LogLevel, Logger, LoggingConfig};
use witintent_sanitize::{needs_truncation, MAX_QUERY_CHARS};

#[derive(Parser, Debug)]
#[command(name = "witintent")]
#[command(about = "Classify text into wit.ai intents.", long_about = None)]
struct Cli {
    /// Minimum level written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,
    /// plain, json or compact.
    #[arg(long, global = true, default_value = "plain")]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send text to the service and print the recognised intents.
    Classify {
        /// Text to classify.
        text: String,
        /// Bearer token. Falls back to the config file, then WIT_TOKEN.
        #[arg(long)]
        token: Option<String>,
        /// YAML or JSON config file; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Minimum confidence, 0..=1.
        #[arg(long)]
        threshold: Option<f64>,
        /// Request timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Endpoint URL.
        #[arg(long)]
        endpoint: Option<String>,
        /// Skip TLS certificate verification.
        #[arg(long)]
        insecure: bool,
        /// Allow connection pooling.
        #[arg(long)]
        keep_alive: bool,
        /// Print the filtered response as JSON instead of one name per line.
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file (format chosen by extension).
    InitConfig {
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut log = Logger::stderr(
        LoggingConfig::new()
            .with_level(cli.log_level)
            .with_format(cli.log_format),
    );

    match cli.cmd {
        Command::Classify {
            text,
            token,
            config,
            threshold,
            timeout_ms,
            endpoint,
            insecure,
            keep_alive,
            json,
        } => {
            let mut cfg = match &config {
                Some(path) => load_config(path)
                    .with_context(|| format!("load config {}", path.display()))?,
                None => ClientConfig::default(),
            };
            if let Some(t) = token {
                cfg.token = t;
            }
            if cfg.token.is_empty() {
                cfg.token = std::env::var("WIT_TOKEN").unwrap_or_default();
            }
            if cfg.token.is_empty() {
                log.warn("cli", "no token provided; the service will reject the request");
            }
            if let Some(t) = threshold {
                cfg.threshold = t;
            }
            if let Some(ms) = timeout_ms {
                cfg = cfg.with_timeout(Duration::from_millis(ms));
            }
            if let Some(e) = endpoint {
                cfg.endpoint = e;
            }
            cfg.insecure_skip_verify |= insecure;
            cfg.keep_alive |= keep_alive;
            if cfg.insecure_skip_verify {
                log.warn("cli", "TLS certificate verification is disabled");
            }

            log.debug(
                "cli",
                format!(
                    "endpoint={} threshold={} timeout_ms={} keep_alive={}",
                    cfg.endpoint, cfg.threshold, cfg.timeout_ms, cfg.keep_alive
                ),
            );

            if needs_truncation(&text) {
                log.info(
                    "cli",
                    format!("text cut to {MAX_QUERY_CHARS} characters before sending"),
                );
            }

            let client = IntentClient::with_config(cfg).context("invalid client configuration")?;

            if json {
                let result = client.classify_detailed(&text).map_err(|e| {
                    log.error("classify", e.to_string());
                    e
                })?;
                log.info("classify", format!("{} intent(s)", result.intents().len()));
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let names = client.classify(&text).map_err(|e| {
                    log.error("classify", e.to_string());
                    e
                })?;
                log.info("classify", format!("{} intent(s)", names.len()));
                for name in names {
                    println!("{name}");
                }
            }
        }

        Command::InitConfig { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_config(&ClientConfig::default(), &path)
                .with_context(|| format!("write config {}", path.display()))?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
