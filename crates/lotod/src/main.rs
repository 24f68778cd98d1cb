// # lotod - Lottery Results Daemon
//
// The lotod daemon is a thin integration layer responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the fetcher, pipeline and coordinator
// 4. Displaying each enabled field whenever a new snapshot is published
//
// All fetch, extraction and scheduling logic lives in loto-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Source
// - `LOTO_URL`: Results page URL
// - `LOTO_TIMEOUT_SECS`: Request timeout in seconds (default 15)
// - `LOTO_USER_AGENT`: User-Agent header value
//
// ### Extraction
// - `LOTO_EXTRACTION`: `span_scan` (default) or `selector`
// - `LOTO_SCAN_TAG`: Tag scanned by `span_scan` (default `span`)
// - `LOTO_RESULTS_CONTAINER`: Container selector for `selector`
// - `LOTO_BALL_SELECTOR`: Ball selector for `selector`
// - `LOTO_DATE_SELECTOR`: Optional draw date selector
// - `LOTO_DRAW_DATE`: Static draw date label
// - `LOTO_FAILURE_POLICY`: `strict` (default) or `lenient`
//
// ### Display
// - `LOTO_NAME`: Display name (default "Loto FDJ")
// - `LOTO_SOURCE_LABEL`: Provider label reported with each snapshot (default "FDJ")
// - `LOTO_UPDATE_INTERVAL`: Seconds between refreshes, 300-86400 (default 3600)
// - `LOTO_SHOW_DATE`: Show the draw date field (default true)
// - `LOTO_SHOW_COMPLETE_RESULT`: Show the complete result field (default true)
//
// ### Misc
// - `LOTO_PROBE`: When true, probe the source, refresh once, print JSON and exit
// - `LOTO_PROBE_MARKER`: Selector the page must contain when probing
// - `LOTO_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export LOTO_URL=https://www.fdj.fr/jeux-de-tirage/loto/resultats/mercredi-25-juin-2025
// export LOTO_UPDATE_INTERVAL=3600
// export LOTO_FAILURE_POLICY=strict
//
// lotod
// ```

use anyhow::{Context, Result};
use loto_core::config::{DrawDateConfig, ExtractionConfig, FailurePolicy, LotoConfig, SourceConfig};
use loto_core::{DrawCoordinator, DrawField, Pipeline, Snapshot};
use std::env;
use std::process::ExitCode;
use tokio_stream::StreamExt;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum LotoExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<LotoExitCode> for ExitCode {
    fn from(code: LotoExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon settings read from the environment
struct Settings {
    config: LotoConfig,
    probe: bool,
    log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns a variable's value if set
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = LotoConfig::default();

        if let Some(name) = lookup("LOTO_NAME") {
            config.name = name;
        }
        if let Some(label) = lookup("LOTO_SOURCE_LABEL") {
            config.source_label = label;
        }
        if let Some(interval) = lookup("LOTO_UPDATE_INTERVAL") {
            config.update_interval_secs = interval
                .trim()
                .parse()
                .with_context(|| format!("LOTO_UPDATE_INTERVAL is not a number: {}", interval))?;
        }
        if let Some(flag) = lookup("LOTO_SHOW_DATE") {
            config.show_date = parse_bool("LOTO_SHOW_DATE", &flag)?;
        }
        if let Some(flag) = lookup("LOTO_SHOW_COMPLETE_RESULT") {
            config.show_complete_result = parse_bool("LOTO_SHOW_COMPLETE_RESULT", &flag)?;
        }

        let defaults = SourceConfig::default();
        config.source = SourceConfig {
            url: lookup("LOTO_URL").unwrap_or(defaults.url),
            timeout_secs: match lookup("LOTO_TIMEOUT_SECS") {
                Some(secs) => secs
                    .trim()
                    .parse()
                    .with_context(|| format!("LOTO_TIMEOUT_SECS is not a number: {}", secs))?,
                None => defaults.timeout_secs,
            },
            user_agent: lookup("LOTO_USER_AGENT").unwrap_or(defaults.user_agent),
        };

        config.extraction = match lookup("LOTO_EXTRACTION").as_deref().map(str::trim) {
            None | Some("span_scan") => ExtractionConfig::SpanScan {
                tag: lookup("LOTO_SCAN_TAG").unwrap_or_else(|| "span".to_string()),
            },
            Some("selector") => ExtractionConfig::Selector {
                container: lookup("LOTO_RESULTS_CONTAINER").context(
                    "LOTO_RESULTS_CONTAINER is required when LOTO_EXTRACTION=selector",
                )?,
                item: lookup("LOTO_BALL_SELECTOR")
                    .context("LOTO_BALL_SELECTOR is required when LOTO_EXTRACTION=selector")?,
            },
            Some(other) => anyhow::bail!(
                "LOTO_EXTRACTION '{}' is not supported. Supported: span_scan, selector",
                other
            ),
        };

        let date_defaults = DrawDateConfig::default();
        config.draw_date = DrawDateConfig {
            selector: lookup("LOTO_DATE_SELECTOR"),
            label: lookup("LOTO_DRAW_DATE").unwrap_or(date_defaults.label),
        };

        if let Some(policy) = lookup("LOTO_FAILURE_POLICY") {
            config.failure_policy = policy.parse::<FailurePolicy>()?;
        }
        config.probe_marker = lookup("LOTO_PROBE_MARKER");

        let probe = match lookup("LOTO_PROBE") {
            Some(flag) => parse_bool("LOTO_PROBE", &flag)?,
            None => false,
        };

        Ok(Self {
            config,
            probe,
            log_level: lookup("LOTO_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        self.config.validate()?;

        if self.config.source.url.starts_with("http://") {
            eprintln!(
                "WARNING: LOTO_URL uses HTTP (not HTTPS). \
                 Consider using HTTPS."
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "LOTO_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be true or false, got: {}", key, other),
    }
}

fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return LotoExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return LotoExitCode::ConfigError.into();
    }

    let log_level = match settings.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return LotoExitCode::ConfigError.into();
    }

    info!("Starting lotod for {}", settings.config.name);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return LotoExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async move {
        let outcome = if settings.probe {
            run_probe(&settings.config).await
        } else {
            run_daemon(settings.config).await
        };

        match outcome {
            Ok(()) => LotoExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                LotoExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build the pipeline with the compiled-in fetcher
#[cfg(feature = "http")]
fn build_pipeline(config: &LotoConfig) -> Result<Pipeline> {
    use loto_core::PageFetcherFactory;

    let fetcher = loto_source_http::HttpFetcherFactory.create(&config.source)?;
    Ok(Pipeline::from_config(fetcher, config)?)
}

#[cfg(not(feature = "http"))]
fn build_pipeline(_config: &LotoConfig) -> Result<Pipeline> {
    anyhow::bail!("No page fetcher compiled in. Rebuild with the `http` feature.")
}

/// Probe the source, refresh once and print the snapshot as JSON
async fn run_probe(config: &LotoConfig) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    pipeline.probe().await.context("source probe failed")?;
    info!("Source {} is reachable", pipeline.endpoint());

    let (coordinator, _events) = DrawCoordinator::new(pipeline, config)?;
    let outcome = coordinator.refresh_now().await;

    println!("{}", coordinator.snapshot().to_json()?);
    outcome.map(|_| ()).context("refresh failed")
}

/// Run the daemon until SIGTERM/SIGINT
async fn run_daemon(config: LotoConfig) -> Result<()> {
    let pipeline = build_pipeline(&config)?;
    let (coordinator, mut events) = DrawCoordinator::new(pipeline, &config)?;

    let fields = DrawField::enabled_fields(&config);
    let name = config.name.clone();
    let mut updates = coordinator.subscribe();
    let display = tokio::spawn(async move {
        while let Some(snapshot) = updates.next().await {
            display_snapshot(&name, &fields, &snapshot);
        }
    });

    let monitor = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!("Coordinator event: {:?}", event);
        }
    });

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => info!("Received shutdown signal: {}", signal),
            Err(e) => error!("Signal handler error: {}, shutting down", e),
        }
        let _ = shutdown_tx.send(());
    });

    coordinator.run_with_shutdown(Some(shutdown_rx)).await?;

    // Dropping the coordinator closes the snapshot and event channels
    drop(coordinator);
    let _ = display.await;
    let _ = monitor.await;

    info!("Shutting down daemon");
    Ok(())
}

/// Log every enabled field of `snapshot`
fn display_snapshot(name: &str, fields: &[DrawField], snapshot: &Snapshot) {
    if snapshot.record.is_none() {
        if let Some(err) = &snapshot.last_error {
            warn!("{}: no results yet ({})", name, err);
        }
        return;
    }

    if !snapshot.available {
        warn!(
            "{}: last refresh failed, showing previous results ({})",
            name,
            snapshot.last_error.as_deref().unwrap_or("unknown error")
        );
    }

    for field in fields {
        let reading = snapshot.read(*field);
        if let Some(value) = reading.value {
            info!(
                field = field.key(),
                available = reading.available,
                "{}: {}",
                field.display_name(name),
                value
            );
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = settings(&[]).unwrap();
        assert!(settings.validate().is_ok());
        assert!(!settings.probe);
        assert_eq!(settings.config.update_interval_secs, 3600);
        assert_eq!(settings.config.failure_policy, FailurePolicy::Strict);
    }

    #[test]
    fn reads_display_and_policy_settings() {
        let settings = settings(&[
            ("LOTO_NAME", "Loto"),
            ("LOTO_UPDATE_INTERVAL", "900"),
            ("LOTO_SHOW_DATE", "false"),
            ("LOTO_FAILURE_POLICY", "lenient"),
            ("LOTO_PROBE", "yes"),
        ])
        .unwrap();

        assert_eq!(settings.config.name, "Loto");
        assert_eq!(settings.config.source_label, "FDJ");
        assert_eq!(settings.config.update_interval_secs, 900);
        assert!(!settings.config.show_date);
        assert!(settings.config.show_complete_result);
        assert_eq!(settings.config.failure_policy, FailurePolicy::Lenient);
        assert!(settings.probe);
    }

    #[test]
    fn source_label_is_separate_from_name() {
        let settings = settings(&[("LOTO_NAME", "Mon Loto"), ("LOTO_SOURCE_LABEL", "FDJ.fr")])
            .unwrap();
        assert_eq!(settings.config.name, "Mon Loto");
        assert_eq!(settings.config.source_label, "FDJ.fr");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn interval_out_of_range_fails_validation() {
        let settings = settings(&[("LOTO_UPDATE_INTERVAL", "120")]).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn selector_extraction_requires_both_selectors() {
        assert!(settings(&[("LOTO_EXTRACTION", "selector")]).is_err());

        let settings = settings(&[
            ("LOTO_EXTRACTION", "selector"),
            ("LOTO_RESULTS_CONTAINER", "#loto-results"),
            ("LOTO_BALL_SELECTOR", "li.ball"),
        ])
        .unwrap();
        assert_eq!(settings.config.extraction.type_name(), "selector");
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(settings(&[("LOTO_EXTRACTION", "regex")]).is_err());
        assert!(settings(&[("LOTO_SHOW_DATE", "maybe")]).is_err());
        assert!(settings(&[("LOTO_TIMEOUT_SECS", "ten")]).is_err());

        let settings = settings(&[("LOTO_LOG_LEVEL", "verbose")]).unwrap();
        assert!(settings.validate().is_err());
    }
}
