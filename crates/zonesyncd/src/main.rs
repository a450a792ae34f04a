// # zonesyncd - zonesync command-line front end
//
// A THIN integration layer: it reads configuration, registers clients,
// builds a ZoneSyncEngine and runs a single command. Grouping, caching and
// change application all live in zonesync-core.
//
// ## Commands
//
// - `zonesyncd dump [zone]`: populate zones and print their records as JSON;
//   without a zone, every zone listed in the configuration file is dumped
// - `zonesyncd apply <plan.json>`: apply a plan file and print the report as JSON
//
// ## Configuration
//
// An optional JSON file (`--config` or `ZONESYNC_CONFIG`) holds a
// `SyncConfig`: provider, zones and engine settings. Environment variables
// override it, and are sufficient on their own for the Infomaniak provider:
//
// - `ZONESYNC_PROVIDER_TYPE`: Provider type (infomaniak)
// - `ZONESYNC_API_TOKEN`: API token (required without a configuration file)
// - `ZONESYNC_BASE_URL`: API base URL override (optional)
// - `ZONESYNC_MODE`: `live` or `dry-run` (default: live)
// - `ZONESYNC_LENIENT`: `true` to let duplicate records replace each other on dump
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export ZONESYNC_API_TOKEN=your_token
// export ZONESYNC_MODE=dry-run
//
// zonesyncd dump example.com.
// zonesyncd --config zonesync.json dump
// zonesyncd apply plan.json
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::{
    ClientRegistry, Plan, ProviderConfig, SyncConfig, Zone, ZoneSink, ZoneSyncEngine,
};

/// Exit codes for different termination scenarios
///
/// - 0: Command succeeded (or help was printed)
/// - 1: Configuration or usage error
/// - 2: Runtime error (provider or apply failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZonesyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<ZonesyncExitCode> for ExitCode {
    fn from(code: ZonesyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "zonesyncd", version)]
#[command(about = "Sync grouped DNS records with a per-value provider API", long_about = None)]
struct Cli {
    /// JSON configuration file (provider, zones, engine settings)
    #[arg(short, long, env = "ZONESYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Populate zones and print their records as JSON
    Dump {
        /// Dot-terminated zone name; defaults to every configured zone
        zone: Option<String>,
    },
    /// Apply a plan file and print the report as JSON
    Apply {
        /// Path to the plan JSON file
        plan_path: PathBuf,
    },
}

/// Work resolved from the command line and the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    Dump { zones: Vec<String> },
    Apply { plan_path: PathBuf },
}

impl Task {
    fn resolve(command: Command, sync: &SyncConfig) -> Result<Self> {
        match command {
            Command::Dump { zone: Some(zone) } => Ok(Task::Dump { zones: vec![zone] }),
            Command::Dump { zone: None } => {
                if sync.zones.is_empty() {
                    anyhow::bail!(
                        "No zone given and none configured. \
                        Pass one (zonesyncd dump example.com.) or list zones in the configuration file"
                    );
                }
                Ok(Task::Dump {
                    zones: sync.zones.clone(),
                })
            }
            Command::Apply { plan_path } => Ok(Task::Apply { plan_path }),
        }
    }
}

/// Application settings
struct Settings {
    sync: SyncConfig,
    log_level: String,
}

impl Settings {
    /// Load settings from the optional file and the environment
    fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::from_sources(config_path, |key| env::var(key).ok())
    }

    fn from_sources<F>(config_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut sync = match config_path {
            Some(path) => SyncConfig::from_file(path)
                .with_context(|| format!("Failed to read configuration {}", path.display()))?,
            None => SyncConfig::new(ProviderConfig::Infomaniak {
                api_token: lookup("ZONESYNC_API_TOKEN").context(
                    "ZONESYNC_API_TOKEN is required. Set it via: export ZONESYNC_API_TOKEN=your_token",
                )?,
                base_url: None,
            }),
        };

        if let Some(provider_type) = lookup("ZONESYNC_PROVIDER_TYPE")
            && provider_type != sync.provider.type_name()
        {
            anyhow::bail!(
                "ZONESYNC_PROVIDER_TYPE '{}' is not supported here; the configured provider is '{}'",
                provider_type,
                sync.provider.type_name()
            );
        }

        if let ProviderConfig::Infomaniak { api_token, base_url } = &mut sync.provider {
            if let Some(token) = lookup("ZONESYNC_API_TOKEN") {
                *api_token = token;
            }
            if let Some(url) = lookup("ZONESYNC_BASE_URL").filter(|url| !url.is_empty()) {
                *base_url = Some(url);
            }
        }

        match lookup("ZONESYNC_MODE").as_deref() {
            Some("live") => sync.engine.dry_run = false,
            Some("dry-run") => sync.engine.dry_run = true,
            Some(other) => anyhow::bail!(
                "ZONESYNC_MODE '{}' is not valid. Valid modes: live, dry-run",
                other
            ),
            None => {}
        }

        if let Some(value) = lookup("ZONESYNC_LENIENT") {
            sync.engine.lenient = parse_flag(&value)
                .with_context(|| format!("ZONESYNC_LENIENT '{}' is not a boolean", value))?;
        }

        let log_level = lookup("ZONESYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        if parse_level(&log_level).is_none() {
            anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                log_level
            );
        }

        sync.validate()?;
        Ok(Self { sync, log_level })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let _ = e.print();
            let code = if e.use_stderr() {
                ZonesyncExitCode::ConfigError
            } else {
                ZonesyncExitCode::Success
            };
            return code.into();
        }
    };

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    let task = match Task::resolve(cli.command, &settings.sync) {
        Ok(task) => task,
        Err(e) => {
            eprintln!("{:#}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr so stdout stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&settings.log_level).unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    let engine = match build_engine(&settings.sync) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to create remote client: {:#}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonesyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run(&engine, &settings.sync, task).await {
            Ok(()) => ZonesyncExitCode::Success,
            Err(e) => {
                error!("zonesyncd failed: {:#}", e);
                ZonesyncExitCode::RuntimeError
            }
        }
    });

    result.into()
}

fn build_engine(sync: &SyncConfig) -> Result<ZoneSyncEngine> {
    let registry = ClientRegistry::new();

    #[cfg(feature = "infomaniak")]
    zonesync_provider_infomaniak::register(&registry);

    if sync.engine.dry_run {
        warn!("Running in DRY-RUN mode - records will be read but not changed");
    }

    let client = registry.create_client(&sync.provider, sync.engine.dry_run)?;
    info!("Using {} client", client.client_name());

    Ok(ZoneSyncEngine::new(client))
}

async fn run(engine: &ZoneSyncEngine, sync: &SyncConfig, task: Task) -> Result<()> {
    match task {
        Task::Dump { zones } => {
            let mut dumps = Vec::with_capacity(zones.len());

            for zone in zones {
                let mut container = Zone::new(zone)?;
                let outcome = engine
                    .populate(&mut container, false, sync.engine.lenient)
                    .await?;

                if outcome.degraded {
                    warn!("Remote read failed; {} is reported empty", container.name());
                }

                dumps.push(serde_json::json!({
                    "zone": container.name(),
                    "outcome": outcome,
                    "records": container.records(),
                }));
            }

            println!("{}", serde_json::to_string_pretty(&dumps)?);
        }
        Task::Apply { plan_path } => {
            let plan = Plan::from_file(&plan_path)
                .with_context(|| format!("Failed to load plan {}", plan_path.display()))?;
            info!("Applying {} change(s) to {}", plan.len(), plan.zone);

            let report = engine.apply(&plan).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
