use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use weather_dash_core::{
    Config, Controls, Metric, Trigger, dashboard,
    provider::source_from_config,
    window::DEFAULT_HOURS,
};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Live weather dashboard")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write settings to the config file, keeping any value not given.
    Configure(ConfigureArgs),

    /// Serve the dashboard page.
    Serve {
        /// Listen address, e.g. "0.0.0.0:8050". Overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run a single cycle and print the text lines.
    Show {
        /// temperature, humidity or wind_speed.
        #[arg(long, default_value = "temperature", value_parser = parse_metric)]
        metric: Metric,

        /// Window length in hours (1-168).
        #[arg(long, default_value_t = DEFAULT_HOURS)]
        hours: u32,

        /// Print the whole render output, charts included, as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Default, Args)]
pub struct ConfigureArgs {
    /// Listen address for `serve`.
    #[arg(long)]
    pub bind: Option<String>,

    /// Open-Meteo base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Upstream request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Page refresh interval in milliseconds.
    #[arg(long)]
    pub refresh_ms: Option<u64>,
}

impl ConfigureArgs {
    fn apply(self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.api.timeout_secs = timeout_secs;
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.dashboard.refresh_ms = refresh_ms;
        }
    }
}

/// Apply `args` on top of `config`, validate, and write the result to `path`.
fn configure(mut config: Config, args: ConfigureArgs, path: &Path) -> anyhow::Result<Config> {
    args.apply(&mut config);
    config.validate().context("Refusing to save invalid configuration")?;
    config.save_to(path)?;

    tracing::info!(path = %path.display(), "saved configuration");
    Ok(config)
}

fn parse_metric(raw: &str) -> Result<Metric, String> {
    Metric::try_from(raw).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure(args) => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                configure(config, args, &path)?;
                println!("Configuration saved to {}", path.display());
                Ok(())
            }
            Command::Serve { bind } => {
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                let addr = config.bind_addr()?;

                let source = source_from_config(&config)?;
                tracing::info!(
                    base_url = %config.api.base_url,
                    refresh_ms = config.dashboard.refresh_ms,
                    "Starting weather dashboard"
                );

                let state = AppState {
                    source: Arc::from(source),
                    config: Arc::new(config),
                };
                server::serve(state, addr).await
            }
            Command::Show { metric, hours, json } => {
                let controls = Controls::new(metric, hours)?;
                let source = source_from_config(&config)?;

                let output = dashboard::run_cycle(source.as_ref(), Trigger::default(), controls)
                    .await
                    .context("Dashboard cycle failed")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    for line in &output.current_weather {
                        println!("{line}");
                    }
                    println!("{}", output.summary);
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_bind() {
        let cli = Cli::try_parse_from(["weather-dash", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_defaults() {
        let cli = Cli::try_parse_from(["weather-dash", "show"]).unwrap();
        match cli.command {
            Command::Show { metric, hours, json } => {
                assert_eq!(metric, Metric::Temperature);
                assert_eq!(hours, 12);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_rejects_unknown_metric() {
        let err = Cli::try_parse_from(["weather-dash", "show", "--metric", "pressure"]).unwrap_err();
        assert!(err.to_string().contains("Unknown metric"));
    }

    #[test]
    fn parses_configure_flags() {
        let cli = Cli::try_parse_from([
            "weather-dash",
            "configure",
            "--bind",
            "0.0.0.0:8050",
            "--refresh-ms",
            "30000",
        ])
        .unwrap();
        match cli.command {
            Command::Configure(args) => {
                assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8050"));
                assert_eq!(args.refresh_ms, Some(30_000));
                assert!(args.base_url.is_none());
                assert!(args.timeout_secs.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_saves_overrides_and_keeps_the_rest() {
        let dir =
            std::env::temp_dir().join(format!("weather-dash-configure-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut existing = Config::default();
        existing.api.timeout_secs = 7;
        let args = ConfigureArgs {
            base_url: Some("http://localhost:4321".to_string()),
            refresh_ms: Some(5_000),
            ..Default::default()
        };
        configure(existing, args, &path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://localhost:4321");
        assert_eq!(loaded.dashboard.refresh_ms, 5_000);
        assert_eq!(loaded.api.timeout_secs, 7);
        assert_eq!(loaded.server.bind, weather_dash_core::config::DEFAULT_BIND);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn configure_rejects_invalid_values_without_writing() {
        let path = std::env::temp_dir()
            .join(format!("weather-dash-configure-bad-{}", std::process::id()))
            .join("config.toml");

        let args = ConfigureArgs {
            bind: Some("not an address".to_string()),
            ..Default::default()
        };
        let err = configure(Config::default(), args, &path).unwrap_err();

        assert!(format!("{err:#}").contains("Invalid bind address"));
        assert!(!path.exists());
    }

    #[test]
    fn global_config_flag() {
        let cli =
            Cli::try_parse_from(["weather-dash", "show", "--config", "/tmp/dash.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/dash.toml")));
    }
}
