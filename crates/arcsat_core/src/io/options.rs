use std::{env, path::PathBuf, time::Duration};

use arcsat_derive::{CliOptions, CliValue, KvDisplay};
use log::LevelFilter;

use crate::{Error, Filter, Result};

/// Runtime options for the `arcsat` command.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct AppOptions {
    /// Business records JSON; mock data is generated when absent or unreadable.
    #[cli(long = "clients")]
    #[kv(fmt = "opt_path")]
    pub clients: Option<PathBuf>,
    /// Relationship links JSON.
    #[cli(long = "links")]
    #[kv(fmt = "opt_path")]
    pub links: Option<PathBuf>,
    /// Number of mock records to generate.
    #[cli(long = "mock-count")]
    pub mock_count: usize,
    /// Seed for the mock generator.
    #[cli(long = "seed")]
    pub seed: u64,
    /// Category filter applied before analysis.
    #[cli(long = "filter", parse_with = "Filter::parse", value_name = "all|supplier|buyer|client")]
    pub filter: Filter,
    /// Analyses to run on the visible points.
    #[cli(long = "analysis", parse_with = "Analysis::parse", value_name = "centroids|route|all")]
    pub analysis: Analysis,
    /// Render the visible points as a heatmap instead of markers.
    #[cli(long = "heatmap", flag)]
    pub heatmap: bool,
    /// Delay between geocoding requests in milliseconds.
    #[cli(long = "geocode-delay-ms")]
    #[kv(fmt = "ms")]
    pub geocode_delay_ms: u64,
    /// Per-address geocoding timeout in milliseconds.
    #[cli(long = "geocode-timeout-ms")]
    #[kv(fmt = "ms")]
    pub geocode_timeout_ms: u64,
    /// Write map features as GeoJSON.
    #[cli(long = "geojson")]
    #[kv(fmt = "opt_path")]
    pub geojson: Option<PathBuf>,
    /// Write the visible entities as CSV.
    #[cli(long = "csv")]
    #[kv(fmt = "opt_path")]
    pub csv: Option<PathBuf>,
    /// Write the optimized route as CSV.
    #[cli(long = "route-csv")]
    #[kv(fmt = "opt_path")]
    pub route_csv: Option<PathBuf>,
    /// Logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse", value_name = "error|warn|info|debug|trace|off")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse", value_name = "compact|pretty")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Log file path; stderr when absent.
    #[cli(long = "log-output")]
    #[kv(fmt = "opt_path")]
    pub log_output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "analysis")]
pub enum Analysis {
    #[cli(alias = "centroid")]
    Centroids,
    Route,
    All,
}

impl Analysis {
    pub fn centroids(self) -> bool {
        matches!(self, Self::Centroids | Self::All)
    }

    pub fn route(self) -> bool {
        matches!(self, Self::Route | Self::All)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            clients: None,
            links: None,
            mock_count: 100,
            seed: 42,
            filter: Filter::All,
            analysis: Analysis::All,
            heatmap: false,
            geocode_delay_ms: 100,
            geocode_timeout_ms: 5_000,
            geojson: None,
            csv: None,
            route_csv: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: None,
        }
    }
}

impl AppOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  arcsat [options]\n\n",
                "Options:\n",
                "{}",
                "  --help\n",
                "\n",
                "Examples:\n",
                "  arcsat --mock-count 200 --analysis all --geojson map.geojson\n",
                "  arcsat --clients clientes-categorizados.json --links vinculos-contatos-clientes.json\n",
                "  arcsat --filter supplier --analysis route --route-csv route.csv\n",
                "  arcsat --filter=buyer --heatmap --log-level=debug --log-format=pretty\n",
            ),
            Self::option_lines()
        )
    }

    pub fn geocode_delay(&self) -> Duration {
        Duration::from_millis(self.geocode_delay_ms)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }
}
