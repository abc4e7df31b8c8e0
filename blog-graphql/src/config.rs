use blog_core::common::{BlogError, Result};
use blog_core::DatabaseTarget;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "blog.db";

#[derive(Parser, Debug, Default)]
#[command(name = "blog-graphql")]
#[command(about = "GraphQL API server for users and their posts")]
#[command(version)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to run the server on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Database location: a SQLite file path, or a libsql:// URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Keep data in memory instead of the database (data will not persist)
    #[arg(long)]
    pub in_memory: bool,

    /// Directory for JSON log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Disable the Prometheus /metrics endpoint
    #[arg(long)]
    pub no_metrics: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    server: ServerSection,
    database: DatabaseSection,
    logging: LoggingSection,
    metrics: MetricsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DatabaseSection {
    url: Option<String>,
    auth_token: Option<String>,
    in_memory: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MetricsSection {
    enabled: Option<bool>,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BlogError::Config {
            message: format!("Failed to read config file '{}': {e}", path.display()),
        })?;

        toml::from_str(&content).map_err(|e| BlogError::Config {
            message: format!("Failed to parse config file '{}': {e}", path.display()),
        })
    }
}

/// Where rows are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Database(DatabaseTarget),
    InMemory,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub storage: StorageBackend,
    pub log_dir: Option<PathBuf>,
    pub metrics_enabled: bool,
}

impl Config {
    /// Resolve configuration from, in increasing precedence: defaults, the
    /// TOML file named by `--config`, environment variables, and CLI flags.
    pub fn load<F>(args: &Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let host = args
            .host
            .clone()
            .or_else(|| env("BLOG_HOST"))
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host.parse().map_err(|e| BlogError::Config {
            message: format!("Invalid host '{host}': {e}"),
        })?;

        let port = match args.port {
            Some(port) => port,
            None => match env("BLOG_PORT") {
                Some(raw) => raw.parse().map_err(|e| BlogError::Config {
                    message: format!("Invalid BLOG_PORT '{raw}': {e}"),
                })?,
                None => file.server.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let in_memory = args.in_memory || file.database.in_memory.unwrap_or(false);
        let storage = if in_memory {
            StorageBackend::InMemory
        } else {
            let url = args
                .database_url
                .clone()
                .or_else(|| env("BLOG_DATABASE_URL"))
                .or(file.database.url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
            let auth_token = env("LIBSQL_AUTH_TOKEN").or(file.database.auth_token);
            StorageBackend::Database(DatabaseTarget::parse(&url, auth_token)?)
        };

        let log_dir = args
            .log_dir
            .clone()
            .or_else(|| env("BLOG_LOG_DIR").map(PathBuf::from))
            .or(file.logging.dir);

        let metrics_enabled = if args.no_metrics {
            false
        } else {
            match env("BLOG_METRICS") {
                Some(raw) => parse_flag(&raw)?,
                None => file.metrics.enabled.unwrap_or(true),
            }
        };

        Ok(Self {
            host,
            port,
            storage,
            log_dir,
            metrics_enabled,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(BlogError::Config {
            message: format!("Invalid boolean '{other}'"),
        }),
    }
}
