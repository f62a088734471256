use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::backend::types::DEFAULT_TENANT_ID;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind the HTTP transport to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// MCP transport to serve
    #[arg(long, env = "MCP_TRANSPORT", value_enum)]
    pub transport: Option<Transport>,

    /// Base URL of the vector-store backend
    #[arg(long, env = "CHROMADB_URL")]
    pub backend_url: Option<String>,

    /// Tenant that scopes every stored and searched memory
    #[arg(long, env = "TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Per-request timeout for backend calls, in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// How the MCP service is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Streamable HTTP at `/mcp`, plus `/healthz`.
    Http,
    /// Newline-delimited JSON-RPC over stdin/stdout.
    Stdio,
}

impl Transport {
    fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Stdio => "stdio",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Required. There is deliberately no default.
    pub base_url: String,
    pub tenant_id: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Parse `args` as command-line flags and load the layered config.
    ///
    /// Every clap outcome that is not a successful parse, `--help` included,
    /// comes back as [`config::ConfigError`].
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(cli)
    }

    /// Load the layered config with `cli` as the highest-priority source.
    pub fn from_cli(cli: Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.transport", "http")?
            .set_default("backend.tenant_id", DEFAULT_TENANT_ID)?
            .set_default("backend.timeout_secs", 10)?;

        // 2. Config file: explicit path must exist, ./config.* is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables, e.g. REMEMBAR_BACKEND__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("REMEMBAR")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their plain env fallbacks) win over everything
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(transport) = cli.transport {
            builder = builder.set_override("server.transport", transport.as_str())?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(tenant) = cli.tenant_id {
            builder = builder.set_override("backend.tenant_id", tenant)?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("backend.timeout_secs", secs)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        self.backend.validate()
    }
}

impl BackendConfig {
    fn validate(&self) -> Result<(), config::ConfigError> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(config::ConfigError::Message(
                "backend.base_url cannot be empty".to_string(),
            ));
        }
        let url = Url::parse(raw).map_err(|e| {
            config::ConfigError::Message(format!("backend.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(config::ConfigError::Message(format!(
                "backend.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.tenant_id.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "backend.tenant_id cannot be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(backend("http://localhost:9000").validate().is_ok());
        assert!(backend("https://memary.example.app").validate().is_ok());
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(backend("").validate().is_err());
        assert!(backend("   ").validate().is_err());
        assert!(backend("not a url").validate().is_err());
        assert!(backend("ftp://files.example.com").validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = backend("http://localhost:9000");
        cfg.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
