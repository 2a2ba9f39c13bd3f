use crate::chain::config;
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Single,
    Watch,
    Server,
}

impl Mode {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "watch" => Ok(Mode::Watch),
            "server" => Ok(Mode::Server),
            other => bail!("Invalid mode '{}'. Use 'single', 'watch' or 'server'", other),
        }
    }
}

/// Application configuration handler
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub token: Option<String>,
    pub instrument_key: String,
    pub expiry: NaiveDate,
    pub strikes: i64,
    pub refresh_secs: u64,
    pub csv_path: Option<String>,
}

impl AppConfig {
    /// Create new configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), Local::now().date_naive())
    }

    /// Build from any key lookup; `today` anchors the default expiry
    pub fn from_lookup<F>(lookup: F, today: NaiveDate) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = Mode::parse(&get("CHAIN_MODE").unwrap_or_else(|| "single".to_string()))?;

        let port = match get("CHAIN_PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("Invalid CHAIN_PORT '{}'", raw))?,
            None => config::DEFAULT_PORT,
        };

        let expiry = match get("CHAIN_EXPIRY") {
            Some(raw) => NaiveDate::parse_from_str(&raw, config::EXPIRY_WIRE_FORMAT)
                .with_context(|| format!("Invalid CHAIN_EXPIRY '{}', expected YYYY-MM-DD", raw))?,
            None => config::default_expiry(today),
        };

        let strikes = match get("CHAIN_STRIKES") {
            Some(raw) => raw.parse::<i64>().with_context(|| format!("Invalid CHAIN_STRIKES '{}'", raw))?,
            None => config::DEFAULT_STRIKES,
        };

        let refresh_secs = match get("CHAIN_REFRESH_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid CHAIN_REFRESH_SECS '{}'", raw))?
                .max(1),
            None => config::DEFAULT_REFRESH_SECS,
        };

        Ok(Self {
            mode,
            host: get("CHAIN_HOST").unwrap_or_else(|| config::DEFAULT_HOST.to_string()),
            port,
            base_url: get("UPSTOX_BASE_URL").unwrap_or_else(|| config::UPSTOX_BASE_URL.to_string()),
            token: get("UPSTOX_ACCESS_TOKEN"),
            instrument_key: config::resolve_instrument_key(
                &get("CHAIN_INSTRUMENT").unwrap_or_else(|| "NIFTY".to_string()),
            ),
            expiry,
            strikes,
            refresh_secs,
            csv_path: get("CHAIN_CSV_PATH"),
        })
    }

    /// Validate configuration for the selected mode
    pub fn validate(&self) -> Result<()> {
        if self.mode != Mode::Server && self.token.is_none() {
            bail!("UPSTOX_ACCESS_TOKEN must be set for '{:?}' mode", self.mode);
        }
        Ok(())
    }
}
