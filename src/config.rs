use std::env;

use anyhow::{Context, bail};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// ISO 4217 code stamped on payroll expense lines
    pub payroll_currency: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let rate_protected_per_min = or_default("RATE_PROTECTED_PER_MIN", "1000")
            .parse()
            .context("RATE_PROTECTED_PER_MIN must be a number")?;
        let log_level = or_default("LOG_LEVEL", "debug")
            .parse()
            .context("LOG_LEVEL must be one of trace, debug, info, warn, error")?;
        let run_migrations = or_default("RUN_MIGRATIONS", "true")
            .parse()
            .context("RUN_MIGRATIONS must be true or false")?;

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            rate_protected_per_min,
            api_prefix: or_default("API_PREFIX", "/api"),
            payroll_currency: validate_currency(&or_default("PAYROLL_CURRENCY", "IDR"))?,
            log_dir: or_default("LOG_DIR", "logs"),
            log_level,
            run_migrations,
        })
    }
}

fn validate_currency(code: &str) -> anyhow::Result<String> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        bail!("PAYROLL_CURRENCY must be a three-letter uppercase code, got '{code}'");
    }
    Ok(code.to_string())
}
