use std::time::Duration;

use anyhow::{bail, Context};
use tradejournal_symbol_input::{InputFlags, SymbolInputConfig};

/// Where lookups go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    Directory,
}

pub struct Config {
    pub provider: ProviderKind,
    pub search_delay: Duration,
    pub validate_delay: Duration,
    pub flags: InputFlags,
    /// `text` or `json`.
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let provider = match var("TJ_PROVIDER")
            .unwrap_or_else(|| "directory".into())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "yahoo" => ProviderKind::Yahoo,
            "directory" => ProviderKind::Directory,
            other => bail!("Invalid TJ_PROVIDER '{}' (expected yahoo or directory)", other),
        };

        let search_ms = parse_ms(var("TJ_SEARCH_DELAY_MS"), "TJ_SEARCH_DELAY_MS", 300)?;
        let validate_ms = parse_ms(var("TJ_VALIDATE_DELAY_MS"), "TJ_VALIDATE_DELAY_MS", 800)?;

        let defaults = InputFlags::default();
        let flags = InputFlags {
            show_price: parse_flag(var("TJ_SHOW_PRICE"), defaults.show_price),
            auto_fetch_price: parse_flag(var("TJ_AUTO_FETCH_PRICE"), defaults.auto_fetch_price),
            disabled: false,
            required: parse_flag(var("TJ_REQUIRED"), defaults.required),
        };

        let log_format = var("TJ_LOG_FORMAT")
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "text".to_string());

        Ok(Self {
            provider,
            search_delay: Duration::from_millis(search_ms),
            validate_delay: Duration::from_millis(validate_ms),
            flags,
            log_format,
        })
    }

    pub fn input_config(&self) -> SymbolInputConfig {
        SymbolInputConfig::default()
            .with_search_delay(self.search_delay)
            .with_validate_delay(self.validate_delay)
            .with_flags(self.flags)
    }
}

fn parse_ms(value: Option<String>, key: &str, default: u64) -> anyhow::Result<u64> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} '{}'", key, raw)),
    }
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some("1") => true,
        Some("0") => false,
        Some(v) if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("no") => false,
        _ => default,
    }
}
