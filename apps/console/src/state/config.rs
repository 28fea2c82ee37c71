//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`QUOTEDESK_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// ## Fields
/// Most fields have sensible defaults for development.
/// Production deployments should configure these properly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Company name (displayed in quote headers)
    pub company_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Data directory override. None = platform default.
    #[serde(skip)]
    pub data_dir: Option<PathBuf>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Company: "QuoteDesk Dev"
    /// - Currency: USD ($), 2 decimals
    /// - Data directory: platform default
    fn default() -> Self {
        ConfigState {
            company_name: "QuoteDesk Dev".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            data_dir: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `QUOTEDESK_COMPANY_NAME`: Override company name
    /// - `QUOTEDESK_CURRENCY_SYMBOL`: Override currency symbol
    /// - `QUOTEDESK_DATA_DIR`: Override the data directory
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(name) = std::env::var("QUOTEDESK_COMPANY_NAME") {
            config.company_name = name;
        }

        if let Ok(symbol) = std::env::var("QUOTEDESK_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Ok(dir) = std::env::var("QUOTEDESK_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(296_640), "$2966.40");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_currency_worked_example() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(296_640), "$2966.40");
    }
}
