//! Locale-aware currency formatting for the summary cards

use anyhow::{Context, Result};
use num_format::{Locale, ToFormattedString};

use crate::config::CurrencyConfig;

/// A currency symbol plus the locale driving digit grouping and the
/// decimal separator. Amounts render with two fixed decimals.
#[derive(Debug, Clone)]
pub struct CurrencyStyle {
    symbol: String,
    locale: Locale,
}

impl CurrencyStyle {
    pub fn from_config(config: &CurrencyConfig) -> Result<Self> {
        let locale = parse_locale(&config.locale)
            .with_context(|| format!("unknown currency locale '{}'", config.locale))?;
        Ok(Self {
            symbol: config.symbol.clone(),
            locale,
        })
    }

    pub fn format(&self, amount: f64) -> String {
        // Work in cents so rounding happens once.
        let cents = (amount * 100.0).round() as i64;
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.abs();
        let whole = (cents / 100).to_formatted_string(&self.locale);
        let fraction = cents % 100;
        format!(
            "{sign}{symbol}{whole}{decimal}{fraction:02}",
            symbol = self.symbol,
            decimal = self.locale.decimal(),
        )
    }
}

/// Accepts both `en_US` and `en-US` spellings.
pub fn parse_locale(name: &str) -> Result<Locale, num_format::Error> {
    Locale::from_name(name.replace('_', "-"))
        .or_else(|_| Locale::from_name(name.replace('-', "_")))
}
