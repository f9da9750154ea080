//! Currency conversion abstractions and core types

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;

/// Three letter currency identifier, e.g. `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow!("Invalid currency code: {}", s));
        }
        Ok(CurrencyCode(code.to_ascii_uppercase()))
    }
}

/// An entry of the provider's supported currency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: String,
}

/// Smallest amount accepted for conversion (0.01).
pub fn min_amount() -> Decimal {
    Decimal::new(1, 2)
}

/// Largest amount accepted for conversion (1e14).
pub fn max_amount() -> Decimal {
    Decimal::from(100_000_000_000_000_i64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    amount: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
    date: Option<NaiveDate>,
}

impl ConversionRequest {
    /// Builds a request, rejecting amounts outside `[0.01, 1e14]`.
    ///
    /// Neither the currency pair nor the date is checked here; the provider is
    /// the authority on both.
    pub fn new(
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            amount,
            from,
            to,
            date,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn from(&self) -> &CurrencyCode {
        &self.from
    }

    pub fn to(&self) -> &CurrencyCode {
        &self.to
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount < min_amount() || amount > max_amount() {
        bail!(
            "Amount must be between {} and {}, got {}",
            min_amount(),
            max_amount(),
            amount
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider answered but refused the conversion.
    Domain,
    /// The HTTP exchange itself failed or returned something unreadable.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Success {
        amount: Decimal,
        rate: Option<Decimal>,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl ConversionResult {
    pub fn domain_failure(message: impl Into<String>) -> Self {
        ConversionResult::Failure {
            kind: FailureKind::Domain,
            message: message.into(),
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        ConversionResult::Failure {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Returns the currencies supported by the provider, ordered by code.
    async fn list_currencies(&self) -> Result<Vec<Currency>>;

    /// Converts `request.amount()` between the requested currencies. Never fails
    /// with an `Err`; transport problems come back as `ConversionResult::Failure`.
    async fn convert(&self, request: &ConversionRequest) -> ConversionResult;
}
