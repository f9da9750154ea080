use super::ui;
use crate::core::currency::validate_amount;
use crate::core::{
    ConversionRequest, ConversionResult, Currency, CurrencyCode, ExchangeRateProvider,
};
use crate::core::symbol;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

/// Raw user input for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub amount: Decimal,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Outcome of a conversion as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success {
        text: String,
        detail: Option<String>,
    },
    Error(String),
}

impl Banner {
    pub fn text(&self) -> &str {
        match self {
            Banner::Success { text, .. } => text,
            Banner::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Banner::Error(_))
    }

    pub fn display(&self) -> String {
        match self {
            Banner::Success { text, detail } => {
                let mut output = ui::style_text(text, ui::StyleType::Success);
                if let Some(detail) = detail {
                    output.push('\n');
                    output.push_str(&ui::style_text(detail, ui::StyleType::Subtle));
                }
                output
            }
            Banner::Error(text) => ui::style_text(text, ui::StyleType::Error),
        }
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Rounds half away from zero, so 0.005 shows as 0.01.
fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn render(result: &ConversionResult, request: &ConversionRequest) -> Banner {
    match result {
        ConversionResult::Success { amount, rate } => {
            let to = request.to();
            Banner::Success {
                text: format!("{} {:.2}", symbol::lookup(to.as_str()), to_cents(*amount)),
                detail: rate
                    .map(|r| format!("1 {} = {} {}", request.from(), r.normalize(), to)),
            }
        }
        ConversionResult::Failure { message, .. } => Banner::Error(format!("Error: {message}")),
    }
}

/// Picks the user's choice, or the entry at `default_index` of the list.
///
/// A code missing from the list is still returned; the provider decides
/// whether it can convert it.
fn select_currency(
    choice: Option<&str>,
    currencies: &[Currency],
    default_index: usize,
) -> Result<CurrencyCode> {
    match choice {
        Some(input) => {
            let code: CurrencyCode = input.parse()?;
            if !currencies.iter().any(|c| c.code == code) {
                warn!(%code, "Currency is not in the provider's list");
            }
            Ok(code)
        }
        None => currencies
            .get(default_index)
            .or_else(|| currencies.first())
            .map(|c| c.code.clone())
            .ok_or_else(|| anyhow!("Provider returned no currencies")),
    }
}

/// Validates input and resolves defaults. The amount is checked before any
/// request is made.
pub async fn prepare_request(
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    args: &ConvertArgs,
) -> Result<ConversionRequest> {
    validate_amount(args.amount)?;

    let currencies = provider.list_currencies().await?;
    let from = select_currency(args.from.as_deref(), &currencies, 0)?;
    let to = select_currency(args.to.as_deref(), &currencies, 1)?;
    let date = args.date.unwrap_or_else(today);

    ConversionRequest::new(args.amount, from, to, Some(date))
}

pub async fn execute(
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    args: &ConvertArgs,
) -> Result<Banner> {
    let request = prepare_request(provider, args).await?;
    debug!(?request, "Submitting conversion");

    let pb = ui::new_spinner("Converting...");
    let result = provider.convert(&request).await;
    pb.finish_and_clear();
    debug!(success = result.is_success(), "Conversion finished");

    Ok(render(&result, &request))
}

pub async fn run(
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    args: &ConvertArgs,
) -> Result<()> {
    let banner = execute(provider, args).await?;
    println!("{}", banner.display());
    Ok(())
}
