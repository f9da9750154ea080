use super::convert::{self, ConvertArgs};
use super::ui;
use crate::core::currency::validate_amount;
use crate::core::{CurrencyCode, ExchangeRateProvider};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use console::Term;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;

/// Parses `input`, falling back to `default` when it is blank.
fn parse_or_default<T>(input: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }
    input.parse::<T>().map_err(|e| anyhow!("{e}"))
}

fn parse_yes_no(input: &str, default: bool) -> Result<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(anyhow!("expected y or n, got '{other}'")),
    }
}

/// Asks for a field until the answer parses and passes `validate`.
fn prompt<T>(
    term: &Term,
    label: &str,
    default: T,
    validate: impl Fn(&T) -> Result<()>,
) -> Result<T>
where
    T: FromStr + Display + Clone,
    T::Err: Display,
{
    loop {
        term.write_str(&format!("{label} [{default}]: "))?;
        let line = term.read_line()?;
        let answer = parse_or_default(&line, default.clone())
            .and_then(|value| validate(&value).map(|_| value));
        match answer {
            Ok(value) => return Ok(value),
            Err(e) => {
                let message = format!("Invalid {label}: {e}");
                term.write_line(&ui::style_text(&message, ui::StyleType::Error))?;
            }
        }
    }
}

fn confirm(term: &Term, question: &str) -> Result<bool> {
    loop {
        term.write_str(&format!("{question} [y/N]: "))?;
        match parse_yes_no(&term.read_line()?, false) {
            Ok(answer) => return Ok(answer),
            Err(e) => term.write_line(&ui::style_text(&e.to_string(), ui::StyleType::Error))?,
        }
    }
}

/// Interactive conversion form. The currency list is fetched once and reused
/// for every conversion in the session.
pub async fn run(provider: &(dyn ExchangeRateProvider + Send + Sync)) -> Result<()> {
    let term = Term::stdout();
    term.write_line(&ui::style_text("Currency Converter", ui::StyleType::Title))?;

    let currencies = provider.list_currencies().await?;
    let codes: Vec<&str> = currencies.iter().map(|c| c.code.as_str()).collect();
    term.write_line(&ui::style_text(
        &format!("Available: {}", codes.join(", ")),
        ui::StyleType::Subtle,
    ))?;

    let mut from_default = currencies
        .first()
        .map(|c| c.code.clone())
        .ok_or_else(|| anyhow!("Provider returned no currencies"))?;
    let mut to_default = currencies
        .get(1)
        .map_or_else(|| from_default.clone(), |c| c.code.clone());
    let mut amount_default = Decimal::new(10, 1);

    loop {
        let amount: Decimal = prompt(&term, "Amount", amount_default, |a| validate_amount(*a))?;
        let from: CurrencyCode = prompt(&term, "From", from_default.clone(), |_| Ok(()))?;
        let to: CurrencyCode = prompt(&term, "To", to_default.clone(), |_| Ok(()))?;
        let date: NaiveDate = prompt(&term, "Conversion Date", convert::today(), |_| Ok(()))?;

        let args = ConvertArgs {
            amount,
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            date: Some(date),
        };
        match convert::execute(provider, &args).await {
            Ok(banner) => term.write_line(&banner.display())?,
            Err(e) => term.write_line(&ui::style_text(
                &format!("Error: {e:#}"),
                ui::StyleType::Error,
            ))?,
        }

        amount_default = amount;
        from_default = from;
        to_default = to;

        if !confirm(&term, "Convert another?")? {
            break;
        }
    }
    Ok(())
}
