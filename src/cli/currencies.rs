use super::ui;
use crate::core::{Currency, ExchangeRateProvider, symbol};
use anyhow::Result;
use comfy_table::Cell;

pub fn display_as_table(currencies: &[Currency]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
    ]);

    for currency in currencies {
        let code = currency.code.as_str();
        table.add_row(vec![
            Cell::new(code),
            Cell::new(&currency.name),
            Cell::new(symbol::lookup(code)),
        ]);
    }

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("{} currencies", currencies.len()),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(provider: &(dyn ExchangeRateProvider + Send + Sync)) -> Result<()> {
    let pb = ui::new_spinner("Fetching currencies...");
    let currencies = provider.list_currencies().await;
    pb.finish_and_clear();

    println!("{}", display_as_table(&currencies?));
    Ok(())
}
