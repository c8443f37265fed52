use super::ui;
use crate::core::{CurrencyCode, CurrencyInfo, CurrencyService};
use anyhow::Result;
use comfy_table::Cell;

pub fn currencies_table(currencies: &[CurrencyInfo]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Native"),
        ui::header_cell("Decimals"),
    ]);

    for currency in currencies {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(&currency.symbol),
            Cell::new(&currency.native_symbol),
            ui::right_cell(currency.decimal_digits),
        ]);
    }
    table.to_string()
}

/// Lists supported currencies ordered by name.
pub async fn run(service: &CurrencyService) -> Result<()> {
    let pb = ui::new_spinner("Fetching currencies...");
    let currencies = service.currencies_by_name().await;
    pb.finish_and_clear();

    if currencies.is_empty() {
        println!(
            "{}",
            ui::style_text("No currencies available.", ui::StyleType::Error)
        );
        return Ok(());
    }

    println!(
        "{}\n\n{}",
        ui::style_text("Currencies", ui::StyleType::Title),
        currencies_table(&currencies)
    );
    Ok(())
}

/// Shows the latest rate from the base currency to `code`.
pub async fn run_rate(service: &CurrencyService, code: &CurrencyCode) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rate...");
    let rate = service.latest_rate(code).await;
    pb.finish_and_clear();

    match rate {
        Some(rate) => println!(
            "{} {}  {}",
            ui::style_text(
                &format!("1 {} =", crate::core::currency::BASE_CURRENCY),
                ui::StyleType::Label
            ),
            ui::style_text(&format!("{} {}", rate.rate.normalize(), rate.code), ui::StyleType::Value),
            ui::style_text(
                &format!("as of {}", rate.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
                ui::StyleType::Subtle
            ),
        ),
        None => println!(
            "{}",
            ui::style_text(&format!("No rate available for {code}."), ui::StyleType::Error)
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::tests::currency;

    #[test]
    fn test_currencies_table_lists_each_currency() {
        let table = currencies_table(&[
            currency("CAD", "Canadian Dollar", "CA$"),
            currency("EUR", "Euro", "€"),
        ]);
        assert!(table.contains("Canadian Dollar"));
        assert!(table.contains("CA$"));
        assert!(table.contains("EUR"));
        assert!(table.contains("Decimals"));
    }
}
