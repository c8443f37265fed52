use super::ui;
use crate::core::{CalculationForm, CalculationView, CalculatorHandler, ConversionStatus};
use anyhow::Result;

impl CalculationView {
    pub fn display(&self) -> String {
        if let Some(message) = &self.error_message {
            return format!(
                "{} {}",
                ui::style_text("Error:", ui::StyleType::Label),
                ui::style_text(message, ui::StyleType::Error)
            );
        }

        let mut output = String::new();
        if let (Some(first), Some(op), Some(second), Some(result)) =
            (self.first, self.operator, self.second, self.result)
        {
            output.push_str(&format!(
                "{} {op} {} = {}",
                ui::style_text(&first.normalize().to_string(), ui::StyleType::Subtle),
                ui::style_text(&second.normalize().to_string(), ui::StyleType::Subtle),
                ui::style_text(&ui::format_amount(result), ui::StyleType::Value),
            ));
        }

        match &self.conversion {
            ConversionStatus::NotRequested => {}
            ConversionStatus::Converted {
                conversion,
                currency,
            } => {
                let converted = ui::format_amount(conversion.amount);
                let amount = match currency {
                    Some(info) => format!("{}{converted} ({})", info.symbol, info.name),
                    None => format!("{converted} {}", conversion.code),
                };
                output.push_str(&format!(
                    "\n{} {}  {}",
                    ui::style_text(&format!("In {}:", conversion.code), ui::StyleType::Label),
                    ui::style_text(&amount, ui::StyleType::Value),
                    ui::style_text(
                        &format!("@ {}", conversion.rate.normalize()),
                        ui::StyleType::Subtle
                    ),
                ));
            }
            ConversionStatus::Unavailable(code) => {
                output.push_str(&format!(
                    "\n{}",
                    ui::style_text(
                        &format!("Conversion to {code} is unavailable right now."),
                        ui::StyleType::Error
                    )
                ));
            }
        }

        output
    }
}

pub async fn run(handler: &CalculatorHandler, form: &CalculationForm) -> Result<()> {
    let wants_conversion = form
        .currency
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());

    let view = if wants_conversion {
        let pb = ui::new_spinner("Fetching exchange rate...");
        let view = handler.handle(form).await;
        pb.finish_and_clear();
        view
    } else {
        handler.handle(form).await
    };

    println!("{}", view.display());
    Ok(())
}
