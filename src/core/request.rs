//! One calculation request: raw input in, result view out.

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use super::calculator::{CalcError, Evaluator, Operator};
use super::currency::{Conversion, CurrencyCode, CurrencyInfo, CurrencyService};

/// User input exactly as entered.
#[derive(Debug, Clone, Default)]
pub struct CalculationForm {
    pub first: String,
    pub operator: String,
    pub second: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionStatus {
    NotRequested,
    Converted {
        conversion: Conversion,
        currency: Option<CurrencyInfo>,
    },
    Unavailable(CurrencyCode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationView {
    pub first: Option<Decimal>,
    pub operator: Option<Operator>,
    pub second: Option<Decimal>,
    pub result: Option<Decimal>,
    pub conversion: ConversionStatus,
    pub error_message: Option<String>,
}

impl CalculationView {
    fn empty() -> Self {
        CalculationView {
            first: None,
            operator: None,
            second: None,
            result: None,
            conversion: ConversionStatus::NotRequested,
            error_message: None,
        }
    }

    fn failed(mut self, message: String) -> Self {
        debug!(%message, "Calculation failed");
        self.result = None;
        self.error_message = Some(message);
        self
    }
}

/// Parses without rounding: input that `Decimal` cannot hold exactly is
/// rejected, so a tiny nonzero value never turns into zero.
fn parse_operand(raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    let value = Decimal::from_str_exact(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| format!("'{raw}' is not a valid number."))?;

    let mantissa = raw.split(['e', 'E']).next().unwrap_or(raw);
    if value.is_zero() && mantissa.chars().any(|c| matches!(c, '1'..='9')) {
        return Err(format!(
            "'{raw}' is not a valid number: too many decimal places."
        ));
    }
    Ok(value)
}

fn describe(err: &CalcError) -> String {
    match err {
        CalcError::DivisionByZero => err.to_string(),
        other => format!("An unexpected error occurred: {other}"),
    }
}

/// Evaluates a form and, when asked, converts the result.
#[derive(Clone)]
pub struct CalculatorHandler {
    evaluator: Arc<dyn Evaluator>,
    currencies: CurrencyService,
}

impl CalculatorHandler {
    pub fn new(evaluator: Arc<dyn Evaluator>, currencies: CurrencyService) -> Self {
        Self {
            evaluator,
            currencies,
        }
    }

    pub fn currencies(&self) -> &CurrencyService {
        &self.currencies
    }

    pub async fn handle(&self, form: &CalculationForm) -> CalculationView {
        let mut view = CalculationView::empty();

        let target = match form.currency.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<CurrencyCode>() {
                Ok(code) => Some(code),
                Err(e) => return view.failed(e),
            },
        };

        if form.first.trim().is_empty() || form.second.trim().is_empty() {
            return view.failed("Both numbers are required.".to_string());
        }
        let (first, second) = match (parse_operand(&form.first), parse_operand(&form.second)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => return view.failed(e),
        };
        view.first = Some(first);
        view.second = Some(second);

        let operator = match form.operator.parse::<Operator>() {
            Ok(op) => op,
            Err(e) => return view.failed(describe(&e)),
        };
        view.operator = Some(operator);

        let result = match self.evaluator.evaluate(first, second, operator) {
            Ok(result) => result,
            Err(e) => return view.failed(describe(&e)),
        };
        info!(%first, %operator, %second, %result, "Evaluated");
        view.result = Some(result);

        if let Some(code) = target {
            let (currencies, conversion) = futures::join!(
                self.currencies.list_currencies(),
                self.currencies.convert(result, &code)
            );
            view.conversion = match conversion {
                Some(conversion) => ConversionStatus::Converted {
                    currency: currencies.into_iter().find(|c| c.code == code.as_str()),
                    conversion,
                },
                None => ConversionStatus::Unavailable(code),
            };
        }

        view
    }
}
