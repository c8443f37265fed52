//! Core business logic abstractions

pub mod calculator;
pub mod config;
pub mod currency;
pub mod log;
pub mod request;

// Re-export main types for cleaner imports
pub use calculator::{CalcError, Evaluator, Operator, StandardCalculator};
pub use currency::{
    Conversion, ConversionRate, CurrencyCode, CurrencyGateway, CurrencyInfo, CurrencyService,
    GatewayError,
};
pub use request::{CalculationForm, CalculationView, CalculatorHandler, ConversionStatus};
