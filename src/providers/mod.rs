pub mod freecurrencyapi;

pub use freecurrencyapi::FreeCurrencyApiGateway;
