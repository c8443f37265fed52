pub mod currencies;
pub mod eval;
pub mod setup;
pub mod ui;
