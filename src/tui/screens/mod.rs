//! Screen rendering and input handling.

mod history;
mod meter;

pub use history::HistoryScreen;
pub use meter::MeterScreen;
