//! Terminal shell for the meter.

mod app;
mod screens;

pub use app::run;
