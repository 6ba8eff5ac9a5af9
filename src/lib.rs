// SolarMaint - lib.rs
//
// Library entry point, exposing all modules for integration testing
// and programmatic use. The CLI driver lives in `main.rs`.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
