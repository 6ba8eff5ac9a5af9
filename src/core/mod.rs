// SolarMaint - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: ui, platform, app, or read files directly.

pub mod dataset;
pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
pub mod summary;
