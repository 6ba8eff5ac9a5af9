// SolarMaint - ui/mod.rs
//
// Presentation layer: plain-text rendering of the report.
// Dependencies: app, core.

pub mod report;
pub mod table;
