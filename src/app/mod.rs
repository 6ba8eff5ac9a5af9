// SolarMaint - app/mod.rs
//
// Application layer: input loading and report state.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod ingest;
pub mod state;
