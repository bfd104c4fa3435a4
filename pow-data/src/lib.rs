//! Forecast reconciliation for resort forecasts.
//!
//! Turns per-model hourly and daily series into one forecast per elevation
//! band: merge across models, re-derive snow and rain from temperature and
//! freezing level, resum days, and optionally blend in a secondary source.

pub mod alerts;
pub mod blend;
pub mod merge;
pub mod recalc;
pub mod slr;
pub mod stats;
