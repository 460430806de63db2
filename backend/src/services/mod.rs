//! Business logic services
//!
//! Services hold the logic between the HTTP handlers and the shared core:
//! loading the life-expectancy table and running calculations.

pub mod calculator;
pub mod table;

pub use calculator::{CalculationSettings, CalculatorService};
pub use table::{LoadedTable, TableDiagnostic, TableService};
