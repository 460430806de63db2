//! OneLifeTime Shared Library
//!
//! The pure calculation core used by the backend and the WASM module:
//! life-expectancy adjustment, death-instant projection, countdown state,
//! the immutable life-expectancy table, and display formatting.

pub mod countdown;
pub mod diagnostics;
pub mod display;
pub mod errors;
pub mod lifestyle;
pub mod projection;
pub mod table;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use countdown::{CountdownPhase, CountdownState, CounterId, CounterSeed, CounterUpdate};
pub use diagnostics::Diagnostic;
pub use display::{format_count, format_instant, DigitGrouping};
pub use errors::*;
pub use lifestyle::{adjust, EffectiveLifeExpectancy, GymTenure, LifestyleFactors, SmokeTenure};
pub use projection::{project, BirthInstant, Projection};
pub use table::{
    BiologicalSex, CountryLifeExpectancy, LifeExpectancyTable, LifeExpectancyYears, RankOrder,
    TableSource,
};
