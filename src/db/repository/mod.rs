//! Repository layer: entity-scoped dashboard operations.

mod analysis;
mod appointment;
mod patient;
mod records;

pub use analysis::*;
pub use appointment::*;
pub use patient::*;
pub use records::*;
