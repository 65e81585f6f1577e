pub mod analysis;
pub mod appointment;
pub mod enums;
pub mod patient;
pub mod records;

pub use analysis::*;
pub use appointment::*;
pub use enums::*;
pub use patient::*;
pub use records::*;
