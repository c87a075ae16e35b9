// Domain value objects
pub mod identifiers;
pub mod risk_level;
pub mod verdict;

pub use identifiers::*;
pub use risk_level::*;
pub use verdict::*;
