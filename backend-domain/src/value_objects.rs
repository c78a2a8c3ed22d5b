// Domain value objects
pub mod coordinate;
pub mod identifiers;
pub mod verdict;
pub mod violation_type;

pub use coordinate::*;
pub use identifiers::*;
pub use verdict::*;
pub use violation_type::*;
