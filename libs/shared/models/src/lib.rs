pub mod error;
pub mod location;
pub mod specialty;

pub use location::{Coordinates, GroundingSource};
pub use specialty::Specialty;
