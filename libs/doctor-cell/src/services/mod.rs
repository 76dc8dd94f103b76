pub mod directory;
pub mod filter;
pub mod map;

pub use directory::DoctorDirectory;
pub use filter::DoctorFilter;
pub use map::{MapBounds, MapMarker, MapPlace, MapView, MarkerSelectionHandler, MarkerTarget};
