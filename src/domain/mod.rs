// Domain types and value objects
mod marker;
mod position;

// Re-export commonly used types to the world
pub use marker::{EventCandidate, MarkerSet, MarkerType};
pub use position::{Located, Position, Trajectory};
