// Trajectory analysis: cleaning, event detection and marker reconciliation
pub mod agglomeration;
pub mod event_detector;
pub mod reconciler;
pub mod sanitizer;

pub use agglomeration::agglomerate;
pub use event_detector::{classify_turn, detect_stops, detect_turns, medoid, temporal_midpoint};
pub use reconciler::{condense_stops, reconcile};
pub use sanitizer::{SanitizeStats, sanitize, sanitize_with_stats};
