//! Configuration module for the cost map pipeline.

// Can all be private now because we have a public re-export.
mod analysis;
mod debug;
mod types;

// Public
pub mod constants;

// Re-export commonly used items
pub use analysis::{
    ANALYSIS,
    AnalysisConfig,
    ConfigError,
    DetectionSettings,
    MarkerSettings,
    SanitizerSettings,
};
pub use debug::DF;
pub use types::{Degrees, Miles, Mph, MphPerSec, Seconds, TurnRepresentative};
