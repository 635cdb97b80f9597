//! Debugging feature flags.

pub struct LogFlags {
    /// Before/after counts and drop reasons from the sanitizer.
    pub log_sanitizer: bool,

    /// Every turn segment considered, with its bearings and verdict.
    pub log_turn_segments: bool,

    /// Stop clusters kept or discarded during condensation.
    pub log_stop_condensation: bool,

    /// Pairwise decisions made by the reconciler.
    pub log_reconciler: bool,

    /// Time pipeline stages with `trace_time!`.
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_sanitizer: true,
    log_turn_segments: false,
    log_stop_condensation: false,
    log_reconciler: false,
    log_performance: false,
};
