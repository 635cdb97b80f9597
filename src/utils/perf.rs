/// Times `$block` and logs a warning when it runs longer than `$limit_ms` milliseconds.
/// Compiled to the bare block unless `DF.log_performance` is set.
#[macro_export]
macro_rules! trace_time {
    ($stage:expr, $limit_ms:expr, $block:block) => {{
        if $crate::config::DF.log_performance {
            let started = std::time::Instant::now();
            let value = $block;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            if elapsed_ms > $limit_ms as f64 {
                let build = if cfg!(debug_assertions) { "debug" } else { "release" };
                log::warn!(
                    "slow stage '{}' ({} build): {:.3}ms, limit {}ms",
                    $stage,
                    build,
                    elapsed_ms,
                    $limit_ms
                );
            }
            value
        } else {
            $block
        }
    }};
}
