//! Planner trace output on stderr, gated by `PlannerConfig::verbosity`.
//!
//! Each pipeline stage reports at a fixed level:
//!
//! | Level | Stage output |
//! |---|---|
//! | 1 CHANGES | criticality counts, per-depth deadlines, every resource binding |
//! | 2 CHECKS | feasible-resource counts, depth headers, overruns, unassigned tasks |
//! | 3 DEBUG | per-task ES/EF/LS/LF, sorted candidate lists, cursor position |
//!
//! Level 0 prints nothing. Fatal input errors are returned as `PlanError`,
//! never logged.

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Whether a message at `level` is printed under `verbosity`.
#[inline]
pub fn enabled(verbosity: u8, level: u8) -> bool {
    level != VERBOSITY_SILENT && verbosity >= level
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:expr, $verbosity:expr, $($arg:tt)*) => {
        if $crate::logging::enabled($verbosity, $level) {
            eprintln!($($arg)*);
        }
    };
}

/// Planning decisions: bindings, deadlines, stage summaries.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHANGES, $verbosity, $($arg)*)
    };
}

/// Soft failures and per-depth progress.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHECKS, $verbosity, $($arg)*)
    };
}

/// Pass values and candidate orderings.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_DEBUG, $verbosity, $($arg)*)
    };
}
