//! # Debugging and Logging Utilities
//!
//! Conditional logging and performance measurement for the compiler pipeline,
//! gated by environment variables rather than a logging framework, so a
//! library consumer embedding `tombc` never needs to initialize one.

use std::time::Instant;

/// Debugging is enabled if `TOMBC_DEBUG` is set, or under `debug_assertions`
/// (default for `cargo build`).
pub fn is_debug_enabled() -> bool {
    std::env::var("TOMBC_DEBUG").is_ok() || cfg!(debug_assertions)
}

/// Performance tracking is enabled if `TOMBC_VERBOSE` is set.
pub fn is_perf_enabled() -> bool {
    std::env::var("TOMBC_VERBOSE").is_ok()
}

// --- Conditional, phase-tagged logging functions ( phases) ---

pub fn log_lex(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 LEX: {}", msg);
    }
}

pub fn log_parse(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 PARSE: {}", msg);
    }
}

pub fn log_resolve(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 RESOLVE: {}", msg);
    }
}

pub fn log_typecheck(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 TYPECHECK: {}", msg);
    }
}

pub fn log_codegen(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 CODEGEN: {}", msg);
    }
}

pub fn log_assemble(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 ASSEMBLE: {}", msg);
    }
}

pub fn log_compiler(msg: &str) {
    if is_debug_enabled() {
        println!("🔍 COMPILER: {}", msg);
    }
}

// --- Performance Tracking Structure ---

/// Usage: `let timer = PerfTimer::new("parse"); ... timer.finish();`
pub struct PerfTimer {
    start: Instant,
    label: String,
}

impl PerfTimer {
    pub fn new(label: &str) -> Self {
        Self {
            start: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Stops the timer and prints the elapsed duration if `TOMBC_VERBOSE` is set.
    pub fn finish(self) {
        if is_perf_enabled() {
            let duration = self.start.elapsed();
            println!("⏱️  {}: {:?}", self.label, duration);
        }
    }
}
