//! Centralized logging configuration for the renderer.
//!
//! Rendering code logs through a single category/level gate so that the hot
//! path pays nothing when logging is off: messages are closures, only
//! evaluated after the level check passes.
//!
//! - **LogConfig**: thread-safe global configuration using atomic operations
//! - **LogLevel**: hierarchical levels (Off < Error < Warn < Info < Debug < Trace)
//! - **LogCategory**: renderer components (Session, Pipeline, Raster, ...)
//! - **log()**: the single logging entry point
//!
//! # Usage
//!
//! ```rust
//! use sr_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Pipeline, LogLevel::Debug, || {
//!     format!("culled triangle with area {}", 0.0)
//! });
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse a log level from a string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

/// Log category for the renderer's components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Session lifecycle (init, frame begin/end, state changes)
    Session,
    /// Triangle pipeline (vertex shading, culling, dispatch)
    Pipeline,
    /// Block rasterizer
    Raster,
    /// Texture sampling and construction
    Texture,
    /// Worker pool activity
    Threading,
    /// Frontend/demo code
    Frontend,
}

const NUM_CATEGORIES: usize = 6;

impl LogCategory {
    fn index(self) -> usize {
        match self {
            LogCategory::Session => 0,
            LogCategory::Pipeline => 1,
            LogCategory::Raster => 2,
            LogCategory::Texture => 3,
            LogCategory::Threading => 4,
            LogCategory::Frontend => 5,
        }
    }
}

/// Global logging configuration
///
/// A category with a specific level set uses that level; a category left at
/// `Off` falls back to the global level. Everything is atomics, so levels
/// can be flipped at runtime from any thread.
pub struct LogConfig {
    global_level: AtomicU8,
    category_levels: [AtomicU8; NUM_CATEGORIES],
}

impl LogConfig {
    fn new() -> Self {
        const OFF: AtomicU8 = AtomicU8::new(LogLevel::Off as u8);
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            category_levels: [OFF; NUM_CATEGORIES],
        }
    }

    /// Get the global singleton instance
    pub fn global() -> &'static Self {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    /// Set the global log level (applies to categories without an override)
    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    /// Set the log level for one category
    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.category_levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.category_levels[category.index()].load(Ordering::Relaxed))
    }

    /// Check whether a message at `level` should be logged for `category`
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        let category_level = self.get_level(category);
        if category_level != LogLevel::Off {
            level <= category_level
        } else {
            level <= self.get_global_level()
        }
    }

    /// Reset all levels to Off
    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for slot in &self.category_levels {
            slot.store(LogLevel::Off as u8, Ordering::Relaxed);
        }
    }
}

/// Log a message with the specified category and level.
///
/// The message is lazily evaluated via a closure: when the category/level
/// gate is closed the closure is never called, so formatting cost is only
/// paid for messages that are actually emitted.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if config.should_log(category, level) {
        eprintln!("[{:?}/{:?}] {}", category, level, message_fn());
    }
}
