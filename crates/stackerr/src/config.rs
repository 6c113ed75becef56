//! Stack capture configuration.
//!
//! Library defaults with runtime environment overrides. The process-wide
//! configuration is read once, the first time a stack is captured.
//!
//! # Environment Variables
//!
//! | Variable               | Default | Effect                              |
//! |------------------------|---------|-------------------------------------|
//! | `STACKERR_STACK_DEPTH` | `32`    | Maximum frames kept per capture     |
//! | `STACKERR_CAPTURE`     | `1`     | `0`/`off` disables stack capture    |
//!
//! ```rust
//! use stackerr::StackConfig;
//!
//! let config = StackConfig::from_env().max_stack_depth(8);
//! assert_eq!(config.max_stack_depth, 8);
//! ```

use once_cell::sync::Lazy;

use crate::env::{env_get, env_get_bool};

/// Library defaults.
pub mod defaults {
    /// Frames kept per captured stack.
    pub const MAX_STACK_DEPTH: usize = 32;
    /// Stack capture is on unless disabled.
    pub const CAPTURE: bool = true;
}

/// Stack capture configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    /// Maximum number of frames kept per captured stack
    pub max_stack_depth: usize,
    /// Whether wrap operations capture a stack at all
    pub capture: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl StackConfig {
    /// Create config from library defaults with environment overrides.
    pub fn from_env() -> Self {
        Self {
            max_stack_depth: env_get("STACKERR_STACK_DEPTH", defaults::MAX_STACK_DEPTH),
            capture: env_get_bool("STACKERR_CAPTURE", defaults::CAPTURE),
        }
    }

    /// Library defaults, ignoring the environment.
    pub fn defaults() -> Self {
        Self {
            max_stack_depth: defaults::MAX_STACK_DEPTH,
            capture: defaults::CAPTURE,
        }
    }

    pub fn max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    pub fn capture(mut self, enabled: bool) -> Self {
        self.capture = enabled;
        self
    }
}

static CONFIG: Lazy<StackConfig> = Lazy::new(|| {
    let config = StackConfig::from_env();
    tracing::debug!(
        max_stack_depth = config.max_stack_depth,
        capture = config.capture,
        "stack capture configured"
    );
    config
});

/// The process-wide configuration.
pub fn current() -> &'static StackConfig {
    &CONFIG
}
