//! # stackerr — stack-capturing errors with registered codes
//!
//! Wraps any error with a captured call stack, a message, and/or an
//! application-defined numeric code, without hiding the original error from
//! `source()`-based inspection.
//!
//! ## Design
//!
//! - **Wrapping**: [`Error`] is one node of a cause chain. Each node carries
//!   a stack, a message, a code, or a combination, plus exactly one cause.
//! - **Inspection**: [`is`], [`find_as`], [`unwrap`] and [`chain`] walk
//!   `std::error::Error::source`, so errors from other crates can sit
//!   anywhere in the chain.
//! - **Classification**: codes map to [`Coder`]s in a process-wide
//!   [`Registry`]. [`parse_coder`] resolves the nearest code in a chain and
//!   falls back to the unknown coder (code `0`, HTTP 500).
//!
//! ## Quick Start
//!
//! ```rust
//! use stackerr::{is_code, parse_coder, register, Coder, DefaultCoder, ResultExt};
//!
//! const ERR_EOF: i32 = 100_001;
//! const ERR_CONFIG: i32 = 100_002;
//!
//! register(DefaultCoder::new_static(ERR_EOF, 500, "End of input", ""));
//! register(DefaultCoder::new_static(ERR_CONFIG, 400, "Configuration is not valid", ""));
//!
//! fn read_config() -> stackerr::Result<String> {
//!     Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"))
//!         .wrap_c(ERR_EOF, "could not read configuration file")
//! }
//!
//! fn load_config() -> stackerr::Result<String> {
//!     read_config().wrap_c(ERR_CONFIG, "service configuration could not be loaded")
//! }
//!
//! let err = load_config().unwrap_err();
//! assert_eq!(parse_coder(&err).http_status(), 400);
//! assert!(is_code(&err, ERR_EOF));
//! ```
//!
//! ## Configuration
//!
//! Stack depth and capture are controlled by [`StackConfig`], read from
//! `STACKERR_STACK_DEPTH` and `STACKERR_CAPTURE` on first use.

mod env;
mod error;
#[macro_use]
mod macros;
mod wrap;

pub mod chain;
pub mod coder;
pub mod config;
pub mod registry;
pub mod stack;

// ── Public API ────────────────────────────────────────────────────

pub use chain::{cause, chain, find_as, is, unwrap, Chain};
pub use coder::{Coder, DefaultCoder, UNKNOWN, UNKNOWN_CODE};
pub use config::StackConfig;
pub use error::{BoxError, Error};
pub use registry::{
    is_code, lookup, must_register, parse_coder, parse_coder_opt, register, registered_codes,
    try_register, RegisterError, Registry,
};
pub use stack::{Frame, Location, RenderStyle, StackTrace};
pub use wrap::{with_code, with_message, with_stack, wrap, wrap_c, ResultExt};

/// Convenience Result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
