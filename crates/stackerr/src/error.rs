use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::stack::StackTrace;

/// Any error this crate can hold as a cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error annotated with a call stack, a message, and/or a numeric code.
///
/// Every `Error` is one node of a chain. Wrapping never mutates a node; it
/// builds a new one around it, so chains are acyclic by construction.
///
/// Internal shapes, same external API:
///
/// - **Fundamental**: a root created by [`Error::new`] or `errorf!`.
/// - **WithStack**: call-site context only.
/// - **WithMessage**: a display message, no stack.
/// - **WithCode**: an integer code with an optional message and stack.
///
/// `Error` is a cheap handle. Clones share the node, and two handles are
/// equal only if they point at the same node.
#[derive(Clone)]
pub struct Error {
    inner: Arc<Repr>,
}

enum Repr {
    Fundamental {
        message: String,
        stack: StackTrace,
    },
    WithStack {
        cause: BoxError,
        stack: StackTrace,
    },
    WithMessage {
        cause: BoxError,
        message: String,
    },
    WithCode {
        cause: Option<BoxError>,
        code: i32,
        message: String,
        stack: Option<StackTrace>,
    },
}

// ── Constructors ──────────────────────────────────────────────────
//
// Each public constructor forwards to an `*_at` builder that takes the
// number of frames above itself to omit. Both layers stay out of line so
// the skip counts hold.

impl Error {
    fn from_repr(repr: Repr) -> Self {
        Self {
            inner: Arc::new(repr),
        }
    }

    /// Create a root error with a message and the caller's stack.
    ///
    /// ```
    /// let err = stackerr::Error::new("disk full");
    /// assert_eq!(err.to_string(), "disk full");
    /// assert!(err.stack().is_some());
    /// ```
    #[inline(never)]
    pub fn new(message: impl Into<String>) -> Self {
        Self::new_at(message.into(), 1)
    }

    /// Create a root error carrying `code`, with the caller's stack.
    #[inline(never)]
    pub fn coded(code: i32, message: impl Into<String>) -> Self {
        Self::coded_at(code, message.into(), 1)
    }

    /// Attach the caller's stack to `cause`.
    #[inline(never)]
    pub fn with_stack(cause: impl Into<BoxError>) -> Self {
        Self::with_stack_at(cause.into(), 1)
    }

    /// Attach a stack to `cause`, omitting `skip` frames above the caller.
    ///
    /// Useful inside helpers that should not appear in the trace.
    #[inline(never)]
    pub fn with_stack_skip(cause: impl Into<BoxError>, skip: usize) -> Self {
        Self::with_stack_at(cause.into(), skip + 1)
    }

    /// Attach a message to `cause`. No stack is captured.
    pub fn with_message(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::from_repr(Repr::WithMessage {
            cause: cause.into(),
            message: message.into(),
        })
    }

    /// Attach a code and message to `cause`. No stack is captured.
    pub fn with_code(cause: impl Into<BoxError>, code: i32, message: impl Into<String>) -> Self {
        Self::from_repr(Repr::WithCode {
            cause: Some(cause.into()),
            code,
            message: message.into(),
            stack: None,
        })
    }

    /// Attach the caller's stack and a message to `cause`.
    #[inline(never)]
    pub fn wrap(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::wrap_at(cause.into(), message.into(), 1)
    }

    /// Attach the caller's stack, a code and a message to `cause`.
    #[inline(never)]
    pub fn wrap_c(cause: impl Into<BoxError>, code: i32, message: impl Into<String>) -> Self {
        Self::wrap_c_at(cause.into(), code, message.into(), 1)
    }

    #[inline(never)]
    pub(crate) fn new_at(message: String, skip: usize) -> Self {
        Self::from_repr(Repr::Fundamental {
            message,
            stack: StackTrace::capture(skip + 1),
        })
    }

    #[inline(never)]
    pub(crate) fn coded_at(code: i32, message: String, skip: usize) -> Self {
        Self::from_repr(Repr::WithCode {
            cause: None,
            code,
            message,
            stack: Some(StackTrace::capture(skip + 1)),
        })
    }

    #[inline(never)]
    pub(crate) fn with_stack_at(cause: BoxError, skip: usize) -> Self {
        Self::from_repr(Repr::WithStack {
            cause,
            stack: StackTrace::capture(skip + 1),
        })
    }

    #[inline(never)]
    pub(crate) fn wrap_at(cause: BoxError, message: String, skip: usize) -> Self {
        let stack = StackTrace::capture(skip + 1);
        Self::from_repr(Repr::WithStack {
            cause: Box::new(Self::from_repr(Repr::WithMessage { cause, message })),
            stack,
        })
    }

    #[inline(never)]
    pub(crate) fn wrap_c_at(cause: BoxError, code: i32, message: String, skip: usize) -> Self {
        Self::from_repr(Repr::WithCode {
            cause: Some(cause),
            code,
            message,
            stack: Some(StackTrace::capture(skip + 1)),
        })
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl Error {
    /// This node's own message. Empty for stack-only wraps.
    pub fn message(&self) -> &str {
        match &*self.inner {
            Repr::Fundamental { message, .. }
            | Repr::WithMessage { message, .. }
            | Repr::WithCode { message, .. } => message,
            Repr::WithStack { .. } => "",
        }
    }

    /// The code carried by this node, if any. Does not look at causes.
    pub fn code(&self) -> Option<i32> {
        match &*self.inner {
            Repr::WithCode { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The stack captured when this node was built, if any.
    pub fn stack(&self) -> Option<&StackTrace> {
        match &*self.inner {
            Repr::Fundamental { stack, .. } | Repr::WithStack { stack, .. } => Some(stack),
            Repr::WithCode { stack, .. } => stack.as_ref(),
            Repr::WithMessage { .. } => None,
        }
    }

    /// The direct cause of this node.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match &*self.inner {
            Repr::Fundamental { .. } => None,
            Repr::WithStack { cause, .. } | Repr::WithMessage { cause, .. } => Some(&**cause),
            Repr::WithCode { cause, .. } => cause.as_deref(),
        }
    }

    /// The innermost error of the chain, following `source()` through
    /// foreign errors too. Returns `self` for a root.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|e| e as &(dyn StdError + 'static))
    }
}

// ── Display ───────────────────────────────────────────────────────

impl fmt::Display for Error {
    /// The node's own message, or its cause's display when it has none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message();
        match self.cause() {
            Some(cause) if message.is_empty() => fmt::Display::fmt(cause, f),
            _ => f.write_str(message),
        }
    }
}

// ── Debug ─────────────────────────────────────────────────────────

impl fmt::Debug for Error {
    /// The whole chain, one node per block, with detailed stacks.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)?;
        if let Some(code) = self.code() {
            write!(f, " [code {}]", code)?;
        }
        if let Some(stack) = self.stack() {
            for frame in stack {
                write!(f, "\n    at {:#}", frame)?;
            }
        }
        if let Some(cause) = self.cause() {
            match cause.downcast_ref::<Error>() {
                Some(inner) => write!(f, "\ncaused by: {:?}", inner)?,
                None => write!(f, "\ncaused by: {}", cause)?,
            }
        }
        Ok(())
    }
}

// ── Identity ──────────────────────────────────────────────────────

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Error {}
