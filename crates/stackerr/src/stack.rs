//! Call stack capture.
//!
//! A [`Frame`] is a raw program counter. Resolution to function, file and
//! line happens lazily, only when a frame is rendered or inspected, so the
//! cost paid at wrap time is the unwind walk alone.
//!
//! ```text
//! caller ── Error::wrap ── StackTrace::capture(skip) ── backtrace::trace
//!   ▲                                                        │
//!   └──── frames[0] ◄── skip ◄── marker (capture itself) ◄───┘
//! ```

use std::ffi::c_void;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::config::{self, StackConfig};

/// Upper bound on raw frames walked before trimming to the configured depth.
const MAX_WALK: usize = 256;

/// Source location a [`Frame`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Location {
    /// The last path component of `file`.
    pub fn file_name(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

/// One captured call-stack entry.
///
/// `Frame(0)`, or any frame whose symbols cannot be resolved, renders as
/// `"unknown"`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Frame(pub usize);

impl Frame {
    /// Frame with no program counter.
    pub const UNKNOWN: Frame = Frame(0);

    #[inline]
    pub const fn pc(&self) -> usize {
        self.0
    }

    /// Resolve the function, file and line for this frame.
    pub fn location(&self) -> Option<Location> {
        if self.0 == 0 {
            return None;
        }

        // Captured pcs are return addresses; step back into the call.
        let addr = (self.0 - 1) as *mut c_void;
        let mut location = None;
        backtrace::resolve(addr, |symbol| {
            if location.is_some() {
                return;
            }
            let (Some(name), Some(file), Some(line)) =
                (symbol.name(), symbol.filename(), symbol.lineno())
            else {
                return;
            };
            location = Some(Location {
                function: format!("{:#}", name),
                file: file.display().to_string(),
                line,
            });
        });
        location
    }

    /// `"<function> <file>:<line>"`, or `"unknown"`.
    pub fn to_text(&self) -> String {
        format!("{:#}", self)
    }
}

impl fmt::Display for Frame {
    /// `{}` renders `file:line`, `{:#}` renders `function path/to/file:line`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            None => f.write_str("unknown"),
            Some(loc) if f.alternate() => {
                write!(f, "{} {}:{}", loc.function, loc.file, loc.line)
            }
            Some(loc) => write!(f, "{}:{}", loc.file_name(), loc.line),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#x})", self.0)
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

/// How [`StackTrace::render`] lays out each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// `file:line`
    #[default]
    Default,
    /// `function path/to/file:line`
    Detailed,
}

/// Frames captured at one call site, innermost call first.
#[derive(Clone, PartialEq, Eq)]
pub struct StackTrace {
    frames: Arc<[Frame]>,
}

impl StackTrace {
    /// A trace with no frames.
    pub fn empty() -> Self {
        Self {
            frames: Arc::from(Vec::new()),
        }
    }

    /// Build a trace from raw frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames: Arc::from(frames),
        }
    }

    /// Capture the active stack using the process-wide configuration.
    ///
    /// The first frame is the caller of `capture`; `skip` omits that many
    /// further frames.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        Self::walk(config::current(), skip, Self::capture as *const () as usize)
    }

    /// Capture the active stack with an explicit configuration.
    #[inline(never)]
    pub fn capture_with(config: &StackConfig, skip: usize) -> Self {
        Self::walk(config, skip, Self::capture_with as *const () as usize)
    }

    fn walk(config: &StackConfig, skip: usize, marker: usize) -> Self {
        if !config.capture || config.max_stack_depth == 0 {
            return Self::empty();
        }

        let mut raw = Vec::with_capacity(config.max_stack_depth + skip + 8);
        let mut start = None;
        backtrace::trace(|frame| {
            raw.push(Frame(frame.ip() as usize));
            if start.is_none() && frame.symbol_address() as usize == marker {
                start = Some(raw.len());
            }
            raw.len() < MAX_WALK
        });

        // Without a marker hit (no symbol addresses on this platform) keep
        // everything rather than guess.
        let frames: Vec<Frame> = raw
            .into_iter()
            .skip(start.unwrap_or(0) + skip)
            .take(config.max_stack_depth)
            .collect();

        Self::from_frames(frames)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One line per frame in the requested style.
    pub fn render(&self, style: RenderStyle) -> String {
        let lines: Vec<String> = self
            .frames
            .iter()
            .map(|frame| match style {
                RenderStyle::Default => format!("{}", frame),
                RenderStyle::Detailed => format!("{:#}", frame),
            })
            .collect();
        lines.join("\n")
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if f.alternate() {
            RenderStyle::Detailed
        } else {
            RenderStyle::Default
        };
        f.write_str(&self.render(style))
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.frames.iter()).finish()
    }
}

impl Serialize for StackTrace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.frames.iter())
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
