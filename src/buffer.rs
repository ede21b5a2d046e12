use std::fmt::{self, Write};

use log::warn;

use crate::debug::LOG_TARGET;

/// Capacity used for formatted messages, terminator included.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatPolicy {
    /// Keep at most `capacity - 1` bytes of formatted text.
    Bounded(usize),
    Unbounded,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        FormatPolicy::Bounded(DEFAULT_CAPACITY)
    }
}

/// Text sink that stops storing once full.
///
/// One unit of the capacity is reserved for the terminator, so a buffer of
/// capacity `n` keeps `n - 1` bytes. Characters are never split: a
/// multi-byte character that does not fit is dropped whole.
#[derive(Debug)]
pub struct BoundedBuffer {
    text: String,
    limit: usize,
    truncated: bool,
}

impl BoundedBuffer {
    pub fn new(capacity: usize) -> BoundedBuffer {
        let limit = capacity.saturating_sub(1);
        BoundedBuffer {
            text: String::with_capacity(limit),
            limit,
            truncated: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_rendered(self) -> Rendered {
        Rendered {
            text: self.text,
            truncated: self.truncated,
        }
    }
}

impl fmt::Write for BoundedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let room = self.limit - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }

        let mut end = room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(&s[..end]);
        self.truncated = true;
        // Returning Ok keeps format_args from reporting a formatting error.
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub truncated: bool,
}

/// Renders `args` under `policy`.
///
/// A `Display` impl inside `args` that fails stops the rendering; the text
/// written up to that point is kept and a warning is logged.
pub fn render(args: fmt::Arguments, policy: FormatPolicy) -> Rendered {
    let (rendered, result) = match policy {
        FormatPolicy::Unbounded => {
            let mut text = String::new();
            let result = text.write_fmt(args);
            (
                Rendered {
                    text,
                    truncated: false,
                },
                result,
            )
        }
        FormatPolicy::Bounded(capacity) => {
            let mut buffer = BoundedBuffer::new(capacity);
            let result = buffer.write_fmt(args);
            (buffer.into_rendered(), result)
        }
    };
    if result.is_err() {
        warn!(
            target: LOG_TARGET,
            "formatting failed after {} bytes",
            rendered.text.len()
        );
    }
    rendered
}

#[test]
fn test_render_fits() {
    let r = render(format_args!("bad value: {}", 42), FormatPolicy::default());
    assert_eq!(r.text, "bad value: 42");
    assert!(!r.truncated);
}

#[test]
fn test_render_exact_limit() {
    let s = "a".repeat(255);
    let r = render(format_args!("{}", s), FormatPolicy::default());
    assert_eq!(r.text.len(), 255);
    assert!(!r.truncated);
}

#[test]
fn test_render_truncates_at_255() {
    let s = "b".repeat(256);
    let r = render(format_args!("{}", s), FormatPolicy::default());
    assert_eq!(r.text, "b".repeat(255));
    assert!(r.truncated);

    // same input, same output
    let again = render(format_args!("{}", s), FormatPolicy::default());
    assert_eq!(r, again);
}

#[test]
fn test_render_across_pieces() {
    let r = render(
        format_args!("{}-{}-{}", "x".repeat(3), "y".repeat(3), "z".repeat(3)),
        FormatPolicy::Bounded(6),
    );
    assert_eq!(r.text, "xxx-y");
    assert!(r.truncated);
}

#[test]
fn test_render_keeps_char_boundary() {
    // "é" is two bytes; only one byte of room is left after "abcd".
    let r = render(format_args!("abcdé"), FormatPolicy::Bounded(6));
    assert_eq!(r.text, "abcd");
    assert!(r.truncated);
}

#[test]
fn test_render_degenerate_capacity() {
    for capacity in [0, 1] {
        let r = render(format_args!("x"), FormatPolicy::Bounded(capacity));
        assert_eq!(r.text, "");
        assert!(r.truncated);
    }
    let r = render(format_args!(""), FormatPolicy::Bounded(0));
    assert!(!r.truncated);
}

#[test]
fn test_render_unbounded() {
    let s = "c".repeat(1000);
    let r = render(format_args!("{}", s), FormatPolicy::Unbounded);
    assert_eq!(r.text.len(), 1000);
    assert!(!r.truncated);
}

#[cfg(test)]
struct FailingDisplay;

#[cfg(test)]
impl fmt::Display for FailingDisplay {
    fn fmt(&self, _f: &mut fmt::Formatter) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn test_render_failing_display_keeps_prefix() {
    crate::debug::capture::start();
    for policy in [FormatPolicy::default(), FormatPolicy::Unbounded] {
        let r = render(format_args!("joint {}: {} tail", 3, FailingDisplay), policy);
        assert_eq!(r.text, "joint 3: ");
        assert!(!r.truncated);
    }

    let entries = crate::debug::capture::take();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.level == log::Level::Warn));
    assert_eq!(entries[0].text, "formatting failed after 9 bytes");
}
