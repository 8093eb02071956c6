//! Pause marker parsing.
//!
//! Input text may carry inline pause directives in two interchangeable forms,
//! matched case-insensitively:
//!
//! - Bracketed: `[1s]`, `[0.5s]`, `[2.25s]`
//! - Underscore: `PAUSE_1`, `PAUSE_0.5`
//!
//! [`parse`] splits the text on these markers into an ordered list of
//! [`Segment`]s that drives audio assembly.
//!
//! # Example
//!
//! ```rust
//! use kokoro_gateway::core::markers::{Segment, parse};
//!
//! let segments = parse("Hello [1s] world");
//! assert_eq!(
//!     segments,
//!     vec![
//!         Segment::speech("Hello"),
//!         Segment::pause(1.0),
//!         Segment::speech("world"),
//!     ]
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Longest pause a single marker can request, in seconds.
pub const MAX_PAUSE_SECONDS: f64 = 10.0;

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII digits only: `f64::from_str` rejects other decimal scripts.
    Regex::new(r"(?i)\[([0-9]+(?:\.[0-9]+)?)s\]|PAUSE_([0-9]+(?:\.[0-9]+)?)")
        .expect("pause marker pattern is valid")
});

/// A unit of parsed input: spoken text or a silence duration.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text to synthesize.
    Speech { text: String },
    /// Silence, in `(0, MAX_PAUSE_SECONDS]` seconds.
    Pause { duration_seconds: f64 },
}

impl Segment {
    pub fn speech(text: impl Into<String>) -> Self {
        Segment::Speech { text: text.into() }
    }

    pub fn pause(duration_seconds: f64) -> Self {
        Segment::Pause { duration_seconds }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, Segment::Pause { .. })
    }
}

/// Ordered segments produced from one raw text input.
pub type ParsedInput = Vec<Segment>;

/// Clamp a marker duration into the accepted range.
///
/// Returns `None` for non-positive durations, which are dropped rather than
/// emitted as zero-length pauses.
fn clamp_pause(duration: f64) -> Option<f64> {
    if duration > 0.0 {
        Some(duration.min(MAX_PAUSE_SECONDS))
    } else {
        None
    }
}

fn push_speech(segments: &mut ParsedInput, gap: &str) {
    let trimmed = gap.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::speech(trimmed));
    }
}

/// Split `text` on pause markers in a single left-to-right pass.
///
/// Text between markers is trimmed and kept only when non-empty. When the
/// scan yields no segments at all, the untrimmed original text is returned as
/// a single speech segment. Never fails.
pub fn parse(text: &str) -> ParsedInput {
    let mut segments = ParsedInput::new();
    let mut cursor = 0;

    for captures in MARKER_PATTERN.captures_iter(text) {
        let Some(marker) = captures.get(0) else {
            continue;
        };

        push_speech(&mut segments, &text[cursor..marker.start()]);

        // The pattern only admits well-formed numeric literals.
        let duration = captures
            .get(1)
            .or_else(|| captures.get(2))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        if let Some(duration_seconds) = duration.and_then(clamp_pause) {
            segments.push(Segment::pause(duration_seconds));
        }

        cursor = marker.end();
    }

    push_speech(&mut segments, &text[cursor..]);

    if segments.is_empty() {
        segments.push(Segment::speech(text));
    }

    segments
}
