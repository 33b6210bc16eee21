//! Incremental merge algorithm
//!
//! Folds the new tail of a live source into previously archived content and caps
//! the result to a byte budget without ever starting mid-line.
//!
//! # Steps
//!
//! 1. **Dedup** (`RotatingQueue` only): the final line of the previous content is a
//!    fingerprint of the last archived position. Its first occurrence in the source
//!    marks the already-archived prefix; only content after that line is new. A
//!    missing fingerprint means the whole source is new.
//! 2. **Concatenate**: `previous + tail`.
//! 3. **Cap**: when over budget, drop everything up to and including the first
//!    newline inside the last `max` bytes.
//!
//! All offsets are byte offsets and only `\n` counts as a line terminator, so the
//! algorithm is encoding-agnostic.

use crate::MergePolicy;

/// Maximum archived content size of the reference policy (2.5 MiB)
pub const DEFAULT_MAX_ARCHIVE_BYTES: usize = 2_621_440;

const NEWLINE: u8 = b'\n';

/// Where the appended tail came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailOrigin {
    /// Fingerprint located; `skipped` source bytes were already archived
    Deduplicated {
        /// Length of the source prefix that was dropped
        skipped: usize,
    },

    /// Dedup was attempted but no usable fingerprint was found in the source
    FingerprintMissing,

    /// The full source was taken without dedup
    Wholesale,
}

/// Result of capping content to a byte budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapOutcome {
    /// The capped content
    pub content: Vec<u8>,

    /// Number of bytes dropped from the front
    pub trimmed_bytes: usize,

    /// True when no newline existed in the retained window and the content
    /// was cut at a raw byte boundary (a partial line survives at the front)
    pub hard_truncated: bool,
}

/// Result of a complete merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// New archive content
    pub content: Vec<u8>,

    /// How the appended tail was located
    pub origin: TailOrigin,

    /// Number of source bytes appended before capping
    pub appended: usize,

    /// Number of bytes dropped from the front by the cap
    pub trimmed_bytes: usize,

    /// See [`CapOutcome::hard_truncated`]
    pub hard_truncated: bool,
}

/// Extract the fingerprint (final line) of previously archived content
///
/// The final line is the text after the last newline that is not the very last
/// byte. When the content ends with a newline, that terminator stays part of the
/// fingerprint so that matches are whole lines. Blank lines carry no position
/// information and yield `None`, as does empty content.
///
/// # Examples
///
/// ```
/// use logroll_domain::merge::fingerprint;
///
/// assert_eq!(fingerprint(b"one\ntwo\n"), Some(&b"two\n"[..]));
/// assert_eq!(fingerprint(b"one\ntwo"), Some(&b"two"[..]));
/// assert_eq!(fingerprint(b""), None);
/// ```
pub fn fingerprint(previous: &[u8]) -> Option<&[u8]> {
    let (_, head) = previous.split_last()?;
    let start = head
        .iter()
        .rposition(|&b| b == NEWLINE)
        .map(|pos| pos + 1)
        .unwrap_or(0);

    let line = &previous[start..];
    let text = line.strip_suffix(&[NEWLINE]).unwrap_or(line);
    if text.is_empty() {
        return None;
    }
    Some(line)
}

/// Locate the new tail of `source` relative to `previous`
///
/// For `PlainAppend` the whole source is returned. For `RotatingQueue` the first
/// occurrence of the fingerprint is searched; the tail starts after the next
/// newline at or after the match. A fingerprint on the source's final,
/// unterminated line leaves nothing new.
pub fn new_tail<'a>(previous: &[u8], source: &'a [u8], policy: MergePolicy) -> (&'a [u8], TailOrigin) {
    if !policy.deduplicates() {
        return (source, TailOrigin::Wholesale);
    }

    let Some(mark) = fingerprint(previous) else {
        return (source, TailOrigin::FingerprintMissing);
    };
    let Some(found) = find(source, mark) else {
        return (source, TailOrigin::FingerprintMissing);
    };

    let skipped = match source[found..].iter().position(|&b| b == NEWLINE) {
        Some(offset) => found + offset + 1,
        None => source.len(),
    };
    (&source[skipped..], TailOrigin::Deduplicated { skipped })
}

/// Cap content to at most `max` bytes, starting on a line boundary
///
/// Content within budget is returned untouched. Otherwise everything up to and
/// including the first newline at or after `len - max` is dropped. If that
/// window holds no newline at all, the last `max` bytes are kept as-is and
/// [`CapOutcome::hard_truncated`] is set.
pub fn cap_to_budget(mut content: Vec<u8>, max: usize) -> CapOutcome {
    if content.len() <= max {
        return CapOutcome {
            content,
            trimmed_bytes: 0,
            hard_truncated: false,
        };
    }

    let window_start = content.len() - max;
    let (cut, hard_truncated) = match content[window_start..].iter().position(|&b| b == NEWLINE) {
        Some(offset) => (window_start + offset + 1, false),
        None => (window_start, true),
    };

    content.drain(..cut);
    CapOutcome {
        content,
        trimmed_bytes: cut,
        hard_truncated,
    }
}

/// Merge a grown source into previously archived content
///
/// # Examples
///
/// ```
/// use logroll_domain::{merge::merge, MergePolicy};
///
/// let out = merge(b"a\nb\n", b"b\nc\n", MergePolicy::RotatingQueue, 1024);
/// assert_eq!(out.content, b"a\nb\nc\n");
/// ```
pub fn merge(previous: &[u8], source: &[u8], policy: MergePolicy, max: usize) -> MergeOutcome {
    let (tail, origin) = new_tail(previous, source, policy);

    let mut combined = Vec::with_capacity(previous.len() + tail.len());
    combined.extend_from_slice(previous);
    combined.extend_from_slice(tail);

    let capped = cap_to_budget(combined, max);
    MergeOutcome {
        content: capped.content,
        origin,
        appended: tail.len(),
        trimmed_bytes: capped.trimmed_bytes,
        hard_truncated: capped.hard_truncated,
    }
}

/// Content for a first-time archive entry
///
/// The source is stored in full; `max` is only applied when given.
pub fn first_archive(source: &[u8], max: Option<usize>) -> MergeOutcome {
    let capped = match max {
        Some(max) => cap_to_budget(source.to_vec(), max),
        None => CapOutcome {
            content: source.to_vec(),
            trimmed_bytes: 0,
            hard_truncated: false,
        },
    };

    MergeOutcome {
        content: capped.content,
        origin: TailOrigin::Wholesale,
        appended: source.len(),
        trimmed_bytes: capped.trimmed_bytes,
        hard_truncated: capped.hard_truncated,
    }
}

/// First occurrence of `needle` in `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
