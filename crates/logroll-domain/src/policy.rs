//! Merge policy - how new content is located in a source file

/// Per-file merge policy
///
/// Selected by configuration rather than by the file name itself:
/// - RotatingQueue: the writer resets the file and old lines reappear, so the
///   previously archived last line is used to skip already-archived content
/// - PlainAppend: the full current source is appended on every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergePolicy {
    /// Queue-style log rewritten by its writer (e.g. on every boot)
    RotatingQueue,

    /// Everything in the source is treated as new
    #[default]
    PlainAppend,
}

impl MergePolicy {
    /// Get the policy name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::RotatingQueue => "rotating_queue",
            MergePolicy::PlainAppend => "plain_append",
        }
    }

    /// Parse a policy from its configuration name
    ///
    /// Accepts `-` in place of `_` and ignores case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "rotating_queue" => Some(MergePolicy::RotatingQueue),
            "plain_append" => Some(MergePolicy::PlainAppend),
            _ => None,
        }
    }

    /// Whether this policy deduplicates against the previous archive content
    pub fn deduplicates(&self) -> bool {
        matches!(self, MergePolicy::RotatingQueue)
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid merge policy: {}", s))
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
