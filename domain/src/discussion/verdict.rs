//! Verdict sentinel detection.
//!
//! The judge is told to open a concluding reply with [`VERDICT_SENTINEL`].
//! Detection runs on the streamed fragments as they arrive, so how
//! fragments line up with the sentinel matters:
//!
//! | Mode | Signals when |
//! |------|--------------|
//! | [`VerdictDetection::PerFragment`] | any single fragment, left-trimmed, starts with the sentinel |
//! | [`VerdictDetection::MessagePrefix`] | the reply accumulated so far, left-trimmed, starts with the sentinel |
//!
//! `PerFragment` misses a sentinel split across fragments (`"VER"`, `"DICT:"`)
//! but also fires on a fragment starting with the sentinel mid-reply.
//! `MessagePrefix` only looks at the start of the logical message.
//! Matching is exact and case-sensitive in both modes.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Prefix the judge uses to announce a verdict
pub const VERDICT_SENTINEL: &str = "VERDICT:";

/// How the sentinel is located in a streamed judge reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictDetection {
    #[default]
    #[serde(rename = "fragment")]
    PerFragment,
    #[serde(rename = "message")]
    MessagePrefix,
}

impl VerdictDetection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictDetection::PerFragment => "fragment",
            VerdictDetection::MessagePrefix => "message",
        }
    }
}

impl std::fmt::Display for VerdictDetection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VerdictDetection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fragment" | "per-fragment" => Ok(VerdictDetection::PerFragment),
            "message" | "message-prefix" => Ok(VerdictDetection::MessagePrefix),
            other => Err(DomainError::UnknownVerdictDetection(other.to_string())),
        }
    }
}

/// Whether a single piece of text opens with the sentinel
pub fn starts_with_sentinel(text: &str) -> bool {
    text.trim_start().starts_with(VERDICT_SENTINEL)
}

/// Stateful detector fed one fragment at a time.
///
/// Once a verdict is detected it stays detected.
#[derive(Debug, Clone)]
pub struct VerdictDetector {
    mode: VerdictDetection,
    accumulated: String,
    detected: bool,
}

impl VerdictDetector {
    pub fn new(mode: VerdictDetection) -> Self {
        Self {
            mode,
            accumulated: String::new(),
            detected: false,
        }
    }

    /// Feed the next fragment. Returns true when this fragment triggered detection.
    pub fn observe(&mut self, fragment: &str) -> bool {
        if self.detected {
            return false;
        }

        self.detected = match self.mode {
            VerdictDetection::PerFragment => starts_with_sentinel(fragment),
            VerdictDetection::MessagePrefix => {
                self.accumulated.push_str(fragment);
                starts_with_sentinel(&self.accumulated)
            }
        };
        self.detected
    }

    pub fn detected(&self) -> bool {
        self.detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(mode: VerdictDetection, fragments: &[&str]) -> bool {
        let mut detector = VerdictDetector::new(mode);
        for fragment in fragments {
            detector.observe(fragment);
        }
        detector.detected()
    }

    #[test]
    fn test_uppercase_sentinel_detected() {
        assert!(feed(VerdictDetection::PerFragment, &["VERDICT: yes"]));
        assert!(feed(VerdictDetection::MessagePrefix, &["VERDICT: yes"]));
    }

    #[test]
    fn test_lowercase_sentinel_ignored() {
        assert!(!feed(VerdictDetection::PerFragment, &["verdict: yes"]));
        assert!(!feed(VerdictDetection::MessagePrefix, &["verdict: yes"]));
    }

    #[test]
    fn test_leading_whitespace_trimmed() {
        assert!(feed(VerdictDetection::PerFragment, &["  VERDICT:"]));
        assert!(feed(VerdictDetection::PerFragment, &["\n\tVERDICT: guilty"]));
        assert!(feed(VerdictDetection::MessagePrefix, &["  ", "VERDICT:"]));
    }

    #[test]
    fn test_split_sentinel_missed_per_fragment() {
        assert!(!feed(VerdictDetection::PerFragment, &["VER", "DICT:", " done"]));
    }

    #[test]
    fn test_split_sentinel_found_by_message_prefix() {
        assert!(feed(VerdictDetection::MessagePrefix, &["VER", "DICT:", " done"]));
    }

    #[test]
    fn test_mid_reply_fragment_fires_only_per_fragment() {
        let fragments = ["The discussion is open.", " VERDICT: not yet"];
        assert!(feed(VerdictDetection::PerFragment, &fragments));
        assert!(!feed(VerdictDetection::MessagePrefix, &fragments));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        assert!(!feed(VerdictDetection::PerFragment, &["VERDICT - yes"]));
        assert!(!feed(VerdictDetection::PerFragment, &["Verdict: yes"]));
        assert!(!feed(VerdictDetection::PerFragment, &["**VERDICT:** yes"]));
    }

    #[test]
    fn test_observe_reports_trigger_once() {
        let mut detector = VerdictDetector::new(VerdictDetection::PerFragment);
        assert!(!detector.observe("thinking"));
        assert!(detector.observe("VERDICT: yes"));
        assert!(!detector.observe("VERDICT: again"));
        assert!(detector.detected());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            "fragment".parse::<VerdictDetection>().unwrap(),
            VerdictDetection::PerFragment
        );
        assert_eq!(
            "Message".parse::<VerdictDetection>().unwrap(),
            VerdictDetection::MessagePrefix
        );
        assert!("fuzzy".parse::<VerdictDetection>().is_err());
    }

    #[test]
    fn test_default_mode_is_per_fragment() {
        assert_eq!(VerdictDetection::default(), VerdictDetection::PerFragment);
    }
}
