//! Per-user like/dislike feedback. Last write wins, no history.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Liked,
    Disliked,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Liked => "liked",
            Verdict::Disliked => "disliked",
        })
    }
}

impl FromStr for Verdict {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liked" | "like" => Ok(Verdict::Liked),
            "disliked" | "dislike" => Ok(Verdict::Disliked),
            other => Err(Error::validation(format!("unknown verdict: {other}"))),
        }
    }
}

/// action id -> verdict, for one user.
pub type FeedbackMap = HashMap<String, Verdict>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStore {
    by_user: HashMap<String, FeedbackMap>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the verdict for (user, action) and return the user's map.
    pub fn record_feedback(&mut self, user_id: &str, action_id: &str, verdict: Verdict) -> FeedbackMap {
        let map = self.by_user.entry(user_id.to_string()).or_default();
        map.insert(action_id.to_string(), verdict);
        map.clone()
    }

    pub fn feedback_for(&self, user_id: &str) -> FeedbackMap {
        self.by_user.get(user_id).cloned().unwrap_or_default()
    }

    pub fn verdict(&self, user_id: &str, action_id: &str) -> Option<Verdict> {
        self.by_user.get(user_id)?.get(action_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_twice_matches_recording_once() {
        let mut once = FeedbackStore::new();
        once.record_feedback("u", "a", Verdict::Liked);

        let mut twice = FeedbackStore::new();
        twice.record_feedback("u", "a", Verdict::Liked);
        twice.record_feedback("u", "a", Verdict::Liked);

        assert_eq!(once, twice);
    }

    #[test]
    fn later_verdict_overwrites() {
        let mut s = FeedbackStore::new();
        s.record_feedback("u", "a", Verdict::Liked);
        let map = s.record_feedback("u", "a", Verdict::Disliked);
        assert_eq!(map.len(), 1);
        assert_eq!(s.verdict("u", "a"), Some(Verdict::Disliked));
    }

    #[test]
    fn users_are_isolated() {
        let mut s = FeedbackStore::new();
        s.record_feedback("u1", "a", Verdict::Liked);
        assert!(s.feedback_for("u2").is_empty());
    }

    #[test]
    fn verdict_parsing() {
        assert_eq!("like".parse::<Verdict>().unwrap(), Verdict::Liked);
        assert_eq!("Disliked".parse::<Verdict>().unwrap(), Verdict::Disliked);
        assert!("meh".parse::<Verdict>().is_err());
    }
}
