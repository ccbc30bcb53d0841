//! Recommendation engine: score, rank, and tier-balance candidate actions.
//!
//! Scoring per action:
//! - +5 when its love language is the primary one
//! - +2 when it is the secondary one (an action has one language, so at most
//!   one of the two bonuses applies)
//! - + like_ratio * 3 from global counters (0 when nobody voted)
//! - liked by this user: +2, then +0.2 per tag the action carries
//! - disliked by this user: -3, then -0.3 per tag
//!
//! Ranking is a stable sort by score, so equal scores keep catalog order.
//! That is the only tie-break; callers must not rely on anything stronger.
//!
//! Tier balancing then keeps the top ceil(50%) Quick, ceil(30%) Medium,
//! ceil(15%) Special and ceil(5%) Grand of `count`, re-sorts the union and
//! truncates to `count`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::Action;
use crate::error::{Error, Result};
use crate::feedback::{FeedbackMap, Verdict};
use crate::language::{Gender, LoveLanguage, Tier};

pub const DEFAULT_COUNT: usize = 6;

const PRIMARY_BONUS: f64 = 5.0;
const SECONDARY_BONUS: f64 = 2.0;
const POPULARITY_WEIGHT: f64 = 3.0;
const LIKED_BONUS: f64 = 2.0;
const LIKED_TAG_BONUS: f64 = 0.2;
const DISLIKED_PENALTY: f64 = 3.0;
const DISLIKED_TAG_PENALTY: f64 = 0.3;

/// Percent of `count` reserved per tier, indexed by `Tier::index`.
const TIER_QUOTA_PERCENT: [usize; 4] = [50, 30, 15, 5];

/// Who the recommendations are for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub primary: LoveLanguage,
    #[serde(default)]
    pub secondary: Option<LoveLanguage>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl Profile {
    pub fn new(primary: LoveLanguage) -> Self {
        Self {
            primary,
            secondary: None,
            gender: None,
        }
    }

    pub fn with_secondary(mut self, secondary: LoveLanguage) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAction {
    pub action: Action,
    pub score: f64,
}

/// Turn a caller-supplied signed count into a result size.
pub fn validate_count(count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|_| Error::validation(format!("count must be >= 0, got {count}")))
}

/// Per-tier slot count for a requested result size (integer ceiling).
pub fn tier_quota(tier: Tier, count: usize) -> usize {
    (count * TIER_QUOTA_PERCENT[tier.index()]).div_ceil(100)
}

pub fn score_action(action: &Action, profile: &Profile, feedback: &FeedbackMap) -> f64 {
    let mut score = 0.0;

    if action.love_language == profile.primary {
        score += PRIMARY_BONUS;
    } else if profile.secondary == Some(action.love_language) {
        score += SECONDARY_BONUS;
    }

    score += action.like_ratio() * POPULARITY_WEIGHT;

    match feedback.get(&action.id) {
        Some(Verdict::Liked) => {
            score += LIKED_BONUS;
            for _ in &action.tags {
                score += LIKED_TAG_BONUS;
            }
        }
        Some(Verdict::Disliked) => {
            score -= DISLIKED_PENALTY;
            for _ in &action.tags {
                score -= DISLIKED_TAG_PENALTY;
            }
        }
        None => {}
    }

    score
}

/// Rank `actions` for `profile`. Pure; never fails.
pub fn recommend<'a, I>(
    actions: I,
    profile: &Profile,
    feedback: &FeedbackMap,
    exclude_ids: &HashSet<String>,
    count: usize,
) -> Vec<ScoredAction>
where
    I: IntoIterator<Item = &'a Action>,
{
    if count == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredAction> = actions
        .into_iter()
        .filter(|a| a.for_gender.admits(profile.gender))
        .filter(|a| !exclude_ids.contains(&a.id))
        .map(|a| ScoredAction {
            score: score_action(a, profile, feedback),
            action: a.clone(),
        })
        .collect();

    // Stable: equal scores keep input order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let candidates = scored.len();
    let mut balanced: Vec<ScoredAction> = Vec::with_capacity(count + Tier::ALL.len());
    for tier in Tier::ALL {
        let quota = tier_quota(tier, count);
        balanced.extend(
            scored
                .iter()
                .filter(|s| s.action.tier == tier)
                .take(quota)
                .cloned(),
        );
    }

    balanced.sort_by(|a, b| b.score.total_cmp(&a.score));
    balanced.truncate(count);

    debug!(
        candidates,
        returned = balanced.len(),
        requested = count,
        primary = %profile.primary,
        "ranked recommendations"
    );

    balanced
}
