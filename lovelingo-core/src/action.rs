//! Action templates: the small things a user can do for a partner.

use serde::{Deserialize, Serialize};

use crate::language::{ForGender, LoveLanguage, Tier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub love_language: LoveLanguage,
    pub tier: Tier,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Global counters across all users; seed data ships baselines.
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,

    #[serde(default)]
    pub is_custom: bool,
    /// Author of a custom action. None for seed actions.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub for_gender: ForGender,
    #[serde(default)]
    pub product_link: Option<String>,
}

impl Action {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        love_language: LoveLanguage,
        tier: Tier,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            love_language,
            tier,
            tags: Vec::new(),
            like_count: 0,
            dislike_count: 0,
            is_custom: false,
            owner_id: None,
            for_gender: ForGender::Any,
            product_link: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_counts(mut self, likes: u32, dislikes: u32) -> Self {
        self.like_count = likes;
        self.dislike_count = dislikes;
        self
    }

    pub fn with_gender(mut self, for_gender: ForGender) -> Self {
        self.for_gender = for_gender;
        self
    }

    /// Share of global likes in [0, 1]. Zero when nobody has rated it yet.
    pub fn like_ratio(&self) -> f64 {
        let total = self.like_count as f64 + self.dislike_count as f64;
        if total == 0.0 {
            0.0
        } else {
            self.like_count as f64 / total
        }
    }
}

/// User-supplied fields for a custom action. Ids and counters are assigned
/// by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub love_language: LoveLanguage,
    pub tier: Tier,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub for_gender: ForGender,
    #[serde(default)]
    pub product_link: Option<String>,
}
