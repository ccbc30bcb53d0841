//! ActionCatalog: the pool of candidate actions.
//!
//! Seed actions ship with the crate; custom actions are appended through
//! [`ActionCatalog::add_custom_action`]. Insertion order is preserved because
//! the recommendation sort is stable and uses it to break ties.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::action::{Action, ActionDraft};
use crate::error::{Error, Result};
use crate::language::{LoveLanguage, Tier};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<Action>", into = "Vec<Action>")]
pub struct ActionCatalog {
    actions: Vec<Action>,
    // id -> position in `actions`
    idx: HashMap<String, usize>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in seed actions.
    pub fn seeded() -> Self {
        Self::from(seed_actions().collect::<Vec<_>>())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Action> {
        self.idx.get(id).map(|&i| &self.actions[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.idx.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn insert(&mut self, action: Action) -> Result<()> {
        if self.idx.contains_key(&action.id) {
            return Err(Error::validation(format!("duplicate action id: {}", action.id)));
        }
        self.idx.insert(action.id.clone(), self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    /// Build a custom action from a draft without inserting it.
    ///
    /// Custom actions start with one like, from their author.
    pub fn build_custom_action(draft: ActionDraft, owner_id: &str) -> Action {
        Action {
            id: format!("custom-{}", Uuid::new_v4().simple()),
            title: draft.title,
            description: draft.description,
            love_language: draft.love_language,
            tier: draft.tier,
            tags: draft.tags,
            like_count: 1,
            dislike_count: 0,
            is_custom: true,
            owner_id: Some(owner_id.to_string()),
            for_gender: draft.for_gender,
            product_link: draft.product_link,
        }
    }

    pub fn add_custom_action(&mut self, draft: ActionDraft, owner_id: &str) -> Result<&Action> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("custom action title is empty"));
        }
        let action = Self::build_custom_action(draft, owner_id);
        debug!(id = %action.id, owner = owner_id, "adding custom action");
        let pos = self.actions.len();
        self.insert(action)?;
        Ok(&self.actions[pos])
    }

    pub fn by_love_language(&self, love_language: LoveLanguage) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.love_language == love_language).collect()
    }

    pub fn by_tier(&self, tier: Tier) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.tier == tier).collect()
    }

    /// Custom actions authored by `owner_id`.
    pub fn owned_by(&self, owner_id: &str) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.owner_id.as_deref() == Some(owner_id))
            .collect()
    }
}

impl From<Vec<Action>> for ActionCatalog {
    fn from(actions: Vec<Action>) -> Self {
        let mut catalog = Self::new();
        for action in actions {
            let id = action.id.clone();
            if catalog.insert(action).is_err() {
                warn!(id = %id, "dropping duplicate action on load");
            }
        }
        catalog
    }
}

impl From<ActionCatalog> for Vec<Action> {
    fn from(catalog: ActionCatalog) -> Self {
        catalog.actions
    }
}

type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    LoveLanguage,
    Tier,
    &'static [&'static str],
    u32,
    u32,
);

const SEED: &[SeedRow] = {
    use LoveLanguage::*;
    use Tier::*;
    &[
        ("wa-1", "Send a thoughtful morning text", "Start their day with a message telling them what you appreciate about them.", WordsOfAffirmation, Quick, &["text", "morning", "appreciation"], 24, 2),
        ("wa-2", "Leave a handwritten note", "Hide a note somewhere they'll find it during their day with words of encouragement.", WordsOfAffirmation, Quick, &["note", "surprise", "encouragement"], 18, 3),
        ("wa-3", "Create a 'reasons I love you' jar", "Fill a jar with small notes listing reasons you love and appreciate them.", WordsOfAffirmation, Medium, &["creative", "multiple", "lasting"], 32, 1),
        ("wa-4", "Write a heartfelt letter", "Take time to write a detailed letter expressing your feelings and gratitude.", WordsOfAffirmation, Medium, &["letter", "detailed", "emotions"], 15, 2),
        ("wa-5", "Create a video montage with messages", "Compile video messages from friends and family saying what they appreciate about your partner.", WordsOfAffirmation, Special, &["video", "friends", "family", "collaboration"], 28, 3),
        ("wa-6", "Public acknowledgment", "Recognize your partner's achievements or qualities publicly.", WordsOfAffirmation, Medium, &["public", "acknowledgment", "social"], 12, 8),
        ("wa-7", "Anniversary letter journey", "Create a series of letters to be opened on specific dates throughout the year.", WordsOfAffirmation, Grand, &["anniversary", "letters", "longterm"], 19, 2),
        ("as-1", "Take over a chore they dislike", "Do one of their regular chores without them asking.", ActsOfService, Quick, &["chores", "help", "daily"], 22, 1),
        ("as-2", "Prepare breakfast in bed", "Surprise them with their favorite breakfast before they start their day.", ActsOfService, Quick, &["food", "morning", "surprise"], 26, 4),
        ("as-3", "Create a relaxing bath", "Set up a bath with candles, bath bombs, and their favorite music.", ActsOfService, Medium, &["relaxation", "pampering", "evening"], 18, 3),
        ("as-4", "Organize a space that stresses them", "Clean and organize their desk, closet, or another area that's been causing them stress.", ActsOfService, Medium, &["organization", "stress-relief", "home"], 16, 5),
        ("as-5", "Handle all responsibilities for a day", "Take on all household or childcare duties for an entire day so they can relax.", ActsOfService, Special, &["day-off", "comprehensive", "relaxation"], 30, 2),
        ("as-6", "Plan and execute a home improvement project", "Complete a home project they've been wanting but haven't had time for.", ActsOfService, Grand, &["home-improvement", "project", "lasting"], 14, 3),
        ("rg-1", "Bring their favorite treat", "Surprise them with their favorite coffee, snack, or treat.", ReceivingGifts, Quick, &["food", "small", "surprise"], 28, 2),
        ("rg-2", "Send flowers to their workplace", "Have flowers delivered to their work to brighten their day.", ReceivingGifts, Medium, &["flowers", "work", "public"], 16, 6),
        ("rg-3", "Create a custom playlist", "Make a playlist of songs that remind you of them or have special meaning.", ReceivingGifts, Quick, &["music", "digital", "meaningful"], 22, 3),
        ("rg-4", "Find a book by their favorite author", "Get them a new or special edition book by an author they love.", ReceivingGifts, Medium, &["book", "hobby", "interest"], 14, 4),
        ("rg-5", "Purchase tickets to an event", "Get tickets to a concert, play, or sporting event they'd enjoy.", ReceivingGifts, Special, &["event", "experience", "entertainment"], 26, 2),
        ("rg-6", "Commission custom artwork", "Have a piece of art created based on a meaningful photo or memory.", ReceivingGifts, Grand, &["art", "custom", "meaningful"], 18, 3),
        ("qt-1", "Device-free dinner", "Have a meal together with no phones or other distractions.", QualityTime, Quick, &["dinner", "undistracted", "conversation"], 24, 2),
        ("qt-2", "Take a walk together", "Go for a walk and focus on conversation and connection.", QualityTime, Quick, &["outdoors", "exercise", "talking"], 20, 3),
        ("qt-3", "Plan a date night", "Organize an evening focused on activities you both enjoy.", QualityTime, Medium, &["date", "evening", "activities"], 32, 1),
        ("qt-4", "Take a class together", "Sign up for a class to learn something new together.", QualityTime, Special, &["learning", "activity", "skill"], 18, 5),
        ("qt-5", "Weekend getaway", "Plan a weekend trip to a destination you both would enjoy.", QualityTime, Grand, &["travel", "weekend", "experience"], 28, 2),
        ("pt-1", "Offer a hand massage", "Give them a hand massage while you talk about their day.", PhysicalTouch, Quick, &["massage", "relaxation", "conversation"], 22, 3),
        ("pt-2", "Extended hug greeting", "Give a long, intentional hug when you or they arrive home.", PhysicalTouch, Quick, &["hug", "greeting", "simple"], 26, 1),
        ("pt-3", "Cuddle during a movie", "Plan a movie night with intentional cuddling time.", PhysicalTouch, Quick, &["cuddle", "movie", "relaxation"], 30, 2),
        ("pt-4", "Give a full back massage", "Learn some basic massage techniques and give them a proper back massage.", PhysicalTouch, Medium, &["massage", "relaxation", "evening"], 24, 3),
        ("pt-5", "Take a dance class together", "Learn a partner dance style like salsa, tango, or ballroom.", PhysicalTouch, Special, &["dance", "learning", "activity"], 18, 6),
        ("pt-6", "Create a spa day at home", "Set up a full day of relaxing massages and spa treatments at home.", PhysicalTouch, Grand, &["spa", "pampering", "relaxation"], 20, 4),
    ]
};

fn seed_actions() -> impl Iterator<Item = Action> {
    SEED.iter().map(|&(id, title, description, lang, tier, tags, likes, dislikes)| {
        Action::new(id, title, lang, tier)
            .with_description(description)
            .with_tags(tags.iter().copied())
            .with_counts(likes, dislikes)
    })
}
