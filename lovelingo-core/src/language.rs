//! Fixed vocabularies: love languages, effort tiers, partner gender.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a person prefers to receive affection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoveLanguage {
    #[serde(rename = "Words of Affirmation")]
    WordsOfAffirmation,
    #[serde(rename = "Acts of Service")]
    ActsOfService,
    #[serde(rename = "Receiving Gifts")]
    ReceivingGifts,
    #[serde(rename = "Quality Time")]
    QualityTime,
    #[serde(rename = "Physical Touch")]
    PhysicalTouch,
}

impl LoveLanguage {
    pub const ALL: [LoveLanguage; 5] = [
        LoveLanguage::WordsOfAffirmation,
        LoveLanguage::ActsOfService,
        LoveLanguage::ReceivingGifts,
        LoveLanguage::QualityTime,
        LoveLanguage::PhysicalTouch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LoveLanguage::WordsOfAffirmation => "Words of Affirmation",
            LoveLanguage::ActsOfService => "Acts of Service",
            LoveLanguage::ReceivingGifts => "Receiving Gifts",
            LoveLanguage::QualityTime => "Quality Time",
            LoveLanguage::PhysicalTouch => "Physical Touch",
        }
    }
}

impl fmt::Display for LoveLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize "Quality Time", "quality_time", "QUALITY-TIME" to "qualitytime".
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for LoveLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "wordsofaffirmation" | "words" | "wa" => Ok(LoveLanguage::WordsOfAffirmation),
            "actsofservice" | "acts" | "service" | "as" => Ok(LoveLanguage::ActsOfService),
            "receivinggifts" | "gifts" | "rg" => Ok(LoveLanguage::ReceivingGifts),
            "qualitytime" | "time" | "qt" => Ok(LoveLanguage::QualityTime),
            "physicaltouch" | "touch" | "pt" => Ok(LoveLanguage::PhysicalTouch),
            _ => Err(Error::validation(format!("unknown love language: {s}"))),
        }
    }
}

/// Effort/rarity tier. Ordered by increasing effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Quick,
    Medium,
    Special,
    Grand,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Quick, Tier::Medium, Tier::Special, Tier::Grand];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Quick => "Quick & Easy",
            Tier::Medium => "Medium Effort",
            Tier::Special => "Special Occasion",
            Tier::Grand => "Grand Gesture",
        }
    }

    /// Short adjective used in reminder messages.
    pub fn effort_text(&self) -> &'static str {
        match self {
            Tier::Quick => "easy",
            Tier::Medium => "medium",
            Tier::Special => "special",
            Tier::Grand => "grand",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Tier::Quick => 0,
            Tier::Medium => 1,
            Tier::Special => 2,
            Tier::Grand => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "quick" | "quickeasy" => Ok(Tier::Quick),
            "medium" | "mediumeffort" => Ok(Tier::Medium),
            "special" | "specialoccasion" => Ok(Tier::Special),
            "grand" | "grandgesture" => Ok(Tier::Grand),
            _ => Err(Error::validation(format!("unknown tier: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(Error::validation(format!("unknown gender: {s}"))),
        }
    }
}

/// Which partners an action is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForGender {
    #[default]
    Any,
    Male,
    Female,
}

impl ForGender {
    /// An absent constraint admits every action.
    pub fn admits(&self, constraint: Option<Gender>) -> bool {
        match (self, constraint) {
            (ForGender::Any, _) | (_, None) => true,
            (ForGender::Male, Some(g)) => g == Gender::Male,
            (ForGender::Female, Some(g)) => g == Gender::Female,
        }
    }
}

impl FromStr for ForGender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if squash(s) == "any" {
            return Ok(ForGender::Any);
        }
        Ok(match s.parse::<Gender>()? {
            Gender::Male => ForGender::Male,
            Gender::Female => ForGender::Female,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn love_language_parses_display_and_aliases() {
        assert_eq!("Quality Time".parse::<LoveLanguage>().unwrap(), LoveLanguage::QualityTime);
        assert_eq!("QUALITY_TIME".parse::<LoveLanguage>().unwrap(), LoveLanguage::QualityTime);
        assert_eq!("gifts".parse::<LoveLanguage>().unwrap(), LoveLanguage::ReceivingGifts);
        assert!(matches!("hugs".parse::<LoveLanguage>(), Err(Error::Validation(_))));
    }

    #[test]
    fn love_language_serializes_as_display_string() {
        let json = serde_json::to_string(&LoveLanguage::WordsOfAffirmation).unwrap();
        assert_eq!(json, "\"Words of Affirmation\"");
    }

    #[test]
    fn tier_order_follows_effort() {
        assert!(Tier::Quick < Tier::Medium);
        assert!(Tier::Special < Tier::Grand);
        assert_eq!("Grand Gesture".parse::<Tier>().unwrap(), Tier::Grand);
        assert_eq!("quick & easy".parse::<Tier>().unwrap(), Tier::Quick);
    }

    #[test]
    fn for_gender_admits() {
        assert!(ForGender::Any.admits(Some(Gender::Male)));
        assert!(ForGender::Female.admits(None));
        assert!(ForGender::Female.admits(Some(Gender::Female)));
        assert!(!ForGender::Female.admits(Some(Gender::Male)));
    }
}
