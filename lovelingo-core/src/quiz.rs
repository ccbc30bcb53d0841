//! Love-language quiz scoring.
//!
//! Each answer names one love language. The most frequent one becomes the
//! primary; the runner-up (with at least one vote) the secondary. Ties go to
//! the language listed later in [`LoveLanguage::ALL`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::LoveLanguage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub primary: LoveLanguage,
    pub secondary: Option<LoveLanguage>,
    pub scores: BTreeMap<LoveLanguage, u32>,
}

/// A multiple-choice question; each answer points at one love language.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub prompt: &'static str,
    pub answers: &'static [(&'static str, LoveLanguage)],
}

pub const QUESTIONS: &[Question] = {
    use LoveLanguage::*;
    &[
        Question {
            prompt: "What would make your partner feel most appreciated?",
            answers: &[
                ("When I surprise them with a thoughtful gift, even something small.", ReceivingGifts),
                ("When I take care of a task they've been meaning to do.", ActsOfService),
                ("When I tell them specifically what I admire about them.", WordsOfAffirmation),
                ("When I put my phone away and give them my full attention.", QualityTime),
                ("When I hold their hand or give them a hug unexpectedly.", PhysicalTouch),
            ],
        },
        Question {
            prompt: "When your partner is feeling down, they would most likely appreciate:",
            answers: &[
                ("Spending uninterrupted time together doing something they enjoy.", QualityTime),
                ("Receiving a small gift that shows you were thinking of them.", ReceivingGifts),
                ("Physical affection like a hug or back rub.", PhysicalTouch),
                ("Hearing you say how much they mean to you.", WordsOfAffirmation),
                ("Having you take over their responsibilities for the day.", ActsOfService),
            ],
        },
        Question {
            prompt: "Your partner would be most excited about:",
            answers: &[
                ("A handwritten card expressing your feelings for them.", WordsOfAffirmation),
                ("A weekend getaway where you can spend quality time together.", QualityTime),
                ("A thoughtful gift that you put effort into selecting.", ReceivingGifts),
                ("A massage or physical display of affection.", PhysicalTouch),
                ("You completing a project around the house they've wanted done.", ActsOfService),
            ],
        },
        Question {
            prompt: "Your partner would be most likely to complain about:",
            answers: &[
                ("You not helping enough with everyday tasks.", ActsOfService),
                ("You being physically distant or not showing affection.", PhysicalTouch),
                ("You not expressing appreciation or saying 'I love you' often.", WordsOfAffirmation),
                ("You forgetting special occasions or not giving thoughtful gifts.", ReceivingGifts),
                ("You being distracted during conversations or time together.", QualityTime),
            ],
        },
        Question {
            prompt: "In daily life, your partner most appreciates:",
            answers: &[
                ("Small tokens of affection like their favorite snack or flowers.", ReceivingGifts),
                ("Frequent physical touch like hand-holding or hugs.", PhysicalTouch),
                ("Regular verbal affirmation and compliments.", WordsOfAffirmation),
                ("You taking initiative on household tasks without being asked.", ActsOfService),
                ("Setting aside time each day to talk without distractions.", QualityTime),
            ],
        },
        Question {
            prompt: "Your partner feels most connected to you when:",
            answers: &[
                ("You do something practical to make their day easier.", ActsOfService),
                ("You have deep, meaningful conversations together.", QualityTime),
                ("You express how much you value and appreciate them.", WordsOfAffirmation),
                ("You give them a meaningful or thoughtful gift.", ReceivingGifts),
                ("You're physically close or intimate with them.", PhysicalTouch),
            ],
        },
        Question {
            prompt: "What would your partner most appreciate on their birthday?",
            answers: &[
                ("A day spent doing activities together that they enjoy.", QualityTime),
                ("A heartfelt letter or card expressing your love.", WordsOfAffirmation),
                ("Taking care of all their responsibilities for the day.", ActsOfService),
                ("A thoughtful, personal gift they've been wanting.", ReceivingGifts),
                ("Extra physical affection and intimacy throughout the day.", PhysicalTouch),
            ],
        },
        Question {
            prompt: "After a disagreement, your partner would most likely want you to:",
            answers: &[
                ("Give them a hug and physical reassurance.", PhysicalTouch),
                ("Do something nice for them to show you care.", ActsOfService),
                ("Spend time together reconnecting emotionally.", QualityTime),
                ("Express your feelings and apologize with sincere words.", WordsOfAffirmation),
                ("Give them a small gift as a peace offering.", ReceivingGifts),
            ],
        },
        Question {
            prompt: "Your partner would feel most valued if you:",
            answers: &[
                ("Regularly tell them how amazing they are and how much you love them.", WordsOfAffirmation),
                ("Regularly give them small gifts or tokens of appreciation.", ReceivingGifts),
                ("Regularly set aside quality time just for them.", QualityTime),
                ("Regularly help them with their daily tasks.", ActsOfService),
                ("Regularly show physical affection throughout the day.", PhysicalTouch),
            ],
        },
        Question {
            prompt: "What would your partner consider most meaningful?",
            answers: &[
                ("A surprise weekend away where you can focus on each other.", QualityTime),
                ("A custom or personalized gift that reminds them of a special memory.", ReceivingGifts),
                ("When you help them achieve an important goal or task.", ActsOfService),
                ("Public recognition or praise of their accomplishments.", WordsOfAffirmation),
                ("Physical closeness and affection, especially during difficult times.", PhysicalTouch),
            ],
        },
    ]
};

/// Map 0-based answer choices (one per question, in order) to love languages.
pub fn answers_from_choices(choices: &[usize]) -> Result<Vec<LoveLanguage>> {
    if choices.len() > QUESTIONS.len() {
        return Err(Error::validation(format!(
            "got {} answers for {} questions",
            choices.len(),
            QUESTIONS.len()
        )));
    }
    choices
        .iter()
        .zip(QUESTIONS)
        .enumerate()
        .map(|(i, (&choice, q))| {
            q.answers
                .get(choice)
                .map(|&(_, lang)| lang)
                .ok_or_else(|| Error::validation(format!("question {}: no answer #{}", i + 1, choice + 1)))
        })
        .collect()
}

pub fn tally(answers: &[LoveLanguage]) -> BTreeMap<LoveLanguage, u32> {
    let mut scores: BTreeMap<LoveLanguage, u32> = LoveLanguage::ALL.iter().map(|&l| (l, 0)).collect();
    for answer in answers {
        *scores.entry(*answer).or_default() += 1;
    }
    scores
}

fn best(scores: &BTreeMap<LoveLanguage, u32>, skip: Option<LoveLanguage>) -> Option<LoveLanguage> {
    let mut winner: Option<(LoveLanguage, u32)> = None;
    for lang in LoveLanguage::ALL {
        if Some(lang) == skip {
            continue;
        }
        let n = scores.get(&lang).copied().unwrap_or(0);
        if n == 0 {
            continue;
        }
        // `>=` lets a later entry win a tie.
        if winner.is_none_or(|(_, top)| n >= top) {
            winner = Some((lang, n));
        }
    }
    winner.map(|(lang, _)| lang)
}

pub fn score_quiz(answers: &[LoveLanguage]) -> Result<QuizResult> {
    if answers.is_empty() {
        return Err(Error::validation("quiz has no answers"));
    }
    let scores = tally(answers);
    let primary = best(&scores, None).ok_or_else(|| Error::validation("quiz has no answers"))?;
    let secondary = best(&scores, Some(primary));
    Ok(QuizResult { primary, secondary, scores })
}

#[cfg(test)]
mod tests {
    use super::*;
    use LoveLanguage::*;

    #[test]
    fn most_votes_wins() {
        let r = score_quiz(&[QualityTime, QualityTime, ActsOfService, QualityTime, PhysicalTouch, PhysicalTouch]).unwrap();
        assert_eq!(r.primary, QualityTime);
        assert_eq!(r.secondary, Some(PhysicalTouch));
        assert_eq!(r.scores[&QualityTime], 3);
        assert_eq!(r.scores[&WordsOfAffirmation], 0);
    }

    #[test]
    fn ties_go_to_later_language() {
        let r = score_quiz(&[WordsOfAffirmation, PhysicalTouch]).unwrap();
        assert_eq!(r.primary, PhysicalTouch);
        assert_eq!(r.secondary, Some(WordsOfAffirmation));
    }

    #[test]
    fn single_language_has_no_secondary() {
        let r = score_quiz(&[ReceivingGifts, ReceivingGifts]).unwrap();
        assert_eq!(r.primary, ReceivingGifts);
        assert_eq!(r.secondary, None);
    }

    #[test]
    fn every_question_offers_each_language_once() {
        assert_eq!(QUESTIONS.len(), 10);
        for q in QUESTIONS {
            let langs: std::collections::HashSet<_> = q.answers.iter().map(|&(_, l)| l).collect();
            assert_eq!(langs.len(), 5, "{}", q.prompt);
        }
    }

    #[test]
    fn choices_map_to_languages() {
        let langs = answers_from_choices(&[3, 0]).unwrap();
        assert_eq!(langs, vec![QualityTime, QualityTime]);
        assert!(answers_from_choices(&[7]).is_err());
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert!(matches!(score_quiz(&[]), Err(Error::Validation(_))));
    }
}
