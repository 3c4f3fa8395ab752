//! Questionnaire — the fixed 20-item Big-Five inventory.
//!
//! The question → trait partition and the reverse-scored set are declarative tables.
//! `verify_questionnaire()` checks them once at startup; the scorer trusts them afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const QUESTION_COUNT: usize = 20;
pub const QUESTIONS_PER_TRAIT: usize = 4;
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// One of the five personality dimensions measured by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Question ids scored as `6 - score`.
pub const REVERSED: [u8; 5] = [9, 12, 18, 19, 20];

/// Each trait owns exactly four question ids.
pub const TRAIT_GROUPS: [(BigFiveTrait, [u8; QUESTIONS_PER_TRAIT]); 5] = [
    (BigFiveTrait::Openness, [1, 6, 11, 16]),
    (BigFiveTrait::Conscientiousness, [2, 7, 12, 17]),
    (BigFiveTrait::Extraversion, [3, 8, 13, 18]),
    (BigFiveTrait::Agreeableness, [4, 9, 14, 19]),
    (BigFiveTrait::Neuroticism, [5, 10, 15, 20]),
];

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: u8,
    pub text: &'static str,
    #[serde(rename = "trait")]
    pub measures: BigFiveTrait,
    #[serde(skip)]
    pub reversed: bool,
}

const fn question(id: u8, text: &'static str, measures: BigFiveTrait, reversed: bool) -> Question {
    Question {
        id,
        text,
        measures,
        reversed,
    }
}

use BigFiveTrait::{Agreeableness, Conscientiousness, Extraversion, Neuroticism, Openness};

pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    question(1, "I see myself as someone who is original, comes up with new ideas.", Openness, false),
    question(2, "I am someone who does a thorough job.", Conscientiousness, false),
    question(3, "I am someone who is talkative.", Extraversion, false),
    question(4, "I am someone who is helpful and unselfish with others.", Agreeableness, false),
    question(5, "I am someone who can be tense.", Neuroticism, false),
    question(6, "I am someone who is curious about many different things.", Openness, false),
    question(7, "I am someone who is a reliable worker.", Conscientiousness, false),
    question(8, "I am someone who is full of energy.", Extraversion, false),
    question(9, "I am someone who starts quarrels with others.", Agreeableness, true),
    question(10, "I am someone who gets nervous easily.", Neuroticism, false),
    question(11, "I am someone who is an ingenious, deep thinker.", Openness, false),
    question(12, "I am someone who tends to be lazy.", Conscientiousness, true),
    question(13, "I am someone who generates a lot of enthusiasm.", Extraversion, false),
    question(14, "I am someone who has a forgiving nature.", Agreeableness, false),
    question(15, "I am someone who worries a lot.", Neuroticism, false),
    question(16, "I am someone who values artistic, aesthetic experiences.", Openness, false),
    question(17, "I am someone who persists until the task is finished.", Conscientiousness, false),
    question(18, "I am someone who tends to be quiet.", Extraversion, true),
    question(19, "I am someone who is sometimes rude to others.", Agreeableness, true),
    question(20, "I am someone who remains calm in tense situations.", Neuroticism, true),
];

#[derive(Debug, Error, PartialEq)]
pub enum QuestionnaireError {
    #[error("question id {0} is outside 1..={QUESTION_COUNT}")]
    OutOfRange(u8),

    #[error("question {0} is assigned to more than one trait")]
    AssignedTwice(u8),

    #[error("question {0} is not assigned to any trait")]
    Unassigned(u8),

    #[error("trait {0:?} appears in more than one group")]
    DuplicateTrait(BigFiveTrait),

    #[error("trait {0:?} has no question group")]
    MissingTrait(BigFiveTrait),

    #[error("question table has {0} entries, expected {QUESTION_COUNT}")]
    QuestionTableSize(usize),

    #[error("question table entry {0} disagrees with the trait partition or reversed set")]
    TableMismatch(u8),
}

/// Returns the trait a question id contributes to, if the id exists.
pub fn trait_for(question_id: u8) -> Option<BigFiveTrait> {
    TRAIT_GROUPS
        .iter()
        .find(|(_, ids)| ids.contains(&question_id))
        .map(|(t, _)| *t)
}

pub fn is_reversed(question_id: u8) -> bool {
    REVERSED.contains(&question_id)
}

/// Checks the shipped questionnaire tables. Run once at startup.
pub fn verify_questionnaire() -> Result<(), QuestionnaireError> {
    verify_tables(&TRAIT_GROUPS, &REVERSED, &QUESTIONS)
}

fn slot_for(question_id: u8) -> Option<usize> {
    if (1..=QUESTION_COUNT as u8).contains(&question_id) {
        Some(question_id as usize - 1)
    } else {
        None
    }
}

fn verify_tables(
    groups: &[(BigFiveTrait, [u8; QUESTIONS_PER_TRAIT])],
    reversed: &[u8],
    questions: &[Question],
) -> Result<(), QuestionnaireError> {
    let mut owner: [Option<BigFiveTrait>; QUESTION_COUNT] = [None; QUESTION_COUNT];
    let mut seen_traits: Vec<BigFiveTrait> = Vec::with_capacity(groups.len());

    for (measured, ids) in groups {
        if seen_traits.contains(measured) {
            return Err(QuestionnaireError::DuplicateTrait(*measured));
        }
        seen_traits.push(*measured);

        for &id in ids {
            let slot = slot_for(id).ok_or(QuestionnaireError::OutOfRange(id))?;
            if owner[slot].is_some() {
                return Err(QuestionnaireError::AssignedTwice(id));
            }
            owner[slot] = Some(*measured);
        }
    }

    if let Some(missing) = BigFiveTrait::ALL
        .iter()
        .find(|t| !seen_traits.contains(*t))
    {
        return Err(QuestionnaireError::MissingTrait(*missing));
    }

    if let Some(slot) = owner.iter().position(Option::is_none) {
        return Err(QuestionnaireError::Unassigned(slot as u8 + 1));
    }

    for &id in reversed {
        slot_for(id).ok_or(QuestionnaireError::OutOfRange(id))?;
    }

    if questions.len() != QUESTION_COUNT {
        return Err(QuestionnaireError::QuestionTableSize(questions.len()));
    }

    for (slot, q) in questions.iter().enumerate() {
        let consistent = q.id as usize == slot + 1
            && owner[slot] == Some(q.measures)
            && reversed.contains(&q.id) == q.reversed;
        if !consistent {
            return Err(QuestionnaireError::TableMismatch(q.id));
        }
    }

    Ok(())
}
