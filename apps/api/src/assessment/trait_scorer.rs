//! Trait Scorer — converts the 20 Likert answers into five normalized Big-Five scores.
//!
//! Each trait sums its four (possibly reversed) answers and divides by 20,
//! so every score lands in [0, 1].

use serde::{Deserialize, Serialize};

use crate::assessment::questionnaire::{
    is_reversed, trait_for, BigFiveTrait, MAX_SCORE, MIN_SCORE, QUESTIONS_PER_TRAIT,
    QUESTION_COUNT,
};
use crate::assessment::AssessmentError;

/// Highest possible per-trait sum: four questions at the top of the scale.
const MAX_TRAIT_SUM: f64 = (QUESTIONS_PER_TRAIT as i32 * MAX_SCORE) as f64;

/// A single questionnaire answer on the 1–5 Likert scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl TraitScores {
    pub fn get(&self, measured: BigFiveTrait) -> f64 {
        match measured {
            BigFiveTrait::Openness => self.openness,
            BigFiveTrait::Conscientiousness => self.conscientiousness,
            BigFiveTrait::Extraversion => self.extraversion,
            BigFiveTrait::Agreeableness => self.agreeableness,
            BigFiveTrait::Neuroticism => self.neuroticism,
        }
    }

    fn from_sums(sums: [i32; 5]) -> Self {
        let normalized = |t: BigFiveTrait| sums[t.index()] as f64 / MAX_TRAIT_SUM;
        Self {
            openness: normalized(BigFiveTrait::Openness),
            conscientiousness: normalized(BigFiveTrait::Conscientiousness),
            extraversion: normalized(BigFiveTrait::Extraversion),
            agreeableness: normalized(BigFiveTrait::Agreeableness),
            neuroticism: normalized(BigFiveTrait::Neuroticism),
        }
    }
}

/// Scores a complete answer set.
///
/// Answers are keyed by `question_id`, not by position, so any order is accepted.
/// Returns `InvalidInput` for a wrong count, an unknown or repeated question id,
/// or a score outside 1..=5.
pub fn score(answers: &[Answer]) -> Result<TraitScores, AssessmentError> {
    if answers.len() != QUESTION_COUNT {
        return Err(AssessmentError::InvalidInput(format!(
            "Exactly {QUESTION_COUNT} answers are required, got {}",
            answers.len()
        )));
    }

    let mut answered = [false; QUESTION_COUNT];
    let mut sums = [0_i32; 5];

    for answer in answers {
        let question_id = u8::try_from(answer.question_id)
            .ok()
            .filter(|id| (1..=QUESTION_COUNT as u8).contains(id))
            .ok_or_else(|| {
                AssessmentError::InvalidInput(format!(
                    "question_id {} is outside 1..={QUESTION_COUNT}",
                    answer.question_id
                ))
            })?;

        if !(MIN_SCORE..=MAX_SCORE).contains(&answer.score) {
            return Err(AssessmentError::InvalidInput(format!(
                "score {} for question {question_id} is outside {MIN_SCORE}..={MAX_SCORE}",
                answer.score
            )));
        }

        let slot = question_id as usize - 1;
        if answered[slot] {
            return Err(AssessmentError::InvalidInput(format!(
                "question {question_id} was answered more than once"
            )));
        }
        answered[slot] = true;

        let measured = trait_for(question_id).ok_or_else(|| {
            AssessmentError::InvalidInput(format!("question {question_id} measures no trait"))
        })?;

        let value = if is_reversed(question_id) {
            (MAX_SCORE + MIN_SCORE) - answer.score
        } else {
            answer.score
        };
        sums[measured.index()] += value;
    }

    Ok(TraitScores::from_sums(sums))
}
