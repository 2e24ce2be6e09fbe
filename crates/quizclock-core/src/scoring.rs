//! Exam scoring and per-question review.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Question;

/// Final tally of an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Number of questions answered correctly.
    pub correct: usize,
    /// Number of questions in the exam.
    pub total: usize,
    /// `correct / total` as a whole percentage, rounded half up.
    pub percent: u32,
}

impl Score {
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct,
            total,
            percent: round_percent(correct, total),
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up.
///
/// Integer arithmetic: `floor((200c + t) / 2t)` is `floor(100c/t + 0.5)`.
pub fn round_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u32
}

/// How a single question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect { chosen: usize },
    Unanswered,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// Review line for one question of a finished exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question_id: u32,
    pub prompt: String,
    pub outcome: Outcome,
    /// Text of the correct choice.
    pub correct_choice: String,
    /// Text of the recorded choice, if any.
    #[serde(default)]
    pub chosen_choice: Option<String>,
}

/// Classify one question against the recorded answers.
///
/// A missing entry is `Unanswered` and never matches, whatever the correct
/// index is.
pub fn grade(question: &Question, answers: &HashMap<u32, usize>) -> Outcome {
    match answers.get(&question.id) {
        Some(&chosen) if chosen == question.answer => Outcome::Correct,
        Some(&chosen) => Outcome::Incorrect { chosen },
        None => Outcome::Unanswered,
    }
}

/// Grade every question and compute the score.
pub fn score_answers(
    questions: &[Question],
    answers: &HashMap<u32, usize>,
) -> (Score, Vec<QuestionReview>) {
    let reviews: Vec<QuestionReview> = questions
        .iter()
        .map(|q| {
            let outcome = grade(q, answers);
            let chosen_choice = answers
                .get(&q.id)
                .and_then(|&i| q.choices.get(i))
                .cloned();
            QuestionReview {
                question_id: q.id,
                prompt: q.prompt.clone(),
                outcome,
                correct_choice: q.correct_choice().unwrap_or_default().to_string(),
                chosen_choice,
            }
        })
        .collect();

    let correct = reviews.iter().filter(|r| r.outcome.is_correct()).count();
    (Score::new(correct, questions.len()), reviews)
}

/// Everything known about a finished attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    /// Identifier of the attempt.
    pub attempt_id: Uuid,
    /// Pool the questions were drawn from.
    pub pool_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Configured countdown length.
    pub total_time_secs: u64,
    /// Seconds consumed by the countdown before finishing.
    pub time_used_secs: u64,
    /// Whether the countdown ran out.
    pub timed_out: bool,
    pub score: Score,
    pub reviews: Vec<QuestionReview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, answer: usize) -> Question {
        Question {
            id,
            prompt: format!("Q{id}"),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer,
        }
    }

    #[test]
    fn percent_matches_reference_values() {
        assert_eq!(round_percent(3, 5), 60);
        assert_eq!(round_percent(1, 5), 20);
        assert_eq!(round_percent(2, 3), 67);
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(0, 5), 0);
        assert_eq!(round_percent(5, 5), 100);
    }

    #[test]
    fn percent_rounds_halves_up() {
        // 12.5 -> 13, 37.5 -> 38, 62.5 -> 63
        assert_eq!(round_percent(1, 8), 13);
        assert_eq!(round_percent(3, 8), 38);
        assert_eq!(round_percent(5, 8), 63);
        // 50.0 stays
        assert_eq!(round_percent(1, 2), 50);
    }

    #[test]
    fn percent_of_empty_exam_is_zero() {
        assert_eq!(round_percent(0, 0), 0);
    }

    #[test]
    fn unanswered_is_never_correct() {
        let answers = HashMap::new();
        // Correct index 0 must not match "no answer".
        assert_eq!(grade(&question(1, 0), &answers), Outcome::Unanswered);
    }

    #[test]
    fn grade_correct_and_incorrect() {
        let answers = HashMap::from([(1, 2), (2, 0)]);
        assert_eq!(grade(&question(1, 2), &answers), Outcome::Correct);
        assert_eq!(
            grade(&question(2, 3), &answers),
            Outcome::Incorrect { chosen: 0 }
        );
    }

    #[test]
    fn score_answers_counts_matches() {
        let questions: Vec<Question> = (1..=5).map(|id| question(id, 0)).collect();
        let answers = HashMap::from([(1, 0), (2, 0), (3, 0), (4, 1)]);
        let (score, reviews) = score_answers(&questions, &answers);
        assert_eq!(score, Score::new(3, 5));
        assert_eq!(score.percent, 60);
        assert_eq!(reviews.len(), 5);
        assert_eq!(reviews[3].chosen_choice.as_deref(), Some("b"));
        assert_eq!(reviews[3].correct_choice, "a");
        assert_eq!(reviews[4].outcome, Outcome::Unanswered);
        assert!(reviews[4].chosen_choice.is_none());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_string(&Outcome::Incorrect { chosen: 2 }).unwrap();
        assert_eq!(json, r#"{"status":"incorrect","chosen":2}"#);
    }
}
