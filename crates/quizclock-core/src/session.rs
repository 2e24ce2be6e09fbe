//! Per-attempt exam state.
//!
//! An [`ExamSession`] owns the drawn questions, the current position, the
//! recorded answers and the remaining time. It knows nothing about timers
//! or rendering; [`crate::controller::ExamController`] drives it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::ExamError;
use crate::model::{ExamConfig, Question, QuestionPool};
use crate::scoring::{score_answers, ExamResult};

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given position.
    Moved(usize),
    /// Already on the last question; the exam should finish.
    AtEnd,
}

/// One timed attempt.
#[derive(Debug, Clone)]
pub struct ExamSession {
    attempt_id: Uuid,
    pool_id: String,
    started_at: DateTime<Utc>,
    questions: Vec<Question>,
    position: usize,
    answers: HashMap<u32, usize>,
    remaining_secs: u64,
    total_time_secs: u64,
}

impl ExamSession {
    /// Draw `min(question_count, pool.len())` distinct questions in random order.
    ///
    /// Shuffles a copy of the whole pool and keeps the front, so every subset
    /// and every ordering is equally likely.
    pub fn draw<R: Rng + ?Sized>(pool: &QuestionPool, config: &ExamConfig, rng: &mut R) -> Self {
        let mut questions = pool.questions.clone();
        questions.shuffle(rng);
        questions.truncate(config.question_count.min(pool.len()));

        Self {
            attempt_id: Uuid::new_v4(),
            pool_id: pool.id.clone(),
            started_at: Utc::now(),
            questions,
            position: 0,
            answers: HashMap::new(),
            remaining_secs: config.total_time_secs,
            total_time_secs: config.total_time_secs,
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn answers(&self) -> &HashMap<u32, usize> {
        &self.answers
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_time_secs(&self) -> u64 {
        self.total_time_secs
    }

    /// The question at the current position.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// The recorded choice for a question, if any.
    pub fn answer_for(&self, question_id: u32) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.questions.len()
    }

    /// Record (or overwrite) the choice for a question in this session.
    pub fn select(&mut self, question_id: u32, choice: usize) -> Result<(), ExamError> {
        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or(ExamError::UnknownQuestion(question_id))?;

        if choice >= question.choices.len() {
            return Err(ExamError::ChoiceOutOfRange {
                question_id,
                choice,
                choices: question.choices.len(),
            });
        }

        self.answers.insert(question_id, choice);
        Ok(())
    }

    /// Move to the next question, or report that this is the last one.
    pub fn advance(&mut self) -> Advance {
        if self.is_last() {
            Advance::AtEnd
        } else {
            self.position += 1;
            Advance::Moved(self.position)
        }
    }

    /// Move to the previous question. Returns `false` at the first question.
    pub fn retreat(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Take one second off the clock and return what is left.
    pub fn tick(&mut self) -> u64 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Score the session as it stands.
    pub fn grade(&self, timed_out: bool) -> ExamResult {
        let (score, reviews) = score_answers(&self.questions, &self.answers);
        ExamResult {
            attempt_id: self.attempt_id,
            pool_id: self.pool_id.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            total_time_secs: self.total_time_secs,
            time_used_secs: self.total_time_secs - self.remaining_secs,
            timed_out,
            score,
            reviews,
        }
    }
}
