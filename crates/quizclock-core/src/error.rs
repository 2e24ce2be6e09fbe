//! Exam controller error types.
//!
//! Boundary conditions of an exam (unanswered questions, the countdown
//! hitting zero, asking for more questions than the pool holds) are policy
//! and never surface here. These errors cover misuse of the typed API: a
//! pool that cannot back an exam, or an event that names something outside
//! the current session.

use thiserror::Error;

/// Errors returned by the exam controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// The question pool has no questions.
    #[error("question pool '{0}' is empty")]
    EmptyPool(String),

    /// The configured question count is zero.
    #[error("question count must be at least 1")]
    NoQuestionsRequested,

    /// The configured total time is zero.
    #[error("total time must be at least 1 second")]
    NoTimeConfigured,

    /// A pool question marks a correct answer that is not one of its choices.
    #[error("question {question_id} has answer index {answer} but only {choices} choices")]
    InvalidAnswerIndex {
        question_id: u32,
        answer: usize,
        choices: usize,
    },

    /// Two pool questions share an id, so answers could not be told apart.
    #[error("question id {0} appears more than once in the pool")]
    DuplicateQuestionId(u32),

    /// The question is not part of the current session.
    #[error("question {0} is not part of this exam")]
    UnknownQuestion(u32),

    /// The choice index is outside the question's choices.
    #[error("choice {choice} is out of range for question {question_id} ({choices} choices)")]
    ChoiceOutOfRange {
        question_id: u32,
        choice: usize,
        choices: usize,
    },

    /// The operation needs an exam in progress.
    #[error("no exam in progress")]
    NotInProgress,
}
