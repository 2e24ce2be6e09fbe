//! The exam session controller.
//!
//! Owns the pool, the current [`ExamSession`], the countdown handle and the
//! renderer. Every state change goes through one of its methods, one event
//! at a time:
//!
//! ```text
//! NotStarted --start--> InProgress(0) --advance at last / countdown hits 0--> Finished
//!                            ^                                                   |
//!                            +---------------------- retry ----------------------+
//! ```

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ExamError;
use crate::model::{ExamConfig, QuestionPool};
use crate::render::{QuestionView, Renderer};
use crate::scoring::ExamResult;
use crate::session::{Advance, ExamSession};
use crate::timer::{format_remaining, Ticker, TimerHandle};

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamState {
    NotStarted,
    InProgress { position: usize },
    Finished,
}

/// Input to the controller, from the UI or the countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamEvent {
    /// Choose `choice` for a question of the running exam.
    Select { question_id: u32, choice: usize },
    /// Choose `choice` for the question on screen.
    SelectCurrent { choice: usize },
    Next,
    Previous,
    /// Finish right away, wherever the exam is.
    Finish,
    Retry,
    /// One second elapsed on the countdown started for `epoch`.
    Tick { epoch: u64 },
}

/// Drives one exam attempt at a time.
pub struct ExamController {
    pool: QuestionPool,
    config: ExamConfig,
    renderer: Box<dyn Renderer>,
    ticker: Box<dyn Ticker>,
    rng: StdRng,
    session: Option<ExamSession>,
    result: Option<ExamResult>,
    timer: Option<Box<dyn TimerHandle>>,
    epoch: u64,
}

impl ExamController {
    /// Create a controller. The exam does not start until [`start`](Self::start).
    pub fn new(
        pool: QuestionPool,
        config: ExamConfig,
        renderer: Box<dyn Renderer>,
        ticker: Box<dyn Ticker>,
    ) -> Result<Self, ExamError> {
        if pool.is_empty() {
            return Err(ExamError::EmptyPool(pool.id.clone()));
        }
        if config.question_count == 0 {
            return Err(ExamError::NoQuestionsRequested);
        }
        if config.total_time_secs == 0 {
            return Err(ExamError::NoTimeConfigured);
        }
        if let Some(q) = pool.questions.iter().find(|q| q.answer >= q.choices.len()) {
            return Err(ExamError::InvalidAnswerIndex {
                question_id: q.id,
                answer: q.answer,
                choices: q.choices.len(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(q) = pool.questions.iter().find(|q| !seen.insert(q.id)) {
            return Err(ExamError::DuplicateQuestionId(q.id));
        }

        Ok(Self {
            pool,
            config,
            renderer,
            ticker,
            rng: StdRng::from_os_rng(),
            session: None,
            result: None,
            timer: None,
            epoch: 0,
        })
    }

    /// Use a fixed seed for question selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    pub fn state(&self) -> ExamState {
        match (&self.session, &self.result) {
            (None, _) => ExamState::NotStarted,
            (Some(_), Some(_)) => ExamState::Finished,
            (Some(session), None) => ExamState::InProgress {
                position: session.position(),
            },
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.state(), ExamState::InProgress { .. })
    }

    /// The current (or just finished) attempt.
    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    /// Result of the finished attempt.
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    /// Epoch of the live countdown. Ticks carrying any other epoch are stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| t.is_active())
    }

    /// Snapshot of the question on screen, while an exam is running.
    pub fn current_view(&self) -> Option<QuestionView> {
        if !self.is_in_progress() {
            return None;
        }
        let session = self.session.as_ref()?;
        let question = session.current()?;
        Some(QuestionView {
            question_id: question.id,
            prompt: question.prompt.clone(),
            choices: question.choices.clone(),
            selected: session.answer_for(question.id),
            position: session.position(),
            total: session.len(),
        })
    }

    /// Draw a fresh selection, reset answers, position and clock, and start
    /// the countdown.
    pub fn start(&mut self) {
        self.stop_timer();
        self.epoch += 1;

        let session = ExamSession::draw(&self.pool, &self.config, &mut self.rng);
        tracing::info!(
            attempt = %session.attempt_id(),
            pool = %self.pool.id,
            questions = session.len(),
            total_time_secs = session.total_time_secs(),
            "exam started"
        );

        self.session = Some(session);
        self.result = None;

        self.render_question();
        self.render_timer();
        self.timer = Some(self.ticker.start(self.epoch));
    }

    /// Throw the current attempt away and start a new one.
    pub fn retry(&mut self) {
        tracing::debug!(state = ?self.state(), "retry requested");
        self.start();
    }

    /// Record the choice for a question of the running exam.
    pub fn select_choice(&mut self, question_id: u32, choice: usize) -> Result<(), ExamError> {
        if !self.is_in_progress() {
            return Err(ExamError::NotInProgress);
        }
        let session = self.session.as_mut().ok_or(ExamError::NotInProgress)?;
        session.select(question_id, choice)?;
        tracing::debug!(question_id, choice, "choice recorded");

        self.render_question();
        Ok(())
    }

    /// Record the choice for the question on screen.
    pub fn select_current(&mut self, choice: usize) -> Result<(), ExamError> {
        let question_id = self
            .current_view()
            .map(|v| v.question_id)
            .ok_or(ExamError::NotInProgress)?;
        self.select_choice(question_id, choice)
    }

    /// Go to the next question, or finish on the last one.
    pub fn advance(&mut self) {
        if !self.is_in_progress() {
            tracing::debug!(state = ?self.state(), "advance ignored");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.advance() {
            Advance::Moved(position) => {
                tracing::debug!(position, "advanced");
                self.render_question();
            }
            Advance::AtEnd => {
                self.finish();
            }
        }
    }

    /// Go to the previous question. Nothing happens on the first one.
    pub fn retreat(&mut self) {
        if !self.is_in_progress() {
            tracing::debug!(state = ?self.state(), "retreat ignored");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.retreat() {
            tracing::debug!(position = session.position(), "retreated");
            self.render_question();
        }
    }

    /// Stop the countdown, score the exam and show the result.
    ///
    /// Finishing a finished exam returns the existing result unchanged.
    pub fn finish(&mut self) -> Option<&ExamResult> {
        self.finish_with(false)
    }

    /// Handle one countdown tick.
    pub fn tick(&mut self, epoch: u64) {
        if epoch != self.epoch || !self.is_in_progress() {
            tracing::debug!(epoch, current = self.epoch, "stale tick ignored");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let remaining = session.tick();
        tracing::debug!(remaining, "tick");
        self.render_timer();

        if remaining == 0 {
            tracing::info!("time is up");
            self.finish_with(true);
        }
    }

    /// Dispatch a UI or countdown event.
    pub fn handle(&mut self, event: ExamEvent) -> Result<(), ExamError> {
        match event {
            ExamEvent::Select {
                question_id,
                choice,
            } => self.select_choice(question_id, choice)?,
            ExamEvent::SelectCurrent { choice } => self.select_current(choice)?,
            ExamEvent::Next => self.advance(),
            ExamEvent::Previous => self.retreat(),
            ExamEvent::Finish => {
                self.finish();
            }
            ExamEvent::Retry => self.retry(),
            ExamEvent::Tick { epoch } => self.tick(epoch),
        }
        Ok(())
    }

    fn finish_with(&mut self, timed_out: bool) -> Option<&ExamResult> {
        if self.result.is_none() {
            if self.session.is_none() {
                return None;
            }
            self.stop_timer();

            let result = self.session.as_ref()?.grade(timed_out);
            tracing::info!(
                attempt = %result.attempt_id,
                correct = result.score.correct,
                total = result.score.total,
                percent = result.score.percent,
                timed_out,
                "exam finished"
            );
            self.renderer.render_result(&result);
            self.result = Some(result);
        }
        self.result.as_ref()
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn render_question(&mut self) {
        if let Some(view) = self.current_view() {
            self.renderer.render_question(&view);
        }
    }

    fn render_timer(&mut self) {
        if let Some(session) = &self.session {
            let remaining = session.remaining_secs();
            self.renderer
                .render_timer(remaining, &format_remaining(remaining));
        }
    }
}

impl Drop for ExamController {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
