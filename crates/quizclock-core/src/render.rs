//! Presentation seam.
//!
//! The controller never draws anything itself; it hands snapshots to a
//! [`Renderer`]. The CLI prints them to the terminal, tests record them.

use std::sync::{Arc, Mutex};


use crate::scoring::ExamResult;

/// Snapshot of the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question_id: u32,
    pub prompt: String,
    pub choices: Vec<String>,
    /// Recorded choice for this question, shown as the active selection.
    pub selected: Option<usize>,
    /// Zero-based position in the exam.
    pub position: usize,
    /// Number of questions in the exam.
    pub total: usize,
}

impl QuestionView {
    /// "Question X / N".
    pub fn progress_label(&self) -> String {
        format!("Question {} / {}", self.position + 1, self.total)
    }

    /// Whether "previous" does anything here.
    pub fn can_go_back(&self) -> bool {
        self.position > 0
    }

    /// Whether "next" finishes the exam instead of moving on.
    pub fn next_finishes(&self) -> bool {
        self.position + 1 >= self.total
    }
}

/// Presentation layer driven by the controller.
pub trait Renderer: Send {
    /// Show a question, its choices and the position indicator.
    fn render_question(&mut self, view: &QuestionView);

    /// Show the countdown. `display` is `remaining_secs` as `MM:SS`.
    fn render_timer(&mut self, remaining_secs: u64, display: &str);

    /// Show the final score screen.
    fn render_result(&mut self, result: &ExamResult);
}

/// Renderer that discards everything.
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render_question(&mut self, _: &QuestionView) {}
    fn render_timer(&mut self, _: u64, _: &str) {}
    fn render_result(&mut self, _: &ExamResult) {}
}

/// One call made to a [`RecordingRenderer`].
#[derive(Debug, Clone)]
pub enum RenderEvent {
    Question(QuestionView),
    Timer { remaining_secs: u64, display: String },
    Result(Box<ExamResult>),
}

/// Renderer that keeps every call, for inspecting controller output.
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the controller.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.lock().clone()
    }

    /// The most recently rendered question.
    pub fn last_question(&self) -> Option<QuestionView> {
        self.lock().iter().rev().find_map(|e| match e {
            RenderEvent::Question(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Every timer display string, in order.
    pub fn timer_displays(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Timer { display, .. } => Some(display.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every rendered result, in order.
    pub fn results(&self) -> Vec<ExamResult> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Result(result) => Some(result.as_ref().clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RenderEvent>> {
        // A poisoned log still holds valid events.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Renderer for RecordingRenderer {
    fn render_question(&mut self, view: &QuestionView) {
        self.lock().push(RenderEvent::Question(view.clone()));
    }

    fn render_timer(&mut self, remaining_secs: u64, display: &str) {
        self.lock().push(RenderEvent::Timer {
            remaining_secs,
            display: display.to_string(),
        });
    }

    fn render_result(&mut self, result: &ExamResult) {
        self.lock()
            .push(RenderEvent::Result(Box::new(result.clone())));
    }
}
