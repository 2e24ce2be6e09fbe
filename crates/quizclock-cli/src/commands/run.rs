//! The `quizclock run` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use quizclock_core::config::{load_config, load_config_from};
use quizclock_core::controller::{ExamController, ExamEvent};
use quizclock_core::error::ExamError;
use quizclock_core::model::QuestionPool;
use quizclock_core::parser;
use quizclock_core::render::{QuestionView, Renderer};
use quizclock_core::scoring::{ExamResult, Outcome};
use quizclock_core::timer::{format_remaining, TokioTicker};

use crate::OutputFormat;

/// Prints the exam to the terminal.
///
/// In JSON mode everything except the final result goes to stderr so stdout
/// carries only the result document.
struct TerminalRenderer {
    format: OutputFormat,
}

impl TerminalRenderer {
    fn say(&self, line: &str) {
        match self.format {
            OutputFormat::Text => println!("{line}"),
            OutputFormat::Json => eprintln!("{line}"),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render_question(&mut self, view: &QuestionView) {
        self.say("");
        self.say(&view.progress_label());
        self.say(&view.prompt);
        for (i, choice) in view.choices.iter().enumerate() {
            let mark = if view.selected == Some(i) { "x" } else { " " };
            self.say(&format!("  ({mark}) {}. {choice}", i + 1));
        }

        let mut nav = Vec::new();
        if view.can_go_back() {
            nav.push("[p] previous");
        }
        nav.push(if view.next_finishes() {
            "[n] finish"
        } else {
            "[n] next"
        });
        self.say(&format!("{}  [h] help", nav.join("  ")));
    }

    fn render_timer(&mut self, remaining_secs: u64, display: &str) {
        if should_announce(remaining_secs) {
            self.say(&format!("[{display} left]"));
        }
    }

    fn render_result(&mut self, result: &ExamResult) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!("failed to serialize result: {e}"),
            },
            OutputFormat::Text => print_result(result),
        }
        self.say("Type 'r' to retry or 'q' to quit.");
    }
}

/// Announce the clock every half minute and every second of the last ten.
fn should_announce(remaining_secs: u64) -> bool {
    remaining_secs % 30 == 0 || remaining_secs <= 10
}

fn print_result(result: &ExamResult) {
    use comfy_table::{Cell, Table};

    println!();
    if result.timed_out {
        println!("Time is up!");
    }
    println!("Exam finished");
    println!(
        "You answered {} out of {} correctly.",
        result.score.correct, result.score.total
    );
    println!("Score: {}%", result.score.percent);
    println!("Time used: {}", format_remaining(result.time_used_secs));

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", ""]);
    for (i, review) in result.reviews.iter().enumerate() {
        let verdict = match review.outcome {
            Outcome::Correct => "OK",
            Outcome::Incorrect { .. } => "WRONG",
            Outcome::Unanswered => "SKIPPED",
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&review.prompt),
            Cell::new(review.chosen_choice.as_deref().unwrap_or("-")),
            Cell::new(&review.correct_choice),
            Cell::new(verdict),
        ]);
    }
    println!("{table}");
}

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(ExamEvent),
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let input = line.trim().to_lowercase();
    let command = match input.as_str() {
        "" => Command::Empty,
        "n" | "next" => Command::Event(ExamEvent::Next),
        "p" | "prev" | "previous" => Command::Event(ExamEvent::Previous),
        "f" | "finish" => Command::Event(ExamEvent::Finish),
        "r" | "retry" => Command::Event(ExamEvent::Retry),
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" | "?" => Command::Help,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Event(ExamEvent::SelectCurrent { choice: n - 1 }),
            _ => return Err(format!("Unknown command '{}'. Type 'h' for help.", line.trim())),
        },
    };
    Ok(command)
}

const HELP: &str = "Commands:
  1, 2, ...   choose an answer for the current question
  n, next     next question (finishes on the last one)
  p, prev     previous question
  f, finish   finish the exam now
  r, retry    start a new exam
  q, quit     leave";

/// `--pool` wins over the config file; the built-in pool is the fallback.
fn resolve_pool(
    pool_flag: Option<PathBuf>,
    config_pool: Option<PathBuf>,
) -> Result<QuestionPool> {
    match pool_flag.or(config_pool) {
        Some(path) => {
            anyhow::ensure!(
                !path.is_dir(),
                "expected a pool file, got directory: {}",
                path.display()
            );
            parser::parse_pool(&path)
        }
        None => parser::builtin_pool().context("failed to load built-in pool"),
    }
}

pub async fn execute(
    pool_path: Option<PathBuf>,
    count: Option<usize>,
    time: Option<u64>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    anyhow::ensure!(count != Some(0), "count must be at least 1");
    anyhow::ensure!(time != Some(0), "time must be at least 1 second");

    let config = match config_path {
        Some(path) => load_config_from(Some(&path))?,
        None => load_config()?,
    };
    let pool = resolve_pool(pool_path, config.pool.clone())?;

    for w in parser::validate_pool(&pool) {
        match w.question_id {
            Some(id) => eprintln!("Warning: [{id}] {}", w.message),
            None => eprintln!("Warning: {}", w.message),
        }
    }

    let exam_config = config.exam_config(count, time);
    let renderer = TerminalRenderer { format };
    if exam_config.question_count > pool.len() {
        renderer.say(&format!(
            "Pool has {} questions; using all of them.",
            pool.len()
        ));
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ExamController::new(
        pool,
        exam_config,
        Box::new(renderer),
        Box::new(TokioTicker::new(tx)),
    )?;
    if let Some(seed) = seed {
        controller = controller.with_seed(seed);
    }

    let console = TerminalRenderer { format };
    controller.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(line) => match parse_command(&line) {
                        Ok(Command::Quit) => break,
                        Ok(Command::Help) => console.say(HELP),
                        Ok(Command::Empty) => {}
                        Ok(Command::Event(event)) => {
                            if let Err(e) = controller.handle(event) {
                                console.say(&describe(&e));
                            }
                        }
                        Err(message) => console.say(&message),
                    },
                    None => {
                        // Input is gone; let a running countdown play out.
                        stdin_open = false;
                        if !controller.is_in_progress() {
                            break;
                        }
                    }
                }
            }
            Some(event) = rx.recv() => {
                controller.handle(event)?;
                if !stdin_open && !controller.is_in_progress() {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn describe(error: &ExamError) -> String {
    match error {
        ExamError::ChoiceOutOfRange { choices, .. } => {
            format!("Pick a choice between 1 and {choices}.")
        }
        ExamError::NotInProgress => "The exam is over. Type 'r' to retry or 'q' to quit.".into(),
        other => other.to_string(),
    }
}
