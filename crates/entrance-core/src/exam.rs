//! The entrance exam engine.
//!
//! One attempt goes `NotStarted -> InProgress -> {Completed | TimedOut} ->
//! Scored`. [`ExamEngine::start`] checks the student may sit the exam,
//! [`ExamEngine::run`] asks the questions, and [`ExamEngine::finish`]
//! writes the score back exactly once.
//!
//! The deadline is cooperative: it is checked before each question, so a
//! slow answer to the last question asked can overrun it.

use std::collections::VecDeque;
use std::io::BufRead;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::ExamPolicy;
use crate::error::{EntranceError, Result};
use crate::model::Student;
use crate::questions::{self, Question};
use crate::session::{Capability, Session};
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// What the candidate sees for one question.
#[derive(Debug, Clone)]
pub struct QuestionPrompt<'a> {
    /// 1-based position in the presentation order.
    pub number: usize,
    pub total: usize,
    pub question: &'a Question,
    /// Time left before the deadline when the question was presented.
    pub remaining: Duration,
}

/// Where answer tokens come from.
pub trait AnswerSource {
    /// Next raw token for `prompt`, or `None` if the candidate has quit.
    fn next_answer(&mut self, prompt: &QuestionPrompt<'_>) -> std::io::Result<Option<String>>;
}

/// Reads one answer per line; end of input means the candidate quit.
pub struct LineAnswers<R> {
    reader: R,
}

impl<R: BufRead> LineAnswers<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> AnswerSource for LineAnswers<R> {
    fn next_answer(&mut self, _: &QuestionPrompt<'_>) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// A fixed list of answers, for replaying an attempt.
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    tokens: VecDeque<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl AnswerSource for ScriptedAnswers {
    fn next_answer(&mut self, _: &QuestionPrompt<'_>) -> std::io::Result<Option<String>> {
        Ok(self.tokens.pop_front())
    }
}

/// Progress callbacks while an attempt runs.
pub trait ExamObserver {
    fn on_question(&self, prompt: &QuestionPrompt<'_>);
    fn on_answer(&self, prompt: &QuestionPrompt<'_>, outcome: AnswerOutcome);
    fn on_invalid(&self, prompt: &QuestionPrompt<'_>, token: &str);
    fn on_time_up(&self, unanswered: usize);
    fn on_quit(&self, unanswered: usize);
}

/// No-op observer.
pub struct NoopObserver;

impl ExamObserver for NoopObserver {
    fn on_question(&self, _: &QuestionPrompt<'_>) {}
    fn on_answer(&self, _: &QuestionPrompt<'_>, _: AnswerOutcome) {}
    fn on_invalid(&self, _: &QuestionPrompt<'_>, _: &str) {}
    fn on_time_up(&self, _: usize) {}
    fn on_quit(&self, _: usize) {}
}

// ---------------------------------------------------------------------------
// Answers and scoring
// ---------------------------------------------------------------------------

/// A valid answer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Option index 0..=3.
    Pick(usize),
    Skip,
}

/// Parse a token: `A`-`D` or `S`, any case, surrounding whitespace ignored.
pub fn parse_answer(token: &str) -> Option<Choice> {
    let mut chars = token.trim().chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    if c.eq_ignore_ascii_case(&'s') {
        return Some(Choice::Skip);
    }
    questions::label_index(c).map(Choice::Pick)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Wrong { correct: char },
    Skipped,
}

/// Running counts for an attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    /// Questions never asked, because of time-out or quitting.
    pub unanswered: u32,
    pub correct_marks: u32,
    pub wrong_marks: u32,
}

impl Tally {
    fn record(&mut self, question: &Question, choice: Choice) -> AnswerOutcome {
        match choice {
            Choice::Skip => {
                self.skipped += 1;
                AnswerOutcome::Skipped
            }
            Choice::Pick(i) if question.is_correct(i) => {
                self.correct += 1;
                self.correct_marks += question.marks;
                AnswerOutcome::Correct
            }
            Choice::Pick(_) => {
                self.wrong += 1;
                self.wrong_marks += question.marks;
                AnswerOutcome::Wrong {
                    correct: question.correct_label(),
                }
            }
        }
    }

    /// `correct_marks - wrong_marks * negative_marking`. Never clamped.
    pub fn score(&self, negative_marking: f64) -> f64 {
        f64::from(self.correct_marks) - f64::from(self.wrong_marks) * negative_marking
    }
}

// ---------------------------------------------------------------------------
// Attempt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Completed,
    TimedOut,
    Scored,
}

/// Why the question loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every question was answered or skipped.
    AllAnswered,
    /// The deadline passed before the loop finished.
    TimedOut,
    /// Input ended early; the remaining questions count as skipped.
    Quit,
}

/// One in-flight exam attempt. Never persisted; only its result is.
#[derive(Debug, Clone)]
pub struct ExamAttempt {
    student_id: u32,
    order: Vec<usize>,
    started_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    cursor: usize,
    tally: Tally,
    state: AttemptState,
    termination: Option<Termination>,
}

impl ExamAttempt {
    pub fn student_id(&self) -> u32 {
        self.student_id
    }

    /// Question indices in the order they are presented.
    pub fn presentation_order(&self) -> &[usize] {
        &self.order
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }
}

/// Final result of a scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamOutcome {
    pub student_id: u32,
    pub score: f64,
    pub max_score: f64,
    pub passed: bool,
    pub termination: Termination,
    pub tally: Tally,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A uniformly random permutation of `0..n` from a seeded Fisher-Yates shuffle.
pub fn presentation_order(n: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

/// Seed derived from the current time. Not suitable for anything secret.
pub fn time_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map_or(now.timestamp() as u64, |n| n as u64)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs exam attempts against a question bank under an [`ExamPolicy`].
#[derive(Debug, Clone)]
pub struct ExamEngine {
    bank: Vec<Question>,
    policy: ExamPolicy,
}

impl ExamEngine {
    /// Engine over the standard ten-question bank.
    pub fn new(policy: ExamPolicy) -> Self {
        Self::with_bank(questions::standard_bank(), policy)
    }

    pub fn with_bank(bank: Vec<Question>, policy: ExamPolicy) -> Self {
        Self { bank, policy }
    }

    pub fn bank(&self) -> &[Question] {
        &self.bank
    }

    pub fn policy(&self) -> &ExamPolicy {
        &self.policy
    }

    pub fn max_score(&self) -> f64 {
        questions::max_score(&self.bank)
    }

    /// Check that `session` may sit the exam for `student_id` right now.
    ///
    /// Fails with `NotFound` for an unknown student and `AlreadyCompleted`
    /// if the student has a result. Reads no clock and writes nothing.
    pub fn check_eligible(
        &self,
        store: &mut dyn RecordStore,
        session: &Session,
        student_id: u32,
    ) -> Result<Student> {
        session.require(Capability::ConductExam(student_id))?;

        let (student, _) = store
            .find_by_id(student_id)?
            .ok_or(EntranceError::NotFound { id: student_id })?;
        if student.has_taken_exam {
            return Err(EntranceError::AlreadyCompleted {
                id: student_id,
                mark: student.mark,
            });
        }
        Ok(student)
    }

    /// Check eligibility and open an attempt for `student_id`.
    ///
    /// The clock starts here, so call this right before [`ExamEngine::run`].
    /// Nothing is written.
    pub fn start(
        &self,
        store: &mut dyn RecordStore,
        session: &Session,
        student_id: u32,
        clock: &dyn Clock,
        seed: Option<u64>,
    ) -> Result<ExamAttempt> {
        self.check_eligible(store, session, student_id)?;

        let started_at = clock.now();
        let attempt = ExamAttempt {
            student_id,
            order: presentation_order(self.bank.len(), seed.unwrap_or_else(time_seed)),
            started_at,
            deadline: started_at + self.policy.duration(),
            cursor: 0,
            tally: Tally::default(),
            state: AttemptState::InProgress,
            termination: None,
        };
        tracing::info!(
            "student {student_id} started the exam, deadline {}",
            attempt.deadline.format("%H:%M:%S")
        );
        Ok(attempt)
    }

    /// Ask the questions of an in-progress attempt.
    pub fn run(
        &self,
        attempt: &mut ExamAttempt,
        answers: &mut dyn AnswerSource,
        clock: &dyn Clock,
        observer: &dyn ExamObserver,
    ) -> Result<Termination> {
        if attempt.state != AttemptState::InProgress {
            return Err(EntranceError::Inconsistent(format!(
                "attempt for student {} is {:?}, not in progress",
                attempt.student_id, attempt.state
            )));
        }

        let total = attempt.order.len();
        while attempt.cursor < total {
            let now = clock.now();
            if now >= attempt.deadline {
                let unanswered = total - attempt.cursor;
                attempt.tally.unanswered += unanswered as u32;
                observer.on_time_up(unanswered);
                return Ok(Self::end(attempt, Termination::TimedOut));
            }

            let question = &self.bank[attempt.order[attempt.cursor]];
            let prompt = QuestionPrompt {
                number: attempt.cursor + 1,
                total,
                question,
                remaining: attempt.deadline - now,
            };
            observer.on_question(&prompt);

            // Invalid tokens re-prompt the same question.
            let choice = loop {
                let Some(token) = answers.next_answer(&prompt)? else {
                    let unanswered = total - attempt.cursor;
                    attempt.tally.unanswered += unanswered as u32;
                    observer.on_quit(unanswered);
                    return Ok(Self::end(attempt, Termination::Quit));
                };
                match parse_answer(&token) {
                    Some(choice) => break choice,
                    None => observer.on_invalid(&prompt, token.trim()),
                }
            };

            let outcome = attempt.tally.record(question, choice);
            observer.on_answer(&prompt, outcome);
            attempt.cursor += 1;
        }

        Ok(Self::end(attempt, Termination::AllAnswered))
    }

    fn end(attempt: &mut ExamAttempt, termination: Termination) -> Termination {
        attempt.state = match termination {
            Termination::TimedOut => AttemptState::TimedOut,
            Termination::AllAnswered | Termination::Quit => AttemptState::Completed,
        };
        attempt.termination = Some(termination);
        termination
    }

    /// Write the final score onto the student record and close the attempt.
    ///
    /// The record is located again because time has passed since `start`.
    pub fn finish(
        &self,
        store: &mut dyn RecordStore,
        attempt: ExamAttempt,
        clock: &dyn Clock,
    ) -> Result<ExamOutcome> {
        let termination = match (attempt.state, attempt.termination) {
            (AttemptState::Completed | AttemptState::TimedOut, Some(t)) => t,
            (state, _) => {
                return Err(EntranceError::Inconsistent(format!(
                    "cannot score attempt for student {} in state {state:?}",
                    attempt.student_id
                )))
            }
        };

        let id = attempt.student_id;
        let (mut student, pos) = store.find_by_id(id)?.ok_or_else(|| {
            EntranceError::Inconsistent(format!("student {id} disappeared during the exam"))
        })?;
        if student.has_taken_exam {
            return Err(EntranceError::Inconsistent(format!(
                "student {id} was scored by another attempt"
            )));
        }

        let score = attempt.tally.score(self.policy.negative_marking);
        student.mark = score;
        student.has_taken_exam = true;
        store.update_at(pos, &student)?;

        let outcome = ExamOutcome {
            student_id: id,
            score,
            max_score: self.max_score(),
            passed: score >= self.policy.pass_threshold,
            termination,
            tally: attempt.tally,
            started_at: attempt.started_at,
            finished_at: clock.now(),
        };
        tracing::info!(
            "student {id} scored {score:.2}/{:.2} ({:?}, {})",
            outcome.max_score,
            termination,
            if outcome.passed { "pass" } else { "fail" }
        );
        Ok(outcome)
    }

    /// Start, run, and score one attempt.
    #[allow(clippy::too_many_arguments)]
    pub fn take_exam(
        &self,
        store: &mut dyn RecordStore,
        session: &Session,
        student_id: u32,
        answers: &mut dyn AnswerSource,
        clock: &dyn Clock,
        observer: &dyn ExamObserver,
        seed: Option<u64>,
    ) -> Result<ExamOutcome> {
        let mut attempt = self.start(store, session, student_id, clock, seed)?;
        self.run(&mut attempt, answers, clock, observer)?;
        self.finish(store, attempt, clock)
    }
}
