//! Terminal presentation of an exam attempt.

use std::io::Write;

use entrance_core::exam::{AnswerOutcome, ExamObserver, QuestionPrompt};
use entrance_core::questions::OPTION_LABELS;

/// Prints questions and feedback to stdout.
pub struct ConsoleObserver;

fn flush() {
    // Nothing useful to do if the terminal is gone.
    let _ = std::io::stdout().flush();
}

fn mm_ss(d: chrono::Duration) -> String {
    let secs = d.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

impl ExamObserver for ConsoleObserver {
    fn on_question(&self, prompt: &QuestionPrompt<'_>) {
        let q = prompt.question;
        println!();
        println!(
            "Question {}/{} [{}] ({} left)",
            prompt.number,
            prompt.total,
            q.category,
            mm_ss(prompt.remaining)
        );
        println!("{}", q.text);
        for (label, option) in OPTION_LABELS.iter().zip(&q.options) {
            println!("  {label}) {option}");
        }
        print!("Your answer (A-D, S to skip): ");
        flush();
    }

    fn on_answer(&self, _: &QuestionPrompt<'_>, outcome: AnswerOutcome) {
        match outcome {
            AnswerOutcome::Correct => println!("Correct!"),
            AnswerOutcome::Wrong { correct } => {
                println!("Wrong. The correct answer was {correct}.")
            }
            AnswerOutcome::Skipped => println!("Skipped."),
        }
    }

    fn on_invalid(&self, _: &QuestionPrompt<'_>, token: &str) {
        print!("Invalid choice '{token}'. Enter A, B, C, D or S: ");
        flush();
    }

    fn on_time_up(&self, unanswered: usize) {
        println!();
        println!("Time is up! {unanswered} question(s) left unanswered.");
    }

    fn on_quit(&self, unanswered: usize) {
        println!();
        println!("Input ended; {unanswered} remaining question(s) counted as skipped.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_format() {
        assert_eq!(mm_ss(chrono::Duration::seconds(1199)), "19:59");
        assert_eq!(mm_ss(chrono::Duration::seconds(-5)), "00:00");
    }
}
