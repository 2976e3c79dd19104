//! The `entrance exam` command.

use anyhow::Result;

use entrance_core::exam::{ExamEngine, LineAnswers, SystemClock, Termination};

use super::Context;
use crate::console::ConsoleObserver;
use crate::prompt::confirm;

pub fn execute(ctx: &Context, id: u32, seed: Option<u64>, yes: bool) -> Result<()> {
    let policy = &ctx.config.exam;
    let engine = ExamEngine::new(policy.clone());
    let clock = SystemClock;
    let mut store = ctx.open_store()?;

    engine.check_eligible(&mut store, &ctx.session, id)?;

    println!("ENTRANCE EXAM");
    println!("  Questions:      {}", engine.bank().len());
    println!("  Time allowed:   {} minutes", policy.duration_minutes);
    println!("  Correct answer: +marks; wrong answer: -{} x marks", policy.negative_marking);
    println!("  Pass mark:      {:.2}", policy.pass_threshold);
    println!("  Answer A-D, or S to skip. Skipped questions are not revisited.");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    if !yes && !confirm(&mut input, "Start the exam now?")? {
        println!("Exam not started.");
        return Ok(());
    }

    let mut attempt = engine.start(&mut store, &ctx.session, id, &clock, seed)?;
    engine.run(
        &mut attempt,
        &mut LineAnswers::new(&mut input),
        &clock,
        &ConsoleObserver,
    )?;
    let outcome = engine.finish(&mut store, attempt, &clock)?;

    let t = &outcome.tally;
    println!();
    println!("EXAM COMPLETE");
    if outcome.termination == Termination::TimedOut {
        println!("  (time ran out)");
    }
    println!(
        "  Correct: {}  Wrong: {}  Skipped: {}  Not reached: {}",
        t.correct, t.wrong, t.skipped, t.unanswered
    );
    println!("  Score: {:.2} / {:.2}", outcome.score, outcome.max_score);
    println!("  Result: {}", if outcome.passed { "PASS" } else { "FAIL" });
    Ok(())
}
