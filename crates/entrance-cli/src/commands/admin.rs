//! Privileged result corrections: `reset-exam` and `set-mark`.

use anyhow::Result;

use entrance_core::exam::ExamEngine;
use entrance_core::records;
use entrance_core::session::Capability;

use super::Context;
use crate::prompt::confirm;

pub fn reset_exam(ctx: &Context, id: u32, yes: bool) -> Result<()> {
    ctx.session.require(Capability::ResetExam)?;
    if !yes {
        let stdin = std::io::stdin();
        let question = format!("Clear the exam result of student {id}?");
        if !confirm(&mut stdin.lock(), &question)? {
            println!("Nothing changed.");
            return Ok(());
        }
    }
    let mut store = ctx.open_store()?;
    let student = records::reset_exam(&mut store, &ctx.session, id)?;
    println!(
        "Exam result of student {} ({}) cleared; they may sit the exam again.",
        student.id, student.name
    );
    Ok(())
}

pub fn set_mark(ctx: &Context, id: u32, mark: f64) -> Result<()> {
    let engine = ExamEngine::new(ctx.config.exam.clone());
    let mut store = ctx.open_store()?;
    let student = records::override_mark(
        &mut store,
        &ctx.session,
        id,
        mark,
        engine.max_score(),
        engine.policy().negative_marking,
    )?;
    println!(
        "Mark of student {} ({}) set to {:.2}",
        student.id, student.name, student.mark
    );
    Ok(())
}
