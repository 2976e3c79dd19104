//! The `entrance result` command.

use anyhow::Result;

use entrance_core::records;

use super::{local_date, Context};

pub fn execute(ctx: &Context, id: u32) -> Result<()> {
    let mut store = ctx.open_store()?;
    let result = records::result(&mut store, &ctx.session, id)?;
    let s = &result.student;

    println!("Student:  {} (ID {})", s.name, s.id);
    println!("Registered: {}", local_date(s.registered_at));
    if !s.has_taken_exam {
        println!("Exam:     not taken yet");
        return Ok(());
    }

    let threshold = ctx.pass_threshold();
    println!("Mark:     {:.2}", s.mark);
    println!(
        "Status:   {}",
        if s.passed(threshold) { "PASSED" } else { "FAILED" }
    );
    if let Some(rank) = result.rank {
        println!("Rank:     {rank} of {}", result.examined);
    }
    Ok(())
}
