//! The `entrance list` command.

use anyhow::Result;

use entrance_core::session::Capability;
use entrance_core::store::RecordStore;

use super::{student_table, Context};

pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    ctx.session.require(Capability::ViewReports)?;
    let mut store = ctx.open_store()?;
    let students = store.students()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&students)?);
        return Ok(());
    }

    if students.is_empty() {
        println!("No students registered. Run `entrance register` to add one.");
        return Ok(());
    }

    println!("{}", student_table(&students, ctx.pass_threshold()));
    println!("{} student(s)", students.len());
    Ok(())
}
