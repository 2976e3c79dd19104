//! The `entrance search` and `entrance check-in` commands.

use anyhow::{bail, Result};

use entrance_core::session::Capability;
use entrance_core::{records, EntranceError};

use super::{print_student, student_table, Context};

pub fn execute(ctx: &Context, query: Option<String>, id: Option<u32>, fuzzy: bool) -> Result<()> {
    let mut store = ctx.open_store()?;

    if let Some(id) = id {
        let student = records::get(&mut store, &ctx.session, id)?;
        print_student(&student, ctx.pass_threshold());
        return Ok(());
    }

    let Some(query) = query else {
        bail!("give a name to search for, or --id");
    };
    ctx.session.require(Capability::ViewReports)?;
    let found = records::search_by_name(&mut store, &query, fuzzy)?;
    if found.is_empty() {
        println!("No students match \"{query}\".");
        if !fuzzy {
            println!("Try --fuzzy for a partial match.");
        }
        return Ok(());
    }
    println!("{}", student_table(&found, ctx.pass_threshold()));
    println!("{} match(es)", found.len());
    Ok(())
}

pub fn check_in(ctx: &Context, payload: &str) -> Result<()> {
    ctx.session.require(Capability::ViewReports)?;
    let mut store = ctx.open_store()?;
    let Some(student) = records::find_by_qr(&mut store, payload)? else {
        bail!("no student matches QR payload \"{}\"", payload.trim());
    };

    println!("Checked in: {} (ID {})", student.name, student.id);
    if student.has_taken_exam {
        let err = EntranceError::AlreadyCompleted {
            id: student.id,
            mark: student.mark,
        };
        println!("Note: {err}");
    } else {
        println!("Eligible to sit the exam: entrance exam {}", student.id);
    }
    tracing::info!("student {} checked in", student.id);
    Ok(())
}
