//! The `entrance export`, `entrance backup`, and `entrance report` commands.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use entrance_core::session::Capability;
use entrance_core::store::RecordStore;
use entrance_report::backup::write_backup;
use entrance_report::csv::write_csv_export;
use entrance_report::summary::write_summary_report;
use entrance_report::timestamped_path;

use super::Context;

fn target(ctx: &Context, output: Option<PathBuf>, sub: &str, stem: &str, ext: &str) -> PathBuf {
    output.unwrap_or_else(|| {
        timestamped_path(&ctx.config.output_dir.join(sub), stem, ext, Local::now())
    })
}

pub fn csv(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    ctx.session.require(Capability::ViewReports)?;
    let students = ctx.open_store()?.students()?;
    let path = target(ctx, output, "backups", "student_data", "csv");
    write_csv_export(&students, &path)?;
    println!("Exported {} student(s) to: {}", students.len(), path.display());
    Ok(())
}

pub fn backup(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    ctx.session.require(Capability::ManageRecords)?;
    // Opening validates the header before copying.
    let store = ctx.open_store()?;
    let path = target(ctx, output, "backups", "student", "dat");
    let bytes = write_backup(store.path(), &path)?;
    println!("Backup written to: {} ({bytes} bytes)", path.display());
    Ok(())
}

pub fn report(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    ctx.session.require(Capability::ViewReports)?;
    let students = ctx.open_store()?.students()?;
    let path = target(ctx, output, "reports", "exam_report", "txt");
    write_summary_report(&students, ctx.pass_threshold(), &path)?;
    println!("Exam report written to: {}", path.display());
    Ok(())
}
