//! The `entrance rankings` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use comfy_table::{Cell, Table};

use entrance_core::ranking::{self, RankingEntry};
use entrance_core::session::Capability;
use entrance_core::store::RecordStore;
use entrance_report::rankings::{write_rankings_report, RankingsFormat};
use entrance_report::timestamped_path;

use super::{local_date, Context};

fn ranking_table(entries: &[RankingEntry], pass_threshold: f64) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "ID", "Name", "Score", "Status", "Registered"]);
    for e in entries {
        table.add_row(vec![
            Cell::new(e.rank),
            Cell::new(e.id),
            Cell::new(&e.name),
            Cell::new(format!("{:.2}", e.mark)),
            Cell::new(if e.passed(pass_threshold) { "PASSED" } else { "FAILED" }),
            Cell::new(local_date(e.registered_at)),
        ]);
    }
    table
}

pub fn execute(
    ctx: &Context,
    page: usize,
    passed: bool,
    export: Option<RankingsFormat>,
    output: Option<PathBuf>,
) -> Result<()> {
    ctx.session.require(Capability::ViewReports)?;
    let threshold = ctx.pass_threshold();
    let mut store = ctx.open_store()?;
    let mut entries = ranking::rank(&store.students()?);
    if passed {
        entries = ranking::passed_only(&entries, threshold);
    }

    if let Some(format) = export {
        let path = output.unwrap_or_else(|| {
            timestamped_path(&ctx.config.output_dir, "rankings", format.extension(), Local::now())
        });
        write_rankings_report(&entries, threshold, format, &path)?;
        println!("Rankings saved to: {}", path.display());
        return Ok(());
    }

    if entries.is_empty() {
        println!("No students have taken the exam yet.");
        return Ok(());
    }

    let Some(page) = ranking::paginate(&entries, ctx.config.ranking.page_size, page) else {
        bail!("page {page} does not exist");
    };
    println!("{}", ranking_table(page.entries, threshold));
    println!(
        "Page {} of {} ({} student(s))",
        page.number,
        page.total_pages,
        entries.len()
    );
    if page.has_next() {
        println!("Next page: entrance rankings --page {}", page.number + 1);
    }
    Ok(())
}
