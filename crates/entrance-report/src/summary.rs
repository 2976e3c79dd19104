//! Plain-text exam summary report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use entrance_core::model::Student;
use entrance_core::statistics::{summarize, ExamSummary};

use crate::clip;

const RULE: &str = "===============================================";

fn push_summary(out: &mut String, s: &ExamSummary, pass_threshold: f64) {
    out.push_str("SUMMARY STATISTICS:\n");
    out.push_str("-------------------\n");
    out.push_str(&format!("Total Registered Students: {}\n", s.registered));
    out.push_str(&format!(
        "Students Who Took Exam: {} ({:.1}%)\n",
        s.examined,
        s.participation()
    ));
    out.push_str(&format!(
        "Students Who Passed (>={pass_threshold:.1}): {}\n",
        s.passed
    ));
    out.push_str(&format!("Pass Rate: {:.1}%\n", s.pass_rate));
    out.push_str(&format!("Average Score: {:.2}\n", s.average_mark));
    if let (Some(hi), Some(lo)) = (s.highest, s.lowest) {
        out.push_str(&format!("Highest Score: {hi:.2}\nLowest Score: {lo:.2}\n"));
    }
    out.push('\n');
}

/// Summary statistics followed by one line per examined student, in store order.
pub fn generate_summary_report(
    students: &[Student],
    pass_threshold: f64,
    generated_at: DateTime<Local>,
) -> String {
    let summary = summarize(students, pass_threshold);
    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\n       ENTRANCE EXAMINATION SYSTEM REPORT      \n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Report Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    push_summary(&mut out, &summary, pass_threshold);

    out.push_str("DETAILED RESULTS:\n");
    out.push_str("----------------\n");
    out.push_str(&format!(
        "{:<5} {:<30} {:<10} {:<10}\n",
        "ID", "Name", "Mark", "Status"
    ));
    out.push_str(&"-".repeat(56));
    out.push('\n');
    for s in students.iter().filter(|s| s.has_taken_exam) {
        out.push_str(&format!(
            "{:<5} {:<30} {:<10.2} {:<10}\n",
            s.id,
            clip(&s.name, 30),
            s.mark,
            if s.passed(pass_threshold) { "PASS" } else { "FAIL" }
        ));
    }
    out
}

/// Write the summary report to `path`.
pub fn write_summary_report(students: &[Student], pass_threshold: f64, path: &Path) -> Result<()> {
    let report = generate_summary_report(students, pass_threshold, Local::now());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, report).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("exam report written to {}", path.display());
    Ok(())
}
