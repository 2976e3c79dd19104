//! CSV export of every student record.

use std::path::Path;

use anyhow::{Context, Result};

use entrance_core::model::Student;

pub const CSV_HEADER: &str =
    "ID,Name,DOB,Address,Phone,Email,GuardianName,GuardianPhone,HasTakenExam,Mark,RegistrationDate";

/// Double-quote a text field, doubling any embedded quotes.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn row(s: &Student) -> String {
    [
        s.id.to_string(),
        quoted(&s.name),
        quoted(&s.date_of_birth),
        quoted(&s.address),
        quoted(&s.phone),
        quoted(&s.email),
        quoted(&s.guardian_name),
        quoted(&s.guardian_phone),
        u8::from(s.has_taken_exam).to_string(),
        format!("{:.2}", s.mark),
        quoted(&s.registered_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ]
    .join(",")
}

/// Render students as CSV, header first, in store order.
pub fn generate_csv(students: &[Student]) -> String {
    let mut out = String::with_capacity(128 * (students.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for s in students {
        out.push_str(&row(s));
        out.push('\n');
    }
    out
}

/// Write the CSV export to `path`, creating parent directories.
pub fn write_csv_export(students: &[Student], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, generate_csv(students))
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("exported {} students to {}", students.len(), path.display());
    Ok(())
}
