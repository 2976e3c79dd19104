//! Subcommand implementations.

pub mod admin;
pub mod exam;
pub mod export;
pub mod init;
pub mod list;
pub mod modify;
pub mod rankings;
pub mod register;
pub mod result;
pub mod search;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};

use entrance_core::config::EntranceConfig;
use entrance_core::{FileStore, Role, Session, Student};

/// Loaded configuration plus the caller's session.
pub struct Context {
    pub config: EntranceConfig,
    pub session: Session,
}

impl Context {
    pub fn new(config: EntranceConfig, role: Role) -> Self {
        Self {
            config,
            session: Session::new(role),
        }
    }

    pub fn open_store(&self) -> Result<FileStore> {
        FileStore::open_or_create(&self.config.data_file).with_context(|| {
            format!(
                "failed to open student store {}",
                self.config.data_file.display()
            )
        })
    }

    pub fn pass_threshold(&self) -> f64 {
        self.config.exam.pass_threshold
    }
}

pub(crate) fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Exam column text for a student.
pub(crate) fn exam_status(student: &Student, pass_threshold: f64) -> String {
    if !student.has_taken_exam {
        "not taken".into()
    } else if student.passed(pass_threshold) {
        format!("{:.2} PASS", student.mark)
    } else {
        format!("{:.2} FAIL", student.mark)
    }
}

pub(crate) fn student_table(students: &[Student], pass_threshold: f64) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Phone", "Email", "Guardian", "Exam", "Registered"]);
    for s in students {
        table.add_row(vec![
            Cell::new(s.id),
            Cell::new(&s.name),
            Cell::new(&s.phone),
            Cell::new(&s.email),
            Cell::new(&s.guardian_name),
            Cell::new(exam_status(s, pass_threshold)),
            Cell::new(local_date(s.registered_at)),
        ]);
    }
    table
}

/// Multi-line detail view of one student.
pub(crate) fn print_student(s: &Student, pass_threshold: f64) {
    println!("ID:             {}", s.id);
    println!("Name:           {}", s.name);
    println!("Date of birth:  {}", s.date_of_birth);
    println!("Address:        {}", s.address);
    println!("Phone:          {}", s.phone);
    println!("Email:          {}", s.email);
    println!("Guardian:       {} ({})", s.guardian_name, s.guardian_phone);
    println!("Registered:     {}", local_date(s.registered_at));
    println!("Exam:           {}", exam_status(s, pass_threshold));
    println!("QR payload:     {}", s.qr_code);
}
