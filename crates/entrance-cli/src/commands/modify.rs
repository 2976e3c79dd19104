//! The `entrance modify` command.

use std::io::BufRead;

use anyhow::Result;

use entrance_core::session::Capability;
use entrance_core::store::RecordStore;
use entrance_core::codec::{ADDRESS_WIDTH, DOB_WIDTH, EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH};
use entrance_core::validate::{check_email, check_phone, check_width};
use entrance_core::{records, EntranceError, Student, StudentChanges, ValidationError};

use super::Context;
use crate::prompt::ask_valid;

/// Prompt for every field, showing the current value; a blank line keeps it.
fn prompt_changes(current: &Student, input: &mut dyn BufRead) -> Result<StudentChanges> {
    fn keep_or<'a>(
        current: &'a str,
        field: &'static str,
        width: usize,
        check: Option<fn(&str) -> Result<(), ValidationError>>,
    ) -> impl Fn(&str) -> Result<Option<String>, ValidationError> + 'a {
        move |s| {
            if s.is_empty() || s == current {
                return Ok(None);
            }
            if let Some(check) = check {
                check(s)?;
            }
            check_width(field, s, width)?;
            Ok(Some(s.to_string()))
        }
    }

    let mut field = |label: &str,
                     name: &'static str,
                     value: &str,
                     width: usize,
                     check: Option<fn(&str) -> Result<(), ValidationError>>|
     -> Result<Option<String>> {
        ask_valid(
            input,
            &format!("{label} [{value}]: "),
            keep_or(value, name, width, check),
        )
    };

    Ok(StudentChanges {
        name: field("Name", "name", &current.name, NAME_WIDTH, None)?,
        date_of_birth: field(
            "Date of birth",
            "date of birth",
            &current.date_of_birth,
            DOB_WIDTH,
            None,
        )?,
        address: field("Address", "address", &current.address, ADDRESS_WIDTH, None)?,
        phone: field("Phone", "phone", &current.phone, PHONE_WIDTH, Some(check_phone))?,
        email: field("Email", "email", &current.email, EMAIL_WIDTH, Some(check_email))?,
        guardian_name: field(
            "Guardian name",
            "guardian name",
            &current.guardian_name,
            NAME_WIDTH,
            None,
        )?,
        guardian_phone: field(
            "Guardian phone",
            "guardian phone",
            &current.guardian_phone,
            PHONE_WIDTH,
            Some(check_phone),
        )?,
    })
}

pub fn execute(ctx: &Context, id: u32, changes: StudentChanges) -> Result<()> {
    ctx.session.require(Capability::ManageRecords)?;
    let mut store = ctx.open_store()?;

    let changes = if changes.is_empty() {
        let (current, _) = store
            .find_by_id(id)?
            .ok_or(EntranceError::NotFound { id })?;
        println!("Editing student {id}. Press Enter to keep a value.");
        let stdin = std::io::stdin();
        let changes = prompt_changes(&current, &mut stdin.lock())?;
        if changes.is_empty() {
            println!("No changes.");
            return Ok(());
        }
        changes
    } else {
        changes
    };

    let student = records::modify(&mut store, &ctx.session, id, changes)?;
    println!("Updated student {} ({})", student.id, student.name);
    Ok(())
}
