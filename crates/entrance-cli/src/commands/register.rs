//! The `entrance register` command.

use std::io::BufRead;

use anyhow::Result;
use chrono::Utc;

use entrance_core::session::Capability;
use entrance_core::store::RecordStore;
use entrance_core::codec::{ADDRESS_WIDTH, DOB_WIDTH, EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH};
use entrance_core::validate::{check_email, check_phone, check_width, parse_id};
use entrance_core::{records, EntranceError, NewStudent, ValidationError};

use super::Context;
use crate::prompt::ask_valid;

/// Values given on the command line; `None` fields are prompted for.
#[derive(Default)]
pub struct Fields {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

/// Accepts any text that fits in `width` bytes; `required` also rejects a blank line.
fn text(
    field: &'static str,
    width: usize,
    required: bool,
) -> impl Fn(&str) -> Result<String, ValidationError> {
    move |s| {
        if required && s.is_empty() {
            return Err(ValidationError::Empty(field));
        }
        check_width(field, s, width)?;
        Ok(s.to_string())
    }
}

fn valid(
    field: &'static str,
    width: usize,
    check: fn(&str) -> Result<(), ValidationError>,
) -> impl Fn(&str) -> Result<String, ValidationError> {
    move |s| {
        check(s)?;
        check_width(field, s, width)?;
        Ok(s.to_string())
    }
}

fn fill(fields: Fields, input: &mut dyn BufRead) -> Result<NewStudent> {
    let id = match fields.id {
        Some(id) => id,
        None => ask_valid(input, "Student ID: ", parse_id)?,
    };
    let name = match fields.name {
        Some(v) => v,
        None => ask_valid(input, "Full name: ", text("name", NAME_WIDTH, true))?,
    };
    let date_of_birth = match fields.dob {
        Some(v) => v,
        None => ask_valid(input, "Date of birth: ", text("date of birth", DOB_WIDTH, false))?,
    };
    let address = match fields.address {
        Some(v) => v,
        None => ask_valid(input, "Address: ", text("address", ADDRESS_WIDTH, false))?,
    };
    let phone = match fields.phone {
        Some(v) => v,
        None => ask_valid(input, "Phone: ", valid("phone", PHONE_WIDTH, check_phone))?,
    };
    let email = match fields.email {
        Some(v) => v,
        None => ask_valid(input, "Email: ", valid("email", EMAIL_WIDTH, check_email))?,
    };
    let guardian_name = match fields.guardian_name {
        Some(v) => v,
        None => ask_valid(
            input,
            "Guardian name: ",
            text("guardian name", NAME_WIDTH, false),
        )?,
    };
    let guardian_phone = match fields.guardian_phone {
        Some(v) => v,
        None => ask_valid(
            input,
            "Guardian phone: ",
            valid("guardian phone", PHONE_WIDTH, check_phone),
        )?,
    };

    Ok(NewStudent {
        id,
        name,
        date_of_birth,
        address,
        phone,
        email,
        guardian_name,
        guardian_phone,
    })
}

pub fn execute(ctx: &Context, fields: Fields) -> Result<()> {
    ctx.session.require(Capability::ManageRecords)?;
    let mut store = ctx.open_store()?;
    // Fail before prompting for the rest if the id is already taken.
    if let Some(id) = fields.id {
        if store.exists_id(id)? {
            return Err(EntranceError::DuplicateKey { id }.into());
        }
    }

    let stdin = std::io::stdin();
    let input = fill(fields, &mut stdin.lock())?;
    let student = records::register(&mut store, &ctx.session, input, Utc::now())?;

    println!("Registered student {} ({})", student.id, student.name);
    println!("QR payload: {}", student.qr_code);
    Ok(())
}
