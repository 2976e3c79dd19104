//! Fixed-width binary layout of a student record.
//!
//! Every record occupies exactly [`RECORD_SIZE`] bytes so the store can seek
//! straight to `HEADER_LEN + index * RECORD_SIZE`. Integers and floats are
//! little-endian; text is UTF-8 padded with zero bytes to its field width.

use chrono::DateTime;

use crate::error::{EntranceError, Result, ValidationError};
use crate::model::Student;

/// Magic bytes and format version at the start of every store file.
pub const HEADER: [u8; 8] = *b"ENTRSTU\x01";
pub const HEADER_LEN: u64 = HEADER.len() as u64;

pub const NAME_WIDTH: usize = 100;
pub const DOB_WIDTH: usize = 20;
pub const ADDRESS_WIDTH: usize = 50;
pub const PHONE_WIDTH: usize = 20;
pub const EMAIL_WIDTH: usize = 100;
pub const QR_WIDTH: usize = 256;

/// Size in bytes of one encoded record.
pub const RECORD_SIZE: usize = 4 // id
    + NAME_WIDTH
    + DOB_WIDTH
    + ADDRESS_WIDTH
    + PHONE_WIDTH
    + EMAIL_WIDTH
    + NAME_WIDTH // guardian name
    + PHONE_WIDTH // guardian phone
    + 8 // mark
    + 1 // has_taken_exam
    + 8 // registered_at
    + QR_WIDTH;

struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    fn new() -> Self {
        Self {
            buf: Vec::with_capacity(RECORD_SIZE),
        }
    }

    fn text(&mut self, field: &'static str, value: &str, width: usize) -> Result<()> {
        if value.len() > width {
            return Err(EntranceError::FieldTooLong {
                field,
                len: value.len(),
                max: width,
            });
        }
        if value.contains('\0') {
            return Err(ValidationError::Nul(field).into());
        }
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.resize(self.buf.len() + width - value.len(), 0);
        Ok(())
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }
}

struct RecordReader<'a> {
    buf: &'a [u8],
    at: usize,
}

impl<'a> RecordReader<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.buf[self.at..self.at + n];
        self.at += n;
        slice
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N));
        out
    }

    fn text(&mut self, field: &'static str, width: usize) -> Result<String> {
        let raw = self.take(width);
        let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
        String::from_utf8(raw[..end].to_vec())
            .map_err(|_| EntranceError::Corrupt(format!("{field} is not valid UTF-8")))
    }
}

/// Encode a student into exactly [`RECORD_SIZE`] bytes.
pub fn encode(student: &Student) -> Result<Vec<u8>> {
    let mut w = RecordWriter::new();
    w.bytes(&student.id.to_le_bytes());
    w.text("name", &student.name, NAME_WIDTH)?;
    w.text("date of birth", &student.date_of_birth, DOB_WIDTH)?;
    w.text("address", &student.address, ADDRESS_WIDTH)?;
    w.text("phone", &student.phone, PHONE_WIDTH)?;
    w.text("email", &student.email, EMAIL_WIDTH)?;
    w.text("guardian name", &student.guardian_name, NAME_WIDTH)?;
    w.text("guardian phone", &student.guardian_phone, PHONE_WIDTH)?;
    w.bytes(&student.mark.to_le_bytes());
    w.bytes(&[u8::from(student.has_taken_exam)]);
    w.bytes(&student.registered_at.timestamp().to_le_bytes());
    w.text("qr code", &student.qr_code, QR_WIDTH)?;
    debug_assert_eq!(w.buf.len(), RECORD_SIZE);
    Ok(w.buf)
}

/// Decode one record. `buf` must be exactly [`RECORD_SIZE`] bytes long.
pub fn decode(buf: &[u8]) -> Result<Student> {
    if buf.len() != RECORD_SIZE {
        return Err(EntranceError::Corrupt(format!(
            "record is {} bytes, expected {RECORD_SIZE}",
            buf.len()
        )));
    }
    let mut r = RecordReader { buf, at: 0 };
    let id = u32::from_le_bytes(r.array());
    let name = r.text("name", NAME_WIDTH)?;
    let date_of_birth = r.text("date of birth", DOB_WIDTH)?;
    let address = r.text("address", ADDRESS_WIDTH)?;
    let phone = r.text("phone", PHONE_WIDTH)?;
    let email = r.text("email", EMAIL_WIDTH)?;
    let guardian_name = r.text("guardian name", NAME_WIDTH)?;
    let guardian_phone = r.text("guardian phone", PHONE_WIDTH)?;
    let mark = f64::from_le_bytes(r.array());
    if !mark.is_finite() {
        return Err(EntranceError::Corrupt(format!("student {id}: mark {mark}")));
    }
    let has_taken_exam = match r.array::<1>()[0] {
        0 => false,
        1 => true,
        other => {
            return Err(EntranceError::Corrupt(format!(
                "student {id}: exam flag byte {other}"
            )))
        }
    };
    let secs = i64::from_le_bytes(r.array());
    let registered_at = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| EntranceError::Corrupt(format!("student {id}: timestamp {secs}")))?;
    let qr_code = r.text("qr code", QR_WIDTH)?;

    Ok(Student {
        id,
        name,
        date_of_birth,
        address,
        phone,
        email,
        guardian_name,
        guardian_phone,
        mark,
        has_taken_exam,
        registered_at,
        qr_code,
    })
}
