//! Record-level operations: registration, edits, lookups, and the
//! privileged exam result corrections.
//!
//! Every operation takes the caller's [`Session`] and checks it before
//! touching the store.

use chrono::{DateTime, Utc};

use crate::error::{EntranceError, Result, ValidationError};
use crate::model::{NewStudent, Student, StudentChanges};
use crate::ranking;
use crate::session::{Capability, Session};
use crate::store::RecordStore;
use crate::validate;

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field).into());
    }
    Ok(())
}

/// Register a new student, stamped with `now`.
pub fn register(
    store: &mut dyn RecordStore,
    session: &Session,
    input: NewStudent,
    now: DateTime<Utc>,
) -> Result<Student> {
    session.require(Capability::ManageRecords)?;
    require_text("name", &input.name)?;
    validate::check_phone(&input.phone)?;
    validate::check_email(&input.email)?;
    if !input.guardian_phone.is_empty() {
        validate::check_phone(&input.guardian_phone)?;
    }

    let student = Student::register(input, now);
    store.insert(&student)?;
    tracing::info!("registered student {} ({})", student.id, student.name);
    Ok(student)
}

/// Apply `changes` to an existing student and rewrite it in place.
pub fn modify(
    store: &mut dyn RecordStore,
    session: &Session,
    id: u32,
    changes: StudentChanges,
) -> Result<Student> {
    session.require(Capability::ManageRecords)?;
    if let Some(name) = &changes.name {
        require_text("name", name)?;
    }
    if let Some(phone) = &changes.phone {
        validate::check_phone(phone)?;
    }
    if let Some(email) = &changes.email {
        validate::check_email(email)?;
    }
    if let Some(phone) = changes.guardian_phone.as_deref().filter(|p| !p.is_empty()) {
        validate::check_phone(phone)?;
    }

    let (mut student, pos) = store
        .find_by_id(id)?
        .ok_or(EntranceError::NotFound { id })?;
    if changes.is_empty() {
        return Ok(student);
    }
    changes.apply(&mut student);
    store.update_at(pos, &student)?;
    tracing::info!("updated student {id}");
    Ok(student)
}

/// Clear a student's exam result so they can sit it again.
pub fn reset_exam(store: &mut dyn RecordStore, session: &Session, id: u32) -> Result<Student> {
    session.require(Capability::ResetExam)?;
    let (mut student, pos) = store
        .find_by_id(id)?
        .ok_or(EntranceError::NotFound { id })?;
    let previous = student.mark;
    student.has_taken_exam = false;
    student.mark = 0.0;
    store.update_at(pos, &student)?;
    tracing::warn!("exam result of student {id} reset (was {previous:.2})");
    Ok(student)
}

/// Replace the mark of a student who has already taken the exam.
///
/// `mark` must be finite and within `[-max_score * negative_marking, max_score]`.
pub fn override_mark(
    store: &mut dyn RecordStore,
    session: &Session,
    id: u32,
    mark: f64,
    max_score: f64,
    negative_marking: f64,
) -> Result<Student> {
    session.require(Capability::ResetExam)?;
    let floor = -max_score * negative_marking;
    if !mark.is_finite() || mark < floor || mark > max_score {
        return Err(ValidationError::Mark(format!(
            "{mark} (must be between {floor:.2} and {max_score:.2})"
        ))
        .into());
    }

    let (mut student, pos) = store
        .find_by_id(id)?
        .ok_or(EntranceError::NotFound { id })?;
    if !student.has_taken_exam {
        return Err(EntranceError::Inconsistent(format!(
            "student {id} has not taken the exam"
        )));
    }
    let previous = student.mark;
    student.mark = mark;
    store.update_at(pos, &student)?;
    tracing::warn!("mark of student {id} changed from {previous:.2} to {mark:.2}");
    Ok(student)
}

/// Look up one student on behalf of `session`.
pub fn get(store: &mut dyn RecordStore, session: &Session, id: u32) -> Result<Student> {
    session.require(Capability::ViewResult(id))?;
    store
        .find_by_id(id)?
        .map(|(s, _)| s)
        .ok_or(EntranceError::NotFound { id })
}

/// A student's own result with their place among examined students.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentResult {
    pub student: Student,
    /// `None` until the exam is taken.
    pub rank: Option<usize>,
    pub examined: usize,
}

pub fn result(store: &mut dyn RecordStore, session: &Session, id: u32) -> Result<StudentResult> {
    session.require(Capability::ViewResult(id))?;
    let students = store.students()?;
    let student = students
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or(EntranceError::NotFound { id })?;
    let ranked = ranking::rank(&students);
    Ok(StudentResult {
        rank: ranking::position_of(&ranked, id),
        examined: ranked.len(),
        student,
    })
}

/// True if every character of `needle` appears in `haystack` in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}

/// Students whose name matches `query`, ignoring case.
///
/// Exact matches only unless `fuzzy` is set, in which case the query letters
/// need only appear in order (`"rsh"` finds `"Ram Sharma"`).
pub fn search_by_name(store: &mut dyn RecordStore, query: &str, fuzzy: bool) -> Result<Vec<Student>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for student in store.scan_all()? {
        let student = student?;
        let name = student.name.to_lowercase();
        let hit = if fuzzy {
            is_subsequence(&query, &name)
        } else {
            name == query
        };
        if hit {
            found.push(student);
        }
    }
    tracing::debug!("name search {query:?} matched {} students", found.len());
    Ok(found)
}

/// Check-in lookup by QR payload.
pub fn find_by_qr(store: &mut dyn RecordStore, payload: &str) -> Result<Option<Student>> {
    let payload = payload.trim();
    for student in store.scan_all()? {
        let student = student?;
        if student.qr_code == payload {
            return Ok(Some(student));
        }
    }
    Ok(None)
}
