//! Core data model types for entrance.
//!
//! These are the student records persisted by the store and the input
//! shapes used to create or change them.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A registered student as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique key chosen by the registrant.
    pub id: u32,
    pub name: String,
    /// Free text, never parsed as a date.
    pub date_of_birth: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    /// Exam score; only meaningful once `has_taken_exam` is set.
    pub mark: f64,
    pub has_taken_exam: bool,
    /// Set once at registration, whole seconds.
    pub registered_at: DateTime<Utc>,
    /// Check-in payload, see [`qr_payload`].
    #[serde(default)]
    pub qr_code: String,
}

impl Student {
    /// Build a fresh, not-yet-examined record from registration input.
    pub fn register(input: NewStudent, now: DateTime<Utc>) -> Self {
        let qr_code = qr_payload(input.id, &input.name);
        Self {
            id: input.id,
            name: input.name,
            date_of_birth: input.date_of_birth,
            address: input.address,
            phone: input.phone,
            email: input.email,
            guardian_name: input.guardian_name,
            guardian_phone: input.guardian_phone,
            mark: 0.0,
            has_taken_exam: false,
            registered_at: now.trunc_subsecs(0),
            qr_code,
        }
    }

    /// Whether the stored mark meets the given pass threshold.
    pub fn passed(&self, pass_threshold: f64) -> bool {
        self.has_taken_exam && self.mark >= pass_threshold
    }
}

/// Derived check-in string. Plain concatenation, not a real QR encoding.
pub fn qr_payload(id: u32, name: &str) -> String {
    format!("STUDENT_{id}_{name}")
}

/// Registration input for a new student.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    pub id: u32,
    pub name: String,
    pub date_of_birth: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub guardian_name: String,
    pub guardian_phone: String,
}

/// A partial update to a student's contact details.
///
/// `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

impl StudentChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_of_birth.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.guardian_name.is_none()
            && self.guardian_phone.is_none()
    }

    /// Apply the changes to `student`, re-deriving the QR payload on rename.
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.qr_code = qr_payload(student.id, &name);
            student.name = name;
        }
        if let Some(v) = self.date_of_birth {
            student.date_of_birth = v;
        }
        if let Some(v) = self.address {
            student.address = v;
        }
        if let Some(v) = self.phone {
            student.phone = v;
        }
        if let Some(v) = self.email {
            student.email = v;
        }
        if let Some(v) = self.guardian_name {
            student.guardian_name = v;
        }
        if let Some(v) = self.guardian_phone {
            student.guardian_phone = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input() -> NewStudent {
        NewStudent {
            id: 12,
            name: "Sita Rai".into(),
            email: "sita@example.com".into(),
            phone: "9841000000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn register_sets_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let s = Student::register(input(), now);
        assert_eq!(s.mark, 0.0);
        assert!(!s.has_taken_exam);
        assert_eq!(s.registered_at, now);
        assert_eq!(s.qr_code, "STUDENT_12_Sita Rai");
    }

    #[test]
    fn rename_rederives_qr() {
        let mut s = Student::register(input(), Utc::now());
        let changes = StudentChanges {
            name: Some("Sita K. Rai".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply(&mut s);
        assert_eq!(s.name, "Sita K. Rai");
        assert_eq!(s.qr_code, "STUDENT_12_Sita K. Rai");
    }

    #[test]
    fn passed_requires_exam() {
        let mut s = Student::register(input(), Utc::now());
        s.mark = 5.0;
        assert!(!s.passed(3.0));
        s.has_taken_exam = true;
        assert!(s.passed(3.0));
        s.mark = 2.9;
        assert!(!s.passed(3.0));
    }
}
