//! Caller identity and capability checks.
//!
//! A [`Session`] is passed explicitly into every operation that needs
//! authorization; there is no process-wide "current user".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EntranceError, Result};

/// Who is operating the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Examiner,
    /// A student, bound to their own record id.
    Student(u32),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Examiner => write!(f, "examiner"),
            Role::Student(id) => write!(f, "student {id}"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts `admin`, `examiner`, or `student:<id>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "admin" => Ok(Role::Admin),
            "examiner" => Ok(Role::Examiner),
            other => match other.strip_prefix("student:") {
                Some(id) => id
                    .parse()
                    .map(Role::Student)
                    .map_err(|_| format!("invalid student id in role: {s}")),
                None => Err(format!("unknown role: {s}")),
            },
        }
    }
}

/// Something an operation needs the caller to be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Register and edit student records.
    ManageRecords,
    /// Clear or override a stored exam result.
    ResetExam,
    /// Run the exam for the given student.
    ConductExam(u32),
    /// Rankings, exports, summary reports.
    ViewReports,
    /// Look at one student's record and result.
    ViewResult(u32),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ManageRecords => write!(f, "manage student records"),
            Capability::ResetExam => write!(f, "reset exam results"),
            Capability::ConductExam(id) => write!(f, "conduct the exam for student {id}"),
            Capability::ViewReports => write!(f, "view reports"),
            Capability::ViewResult(id) => write!(f, "view the result of student {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    role: Role,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn can(&self, capability: Capability) -> bool {
        match (self.role, capability) {
            (Role::Admin, _) => true,
            (Role::Examiner, Capability::ConductExam(_))
            | (Role::Examiner, Capability::ViewReports)
            | (Role::Examiner, Capability::ViewResult(_)) => true,
            (Role::Examiner, _) => false,
            (Role::Student(own), Capability::ConductExam(id))
            | (Role::Student(own), Capability::ViewResult(id)) => own == id,
            (Role::Student(_), _) => false,
        }
    }

    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.can(capability) {
            Ok(())
        } else {
            tracing::warn!("{} may not {capability}", self.role);
            Err(EntranceError::PermissionDenied(format!(
                "{} may not {capability}",
                self.role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Examiner".parse::<Role>().unwrap(), Role::Examiner);
        assert_eq!("student:12".parse::<Role>().unwrap(), Role::Student(12));
        assert!("student:x".parse::<Role>().is_err());
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn admin_can_do_everything() {
        let s = Session::admin();
        assert!(s.can(Capability::ManageRecords));
        assert!(s.can(Capability::ResetExam));
        assert!(s.can(Capability::ConductExam(4)));
    }

    #[test]
    fn examiner_runs_exams_but_does_not_edit() {
        let s = Session::new(Role::Examiner);
        assert!(s.can(Capability::ConductExam(4)));
        assert!(s.can(Capability::ViewReports));
        assert!(!s.can(Capability::ManageRecords));
        assert!(!s.can(Capability::ResetExam));
    }

    #[test]
    fn student_only_touches_own_record() {
        let s = Session::new(Role::Student(3));
        assert!(s.can(Capability::ConductExam(3)));
        assert!(s.can(Capability::ViewResult(3)));
        assert!(!s.can(Capability::ConductExam(4)));
        assert!(!s.can(Capability::ViewResult(4)));
        assert!(!s.can(Capability::ViewReports));
        let err = s.require(Capability::ManageRecords).unwrap_err();
        assert_eq!(
            err.to_string(),
            "permission denied: student 3 may not manage student records"
        );
    }
}
