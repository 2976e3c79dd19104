//! Summary statistics over the student population.

use serde::{Deserialize, Serialize};

use crate::model::Student;

/// Headline numbers for the exam report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub registered: usize,
    pub examined: usize,
    pub passed: usize,
    /// Percent of examined students who passed; 0 when nobody sat the exam.
    pub pass_rate: f64,
    /// Mean mark of examined students; 0 when nobody sat the exam.
    pub average_mark: f64,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
}

impl ExamSummary {
    /// Percent of registered students who sat the exam.
    pub fn participation(&self) -> f64 {
        percent(self.examined, self.registered)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

pub fn summarize(students: &[Student], pass_threshold: f64) -> ExamSummary {
    let marks: Vec<f64> = students
        .iter()
        .filter(|s| s.has_taken_exam)
        .map(|s| s.mark)
        .collect();
    let passed = marks.iter().filter(|&&m| m >= pass_threshold).count();
    let average_mark = if marks.is_empty() {
        0.0
    } else {
        marks.iter().sum::<f64>() / marks.len() as f64
    };

    ExamSummary {
        registered: students.len(),
        examined: marks.len(),
        passed,
        pass_rate: percent(passed, marks.len()),
        average_mark,
        highest: marks.iter().copied().reduce(f64::max),
        lowest: marks.iter().copied().reduce(f64::min),
    }
}
