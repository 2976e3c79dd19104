//! Merit ranking of examined students.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Student;

/// One row of the merit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position. Tied marks still get distinct ranks.
    pub rank: usize,
    pub id: u32,
    pub name: String,
    pub mark: f64,
    pub registered_at: DateTime<Utc>,
}

impl RankingEntry {
    pub fn passed(&self, pass_threshold: f64) -> bool {
        self.mark >= pass_threshold
    }
}

fn merit_order(a: &Student, b: &Student) -> Ordering {
    b.mark
        .total_cmp(&a.mark)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Rank every student who has taken the exam.
///
/// Highest mark first; equal marks by case-insensitive name, then id.
pub fn rank(students: &[Student]) -> Vec<RankingEntry> {
    let mut examined: Vec<&Student> = students.iter().filter(|s| s.has_taken_exam).collect();
    examined.sort_by(|a, b| merit_order(a, b));
    examined
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankingEntry {
            rank: i + 1,
            id: s.id,
            name: s.name.clone(),
            mark: s.mark,
            registered_at: s.registered_at,
        })
        .collect()
}

/// Entries at or above the pass threshold, keeping their overall rank.
pub fn passed_only(entries: &[RankingEntry], pass_threshold: f64) -> Vec<RankingEntry> {
    entries
        .iter()
        .filter(|e| e.passed(pass_threshold))
        .cloned()
        .collect()
}

/// Rank of `id` in the list, if it was examined.
pub fn position_of(entries: &[RankingEntry], id: u32) -> Option<usize> {
    entries.iter().find(|e| e.id == id).map(|e| e.rank)
}

/// A slice of the ranking for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    pub total_pages: usize,
    pub entries: &'a [RankingEntry],
}

impl Page<'_> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Page `page` (1-based) of `entries`, or `None` past the end.
///
/// An empty list still has a single empty first page.
pub fn paginate(entries: &[RankingEntry], page_size: usize, page: usize) -> Option<Page<'_>> {
    let page_size = page_size.max(1);
    let total_pages = entries.len().div_ceil(page_size).max(1);
    if page == 0 || page > total_pages {
        return None;
    }
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(entries.len());
    Some(Page {
        number: page,
        total_pages,
        entries: &entries[start..end],
    })
}
