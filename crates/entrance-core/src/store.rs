//! The record store abstraction.
//!
//! [`RecordStore`] is the only way the rest of the system touches persisted
//! students. [`crate::file_store::FileStore`] is the flat-file
//! implementation; [`MemoryStore`] keeps records in memory behind an id
//! index and is used for tests and as a drop-in replacement.

use std::collections::HashMap;

use crate::codec::{HEADER_LEN, RECORD_SIZE};
use crate::error::{EntranceError, Result};
use crate::model::Student;

/// Byte offset of a record inside the store.
///
/// Only valid until the next write by another logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordPos(u64);

impl RecordPos {
    /// Position of the `index`-th record.
    pub fn of_index(index: u64) -> Self {
        Self(HEADER_LEN + index * RECORD_SIZE as u64)
    }

    /// Validate a raw byte offset. Returns `None` unless it sits on a record boundary.
    pub fn from_offset(offset: u64) -> Option<Self> {
        let rel = offset.checked_sub(HEADER_LEN)?;
        (rel % RECORD_SIZE as u64 == 0).then_some(Self(offset))
    }

    pub fn offset(self) -> u64 {
        self.0
    }

    pub fn index(self) -> u64 {
        (self.0 - HEADER_LEN) / RECORD_SIZE as u64
    }
}

/// Sequential store of fixed-size student records.
///
/// Single-threaded discipline: a position returned by [`find_by_id`] is only
/// safe to pass to [`update_at`] if no other write happened in between.
///
/// [`find_by_id`]: RecordStore::find_by_id
/// [`update_at`]: RecordStore::update_at
pub trait RecordStore {
    /// Write one record after the last one. The caller has checked the id.
    fn append(&mut self, student: &Student) -> Result<RecordPos>;

    /// Full forward scan; first record with a matching id and its position.
    fn find_by_id(&mut self, id: u32) -> Result<Option<(Student, RecordPos)>>;

    /// Overwrite the record at `pos` in place.
    fn update_at(&mut self, pos: RecordPos, student: &Student) -> Result<()>;

    /// Every record in store order. Each call starts again from the first record.
    fn scan_all(&mut self) -> Result<Box<dyn Iterator<Item = Result<Student>> + '_>>;

    /// Number of complete records.
    fn len(&mut self) -> Result<usize>;

    fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn exists_id(&mut self, id: u32) -> Result<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Append after checking the id is not taken.
    fn insert(&mut self, student: &Student) -> Result<RecordPos> {
        if self.exists_id(student.id)? {
            return Err(EntranceError::DuplicateKey { id: student.id });
        }
        self.append(student)
    }

    /// Snapshot of all records.
    fn students(&mut self) -> Result<Vec<Student>> {
        self.scan_all()?.collect()
    }
}

/// In-memory store with an id index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Student>,
    index: HashMap<u32, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a scan of another store, keeping the first record per id.
    pub fn load_from(source: &mut dyn RecordStore) -> Result<Self> {
        let mut store = Self::new();
        for student in source.scan_all()? {
            let student = student?;
            if !store.index.contains_key(&student.id) {
                store.append(&student)?;
            }
        }
        Ok(store)
    }
}

impl RecordStore for MemoryStore {
    fn append(&mut self, student: &Student) -> Result<RecordPos> {
        let index = self.records.len();
        self.index.entry(student.id).or_insert(index);
        self.records.push(student.clone());
        Ok(RecordPos::of_index(index as u64))
    }

    fn find_by_id(&mut self, id: u32) -> Result<Option<(Student, RecordPos)>> {
        Ok(self
            .index
            .get(&id)
            .map(|&i| (self.records[i].clone(), RecordPos::of_index(i as u64))))
    }

    fn update_at(&mut self, pos: RecordPos, student: &Student) -> Result<()> {
        let slot = self
            .records
            .get_mut(pos.index() as usize)
            .ok_or_else(|| EntranceError::Inconsistent(format!("no record at {pos:?}")))?;
        if slot.id != student.id {
            return Err(EntranceError::Inconsistent(format!(
                "record at {pos:?} is student {}, not {}",
                slot.id, student.id
            )));
        }
        *slot = student.clone();
        Ok(())
    }

    fn scan_all(&mut self) -> Result<Box<dyn Iterator<Item = Result<Student>> + '_>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }

    fn len(&mut self) -> Result<usize> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::NewStudent;
    use chrono::{TimeZone, Utc};

    pub(crate) fn student(id: u32, name: &str) -> Student {
        Student::register(
            NewStudent {
                id,
                name: name.into(),
                date_of_birth: "2007-01-01".into(),
                address: "Pokhara".into(),
                phone: "9800000000".into(),
                email: format!("{}@example.com", name.to_lowercase()),
                guardian_name: "Guardian".into(),
                guardian_phone: "9811111111".into(),
            },
            Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn record_pos_boundaries() {
        assert_eq!(RecordPos::of_index(0).offset(), HEADER_LEN);
        assert_eq!(RecordPos::of_index(3).index(), 3);
        assert!(RecordPos::from_offset(HEADER_LEN + RECORD_SIZE as u64).is_some());
        assert!(RecordPos::from_offset(HEADER_LEN + 1).is_none());
        assert!(RecordPos::from_offset(0).is_none());
    }

    #[test]
    fn memory_insert_rejects_duplicates() {
        let mut store = MemoryStore::new();
        store.insert(&student(1, "Bob")).unwrap();
        let err = store.insert(&student(1, "Other")).unwrap_err();
        assert!(matches!(err, EntranceError::DuplicateKey { id: 1 }));
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.find_by_id(1).unwrap().unwrap().0.name, "Bob");
    }

    #[test]
    fn memory_update_in_place() {
        let mut store = MemoryStore::new();
        store.insert(&student(1, "Bob")).unwrap();
        store.insert(&student(2, "Amy")).unwrap();
        let (mut s, pos) = store.find_by_id(2).unwrap().unwrap();
        s.mark = 7.0;
        s.has_taken_exam = true;
        store.update_at(pos, &s).unwrap();
        assert_eq!(store.find_by_id(2).unwrap().unwrap().0, s);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn memory_update_checks_identity() {
        let mut store = MemoryStore::new();
        store.insert(&student(1, "Bob")).unwrap();
        let (_, pos) = store.find_by_id(1).unwrap().unwrap();
        let err = store.update_at(pos, &student(9, "Zed")).unwrap_err();
        assert!(matches!(err, EntranceError::Inconsistent(_)));
        let err = store
            .update_at(RecordPos::of_index(5), &student(1, "Bob"))
            .unwrap_err();
        assert!(matches!(err, EntranceError::Inconsistent(_)));
    }

    #[test]
    fn scan_is_restartable() {
        let mut store = MemoryStore::new();
        store.insert(&student(3, "C")).unwrap();
        store.insert(&student(1, "A")).unwrap();
        let first: Vec<u32> = store.students().unwrap().iter().map(|s| s.id).collect();
        let second: Vec<u32> = store.students().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(first, vec![3, 1]);
        assert_eq!(first, second);
    }
}
