//! Flat-file record store.
//!
//! Layout: an 8-byte header followed by fixed-size records. Lookups are a
//! full linear scan, updates seek to the record's offset and overwrite it.
//! There is no journal: a write interrupted half-way can leave a damaged
//! record behind.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, HEADER, HEADER_LEN, RECORD_SIZE};
use crate::error::{EntranceError, Result};
use crate::model::Student;
use crate::store::{RecordPos, RecordStore};

/// A student store backed by a single file.
#[derive(Debug)]
pub struct FileStore {
    file: File,
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, creating it (and its directory) if absent.
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&HEADER)?;
            file.flush()?;
            tracing::info!("created student store at {}", path.display());
        } else {
            let mut header = [0u8; HEADER.len()];
            if len < HEADER_LEN {
                return Err(EntranceError::Corrupt(format!(
                    "{} is too short to be a student store",
                    path.display()
                )));
            }
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            if header != HEADER {
                return Err(EntranceError::Corrupt(format!(
                    "{} is not a student store (bad header)",
                    path.display()
                )));
            }
        }

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of complete records; a torn trailing record is not counted.
    fn record_count(&self) -> Result<u64> {
        let body = self.file.metadata()?.len().saturating_sub(HEADER_LEN);
        let torn = body % RECORD_SIZE as u64;
        if torn != 0 {
            tracing::warn!(
                "{}: ignoring {torn} trailing bytes of an incomplete record",
                self.path.display()
            );
        }
        Ok(body / RECORD_SIZE as u64)
    }

    /// Lazily read every record with its position, from the first one.
    pub fn records(&mut self) -> Result<Records<'_>> {
        let count = self.record_count()?;
        self.file.seek(SeekFrom::Start(HEADER_LEN))?;
        tracing::debug!("scanning {count} records in {}", self.path.display());
        Ok(Records {
            reader: BufReader::new(&mut self.file),
            next: 0,
            count,
        })
    }

    fn read_at(&mut self, pos: RecordPos) -> Result<Student> {
        let mut buf = vec![0u8; RECORD_SIZE];
        self.file.seek(SeekFrom::Start(pos.offset()))?;
        self.file.read_exact(&mut buf)?;
        codec::decode(&buf)
    }

    fn write_at(&mut self, pos: RecordPos, bytes: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(pos.offset()))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Iterator over the records of a [`FileStore`].
pub struct Records<'a> {
    reader: BufReader<&'a mut File>,
    next: u64,
    count: u64,
}

impl Iterator for Records<'_> {
    type Item = Result<(Student, RecordPos)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let pos = RecordPos::of_index(self.next);
        self.next += 1;
        let mut buf = vec![0u8; RECORD_SIZE];
        let item = self
            .reader
            .read_exact(&mut buf)
            .map_err(EntranceError::from)
            .and_then(|()| codec::decode(&buf))
            .map(|s| (s, pos));
        if item.is_err() {
            // Stop after the first damaged record instead of yielding garbage.
            self.next = self.count;
        }
        Some(item)
    }
}

impl RecordStore for FileStore {
    fn append(&mut self, student: &Student) -> Result<RecordPos> {
        let bytes = codec::encode(student)?;
        // Aligned to the last complete record, so a torn tail is overwritten.
        let pos = RecordPos::of_index(self.record_count()?);
        self.write_at(pos, &bytes)?;
        Ok(pos)
    }

    fn find_by_id(&mut self, id: u32) -> Result<Option<(Student, RecordPos)>> {
        for item in self.records()? {
            let (student, pos) = item?;
            if student.id == id {
                return Ok(Some((student, pos)));
            }
        }
        Ok(None)
    }

    fn update_at(&mut self, pos: RecordPos, student: &Student) -> Result<()> {
        let bytes = codec::encode(student)?;
        if pos.index() >= self.record_count()? {
            return Err(EntranceError::Inconsistent(format!(
                "no record at offset {}",
                pos.offset()
            )));
        }
        let current = self.read_at(pos)?;
        if current.id != student.id {
            return Err(EntranceError::Inconsistent(format!(
                "record at offset {} is student {}, not {}",
                pos.offset(),
                current.id,
                student.id
            )));
        }
        self.write_at(pos, &bytes)
    }

    fn scan_all(&mut self) -> Result<Box<dyn Iterator<Item = Result<Student>> + '_>> {
        Ok(Box::new(self.records()?.map(|r| r.map(|(s, _)| s))))
    }

    fn len(&mut self) -> Result<usize> {
        Ok(self.record_count()? as usize)
    }
}
