//! Person store contracts and flat-file implementation.
//!
//! # Responsibility
//! - Provide load/find/rewrite/append APIs over the line-oriented data file.
//! - Keep file format details inside the persistence boundary.
//!
//! # Invariants
//! - `append` validates the record and never reads existing content.
//! - `rewrite_all` replaces the whole file; lines that are not records are
//!   written back byte-for-byte.
//! - Lookup by identifier returns the first matching record line only.
//! - No locking: concurrent writers on one file are unsupported.

use crate::model::person::PersonRecord;
use crate::validation::ValidationError;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for person persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Io { path: PathBuf, source: io::Error },
    MissingFile,
    NotFound(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "data file `{}`: {source}", path.display()),
            Self::MissingFile => f.write_str("data file does not exist"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::MissingFile => None,
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One line of the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredLine {
    /// A line with at least six fields, with its original text.
    Record { raw: String, record: PersonRecord },
    /// Any other line, kept untouched.
    Other(String),
}

impl StoredLine {
    pub fn parse(raw: &str) -> Self {
        match PersonRecord::from_line(raw) {
            Some(record) => Self::Record {
                raw: raw.to_string(),
                record,
            },
            None => Self::Other(raw.to_string()),
        }
    }

    /// Line carrying a freshly serialized record.
    pub fn from_record(record: PersonRecord) -> Self {
        Self::Record {
            raw: record.to_line(),
            record,
        }
    }

    pub fn record(&self) -> Option<&PersonRecord> {
        match self {
            Self::Record { record, .. } => Some(record),
            Self::Other(_) => None,
        }
    }

    /// Text written back to the file.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Record { raw, .. } => raw,
            Self::Other(raw) => raw,
        }
    }
}

/// Repository interface for person persistence.
pub trait PersonStore {
    /// Whether the backing data file exists.
    fn exists(&self) -> bool;
    /// Reads every line. A missing file yields no lines.
    fn load_all(&self) -> RepoResult<Vec<StoredLine>>;
    /// First record whose identifier equals `id`.
    fn find_by_id(&self, id: &str) -> RepoResult<Option<PersonRecord>>;
    /// Replaces the file with `lines`, in order.
    fn rewrite_all(&self, lines: &[StoredLine]) -> RepoResult<()>;
    /// Validates `record` and appends it as the last line.
    fn append(&self, record: &PersonRecord) -> RepoResult<()>;
}

impl<S: PersonStore + ?Sized> PersonStore for &S {
    fn exists(&self) -> bool {
        (**self).exists()
    }

    fn load_all(&self) -> RepoResult<Vec<StoredLine>> {
        (**self).load_all()
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<PersonRecord>> {
        (**self).find_by_id(id)
    }

    fn rewrite_all(&self, lines: &[StoredLine]) -> RepoResult<()> {
        (**self).rewrite_all(lines)
    }

    fn append(&self, record: &PersonRecord) -> RepoResult<()> {
        (**self).append(record)
    }
}

/// Person store backed by one comma-delimited text file.
#[derive(Debug, Clone)]
pub struct FlatFilePersonStore {
    path: PathBuf,
}

impl FlatFilePersonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersonStore for FlatFilePersonStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load_all(&self) -> RepoResult<Vec<StoredLine>> {
        let started_at = Instant::now();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("event=store_load module=repo status=ok lines=0 missing_file=true");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let lines = content.lines().map(StoredLine::parse).collect::<Vec<_>>();
        debug!(
            "event=store_load module=repo status=ok lines={} duration_ms={}",
            lines.len(),
            started_at.elapsed().as_millis()
        );
        Ok(lines)
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<PersonRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find_map(|line| match line {
                StoredLine::Record { record, .. } if record.id == id => Some(record),
                _ => None,
            }))
    }

    fn rewrite_all(&self, lines: &[StoredLine]) -> RepoResult<()> {
        let started_at = Instant::now();
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_text());
            content.push('\n');
        }

        if let Err(err) = fs::write(&self.path, content) {
            error!(
                "event=store_rewrite module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(self.io_error(err));
        }

        debug!(
            "event=store_rewrite module=repo status=ok lines={} duration_ms={}",
            lines.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn append(&self, record: &PersonRecord) -> RepoResult<()> {
        record.validate()?;

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", record.to_line()));

        match result {
            Ok(()) => {
                debug!("event=store_append module=repo status=ok id={}", record.id);
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_append module=repo status=error id={} error={}",
                    record.id, err
                );
                Err(self.io_error(err))
            }
        }
    }
}
