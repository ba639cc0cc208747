//! File-per-record store: `<root>/<collection>/<uuid>.rkyv`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;
use rkyv::{from_bytes, to_bytes};
use tracing::{debug, warn};

use super::error::{IndexError, IndexResult};
use super::model::IndexRecord;

const RKYV_EXTENSION: &str = "rkyv";

const TEMP_EXTENSION: &str = "rkyv.tmp";

#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
    collection: String,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            collection: collection.into(),
        }
    }

    pub fn collection_path(&self) -> PathBuf {
        self.root.join(&self.collection)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.collection_path()
            .join(format!("{}.{}", id, RKYV_EXTENSION))
    }

    fn temp_record_path(&self, id: &str) -> PathBuf {
        self.collection_path()
            .join(format!("{}.{}", id, TEMP_EXTENSION))
    }

    pub fn ensure_dir(&self) -> IndexResult<()> {
        let path = self.collection_path();
        if !path.exists() {
            fs::create_dir_all(&path).map_err(|_| IndexError::StorageUnavailable { path })?;
        }
        Ok(())
    }

    /// Writes one record through a temp file and an atomic rename.
    pub fn write(&self, record: &IndexRecord) -> IndexResult<PathBuf> {
        self.ensure_dir()?;

        let bytes = to_bytes::<RkyvError>(record).map_err(|e| IndexError::Serialization {
            reason: e.to_string(),
        })?;

        let temp_path = self.temp_record_path(&record.id);
        let final_path = self.record_path(&record.id);

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &final_path)?;
        Ok(final_path)
    }

    /// Loads every complete record, ordered by `sequence`.
    ///
    /// Leftover temp files and unreadable records are skipped with a warning.
    pub fn load_all(&self) -> IndexResult<Vec<IndexRecord>> {
        let dir = self.collection_path();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_record = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".rkyv"));
            if !is_record {
                continue;
            }

            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
            }
        }

        records.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.id.cmp(&b.id)));
        debug!(collection = %self.collection, records = records.len(), "Loaded index records");
        Ok(records)
    }
}

fn read_record(path: &Path) -> IndexResult<IndexRecord> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(IndexError::Serialization {
            reason: format!("empty record file {}", path.display()),
        });
    }

    // SAFETY: records are immutable once renamed into place.
    let mmap = unsafe { Mmap::map(&file)? };

    from_bytes::<IndexRecord, RkyvError>(&mmap).map_err(|e| IndexError::Serialization {
        reason: e.to_string(),
    })
}
