//! Discovery and parsing of model answer records
//!
//! Every file named `*_model_answer.json` below the scan root is one
//! [`UsageRecord`]. The walk is recursive and sorted by file name at each
//! directory level, so repeated scans of the same tree yield records in the
//! same order.
//!
//! # Examples
//!
//! ```no_run
//! use hcstat::data_loader::DataLoader;
//!
//! # fn example() -> hcstat::Result<()> {
//! let loader = DataLoader::new("challenge_data")?;
//! for (path, record) in loader.load_records() {
//!     match record {
//!         Ok(record) => println!("{}: {}", record.model, record.tokens.total()),
//!         Err(e) => eprintln!("skipping {}: {e}", path.display()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use hcstat_core::error::{HcstatError, Result};
use hcstat_core::types::{UsageRecord, is_model_answer_file};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Scanner for a directory tree of model answer records
#[derive(Debug, Clone)]
pub struct DataLoader {
    root: PathBuf,
}

impl DataLoader {
    /// Create a loader for `root`
    ///
    /// # Errors
    ///
    /// Returns [`HcstatError::PathNotFound`] if `root` does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(HcstatError::PathNotFound(root));
        }
        Ok(Self { root })
    }

    /// Scan root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All record files below the root, in walk order
    ///
    /// Entries the walk cannot read are logged and left out.
    pub fn find_record_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            // Symlinked records count, but links are not followed into directories
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && is_model_answer_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} model answer files in {}", files.len(), self.root.display());
        files
    }

    /// Read and parse one record file
    pub fn load_record(path: &Path) -> Result<UsageRecord> {
        let bytes = std::fs::read(path).map_err(|e| HcstatError::parse(path, e))?;
        UsageRecord::from_slice(path, &bytes)
    }

    /// Every record file paired with its parse result
    ///
    /// Files are read lazily as the iterator advances.
    pub fn load_records(&self) -> impl Iterator<Item = (PathBuf, Result<UsageRecord>)> {
        self.find_record_files().into_iter().map(|path| {
            let record = Self::load_record(&path);
            (path, record)
        })
    }
}
