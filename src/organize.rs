use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;

use crate::classify::{self, Category, DateResolution};
use crate::date;
use crate::error::{OrganizeError, Result};
use crate::place::{self, Placement};
use crate::runlog::RunLog;
use crate::scan;

/// Sequential per-run context: destination root, the run-wide duplicate pair
/// counter and the open run log. Tests get counter control by constructing a
/// fresh `Organizer` per run.
pub struct Organizer {
    dest_root: PathBuf,
    duplicate_counter: AtomicU64,
    log: RunLog,
}

#[derive(Debug, Clone)]
pub enum Disposition {
    Filed { dest: PathBuf },
    UnknownDate { dest: PathBuf },
    NonMedia { dest: PathBuf },
    Duplicate { first: PathBuf, second: PathBuf },
    ConflictRenamed { dest: PathBuf },
    Unrecognized { dest: PathBuf, error: String },
    Failed { error: String },
}

impl Organizer {
    pub fn new(dest_root: &Path) -> Result<Self> {
        let log = RunLog::open(dest_root)?;
        Ok(Self {
            dest_root: dest_root.to_path_buf(),
            duplicate_counter: AtomicU64::new(1),
            log,
        })
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    fn duplicates_dir(&self) -> PathBuf {
        self.dest_root.join("duplicates")
    }

    /// Run the resolve -> classify -> place pipeline for one file and log the
    /// outcome. Never fails the run: every error is folded into the returned
    /// disposition.
    pub fn organize_file(&mut self, source: &Path) -> Disposition {
        let disposition = self.relocate(source);
        if let Err(err) = self.log_line(source, &disposition) {
            eprintln!("WARNING: failed to log {}: {}", source.display(), err);
        }
        disposition
    }

    fn relocate(&self, source: &Path) -> Disposition {
        let extension = scan::extension_of(source);
        let resolution = if scan::is_media_extension(&extension) {
            date::resolve_date(source, &extension)
        } else {
            Ok(None)
        };
        let category = classify::classify(&extension, &resolution);
        let dest_dir = category.directory(&self.dest_root);

        match place::place(
            source,
            &dest_dir,
            &self.duplicates_dir(),
            &self.duplicate_counter,
        ) {
            Ok(placement) => Self::disposition_for(category, &resolution, placement),
            Err(err) => self.quarantine(source, err),
        }
    }

    fn disposition_for(
        category: Category,
        resolution: &DateResolution,
        placement: Placement,
    ) -> Disposition {
        match placement {
            Placement::DuplicateRecorded { first, second } => {
                Disposition::Duplicate { first, second }
            }
            Placement::ConflictRenamed(dest) => Disposition::ConflictRenamed { dest },
            Placement::Moved(dest) => match category {
                Category::MediaByDate { .. } => Disposition::Filed { dest },
                Category::MediaUnknownDate => Disposition::UnknownDate { dest },
                Category::NonMedia(_) => Disposition::NonMedia { dest },
                Category::Unrecognized => Disposition::Unrecognized {
                    dest,
                    error: resolution
                        .as_ref()
                        .err()
                        .map(|e| e.to_string())
                        .unwrap_or_default(),
                },
            },
        }
    }

    // A failed move/copy still gets per-file isolation: park the file in the
    // error area before giving up on it.
    fn quarantine(&self, source: &Path, err: OrganizeError) -> Disposition {
        let dir = Category::Unrecognized.directory(&self.dest_root);
        match place::place(source, &dir, &self.duplicates_dir(), &self.duplicate_counter) {
            Ok(Placement::Moved(dest) | Placement::ConflictRenamed(dest)) => {
                Disposition::Unrecognized {
                    dest,
                    error: err.to_string(),
                }
            }
            Ok(Placement::DuplicateRecorded { first, second }) => {
                Disposition::Duplicate { first, second }
            }
            Err(second_err) => Disposition::Failed {
                error: format!("{} (quarantine failed: {})", err, second_err),
            },
        }
    }

    fn log_line(&mut self, source: &Path, disposition: &Disposition) -> std::io::Result<()> {
        match disposition {
            Disposition::Filed { dest } | Disposition::UnknownDate { dest } => {
                self.log.moved(source, dest)
            }
            Disposition::NonMedia { dest } => self.log.moved_non_media(source, dest),
            Disposition::Duplicate { first, second } => self.log.duplicate(source, first, second),
            Disposition::ConflictRenamed { dest } => self.log.renamed(source, dest),
            Disposition::Unrecognized { dest, error } => {
                self.log.unrecognized(source, dest, error)
            }
            Disposition::Failed { error } => self.log.failed(source, error),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Summary {
    pub filed: usize,
    pub unknown_date: usize,
    pub non_media: usize,
    pub duplicates: usize,
    pub renamed: usize,
    pub unrecognized: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, disposition: &Disposition) {
        match disposition {
            Disposition::Filed { .. } => self.filed += 1,
            Disposition::UnknownDate { .. } => self.unknown_date += 1,
            Disposition::NonMedia { .. } => self.non_media += 1,
            Disposition::Duplicate { .. } => self.duplicates += 1,
            Disposition::ConflictRenamed { .. } => self.renamed += 1,
            Disposition::Unrecognized { .. } => self.unrecognized += 1,
            Disposition::Failed { .. } => self.failed += 1,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} filed, {} unknown date, {} non-media, {} duplicates, {} renamed, {} unrecognized, {} failed",
            self.filed,
            self.unknown_date,
            self.non_media,
            self.duplicates,
            self.renamed,
            self.unrecognized,
            self.failed
        )
    }
}
