use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Moved(PathBuf),
    DuplicateRecorded { first: PathBuf, second: PathBuf },
    ConflictRenamed(PathBuf),
}

/// Move `source` into `dest_dir` under its original name. A byte-identical
/// occupant turns the pair into numbered copies in the duplicates area; a
/// different-content occupant makes the newcomer take a content-suffixed name
/// instead of overwriting.
pub fn place(
    source: &Path,
    dest_dir: &Path,
    duplicates_dir: &Path,
    counter: &AtomicU64,
) -> Result<Placement> {
    let file_name = source
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"))?;
    fs::create_dir_all(dest_dir)?;
    let candidate = dest_dir.join(file_name);

    if source == candidate {
        return Ok(Placement::Moved(candidate));
    }
    if !candidate.exists() {
        move_file(source, &candidate)?;
        return Ok(Placement::Moved(candidate));
    }
    if same_contents(source, &candidate)? {
        let (first, second) = record_duplicate(source, &candidate, duplicates_dir, counter)?;
        return Ok(Placement::DuplicateRecorded { first, second });
    }
    let renamed = rename_conflicted(source, dest_dir)?;
    Ok(Placement::ConflictRenamed(renamed))
}

fn record_duplicate(
    source: &Path,
    existing: &Path,
    duplicates_dir: &Path,
    counter: &AtomicU64,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(duplicates_dir)?;
    let extension = source.extension().map(|e| e.to_string_lossy().into_owned());

    // Ids are never reused within a run; slots left on disk by earlier runs
    // are skipped rather than claimed.
    let (first, second) = loop {
        let id = counter.fetch_add(1, Ordering::Relaxed);
        let first = duplicates_dir.join(pair_name(id, "a", extension.as_deref()));
        let second = duplicates_dir.join(pair_name(id, "b", extension.as_deref()));
        if !first.exists() && !second.exists() {
            break (first, second);
        }
    };

    move_file(source, &first)?;
    // Copy, not move: the filed original stays where it is.
    fs::copy(existing, &second)?;
    Ok((first, second))
}

fn pair_name(id: u64, half: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}_{}.{}", id, half, ext),
        _ => format!("{}_{}", id, half),
    }
}

// Same name, different bytes: keep both by filing the newcomer under a
// content-derived suffix, probing successive hash byte pairs for a free name.
fn rename_conflicted(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = source.extension().map(|e| e.to_string_lossy().into_owned());
    let hash = hash_file(source)?;

    for i in 0..10 {
        let suffix = format!("{:02x}{:02x}", hash[i], hash[i + 1]);
        let candidate = dest_dir.join(suffixed_name(&stem, &suffix, extension.as_deref()));
        if !candidate.exists() {
            move_file(source, &candidate)?;
            return Ok(candidate);
        }
    }
    let long_suffix: String = hash[..8].iter().map(|b| format!("{:02x}", b)).collect();
    let candidate = dest_dir.join(suffixed_name(&stem, &long_suffix, extension.as_deref()));
    if candidate.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for {}", source.display()),
        )
        .into());
    }
    move_file(source, &candidate)?;
    Ok(candidate)
}

fn suffixed_name(stem: &str, suffix: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", stem, suffix),
    }
}

fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, dest)?;
            fs::remove_file(source)
        }
        Err(err) => Err(err),
    }
}

fn same_contents(a: &Path, b: &Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(hash_file(a)? == hash_file(b)?)
}

fn hash_file(path: &Path) -> io::Result<[u8; 32]> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hasher.finalize().into())
}
