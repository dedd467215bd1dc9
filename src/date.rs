use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use jiff::civil::DateTime;

use crate::error::{OrganizeError, Result};
use crate::scan;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Representative timestamp for a file: EXIF date-taken for images that carry
/// one, otherwise the filesystem modification time. `Ok(None)` means no date
/// can ever be determined for this file.
pub fn resolve_date(path: &Path, extension: &str) -> Result<Option<DateTime>> {
    if scan::is_image_extension(extension) {
        if let Some(taken) = exif_date_taken(path)? {
            return Ok(Some(taken));
        }
    }
    modified_date(path)
}

fn exif_date_taken(path: &Path) -> Result<Option<DateTime>> {
    let kind = sniff_image(path)?;
    // png/gif/bmp have no EXIF container; only the carriers get a parse.
    if !matches!(kind.extension(), "jpg" | "tif" | "heif" | "heic" | "avif") {
        return Ok(None);
    }

    let file = File::open(path)?;
    let iter = match nom_exif::parse_exif(file, None) {
        Ok(Some(iter)) => iter,
        Ok(None) => return Ok(None),
        Err(err) => {
            return Err(OrganizeError::MetadataRead {
                path: path.to_path_buf(),
                detail: err.to_string(),
            });
        }
    };

    let exif: nom_exif::Exif = iter.into();
    let Some(entry) = exif.get(nom_exif::ExifTag::DateTimeOriginal) else {
        return Ok(None);
    };
    match datetime_from_entry(entry) {
        Some(taken) => Ok(Some(taken)),
        None => Err(OrganizeError::MetadataRead {
            path: path.to_path_buf(),
            detail: "unparseable DateTimeOriginal value".to_string(),
        }),
    }
}

// "Can these bytes be opened as an image at all?" Any recognizable image
// format passes, whatever the extension claims; everything else is unreadable.
fn sniff_image(path: &Path) -> Result<infer::Type> {
    let mut prefix = Vec::with_capacity(512);
    File::open(path)?.take(512).read_to_end(&mut prefix)?;
    match infer::get(&prefix) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind),
        _ => Err(OrganizeError::UnreadableMedia {
            path: path.to_path_buf(),
        }),
    }
}

fn datetime_from_entry(entry: &nom_exif::EntryValue) -> Option<DateTime> {
    if let Some(time) = entry.as_time() {
        let formatted = format!("{}", time.format(EXIF_DATETIME_FORMAT));
        if let Some(taken) = parse_exif_datetime(&formatted) {
            return Some(taken);
        }
    }
    entry.as_str().and_then(parse_exif_datetime)
}

fn parse_exif_datetime(raw: &str) -> Option<DateTime> {
    jiff::fmt::strtime::parse(EXIF_DATETIME_FORMAT, raw.trim())
        .ok()?
        .to_datetime()
        .ok()
}

fn modified_date(path: &Path) -> Result<Option<DateTime>> {
    let modified = match std::fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => modified,
        // The one legitimate "unknown date": the filesystem cannot report
        // modification times at all.
        Err(err) if err.kind() == io::ErrorKind::Unsupported => return Ok(None),
        Err(err) => return Err(OrganizeError::Io(err)),
    };
    let timestamp = jiff::Timestamp::try_from(modified).map_err(io::Error::other)?;
    Ok(Some(
        timestamp.to_zoned(jiff::tz::TimeZone::system()).datetime(),
    ))
}
