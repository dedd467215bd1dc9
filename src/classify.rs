use std::path::{Path, PathBuf};

use jiff::civil::DateTime;

use crate::error::OrganizeError;
use crate::scan;

pub type DateResolution = std::result::Result<Option<DateTime>, OrganizeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonMediaBucket {
    Documents,
    Archives,
    Misc,
}

impl NonMediaBucket {
    pub fn for_extension(extension: &str) -> Self {
        match extension {
            "pdf" | "doc" | "docx" | "txt" => Self::Documents,
            "zip" | "rar" => Self::Archives,
            _ => Self::Misc,
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Archives => "archives",
            Self::Misc => "misc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    MediaByDate { year: i16, month: i8 },
    MediaUnknownDate,
    NonMedia(NonMediaBucket),
    Unrecognized,
}

/// Pure classification: extension plus the outcome of date resolution decide
/// the destination bucket. First match wins: recognized media with a clean
/// resolution files by date, anything non-media buckets by extension, and
/// media whose resolution raised goes to the error area.
pub fn classify(extension: &str, resolution: &DateResolution) -> Category {
    if scan::is_media_extension(extension) {
        match resolution {
            Ok(Some(date)) => Category::MediaByDate {
                year: date.year(),
                month: date.month(),
            },
            Ok(None) => Category::MediaUnknownDate,
            Err(_) => Category::Unrecognized,
        }
    } else {
        Category::NonMedia(NonMediaBucket::for_extension(extension))
    }
}

impl Category {
    pub fn directory(&self, dest_root: &Path) -> PathBuf {
        match self {
            Category::MediaByDate { year, month } => dest_root
                .join(year.to_string())
                .join(format!("{}_{}", year, month)),
            Category::MediaUnknownDate => dest_root.join("unknown_date"),
            Category::NonMedia(bucket) => dest_root.join("non-media").join(bucket.dir_name()),
            Category::Unrecognized => dest_root.join("unrecognized_files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use std::path::PathBuf;

    fn resolved(year: i16, month: i8, day: i8) -> DateResolution {
        Ok(Some(date(year, month, day).at(10, 0, 0, 0)))
    }

    fn unreadable() -> DateResolution {
        Err(OrganizeError::UnreadableMedia {
            path: PathBuf::from("x.jpg"),
        })
    }

    #[test]
    fn dated_media_files_by_year_and_unpadded_month() {
        let category = classify("jpg", &resolved(2023, 7, 4));
        assert_eq!(category, Category::MediaByDate { year: 2023, month: 7 });
        assert_eq!(
            category.directory(Path::new("/dest")),
            Path::new("/dest/2023/2023_7")
        );
    }

    #[test]
    fn december_month_is_not_padded_either_way() {
        let category = classify("mov", &resolved(1999, 12, 31));
        assert_eq!(
            category.directory(Path::new("/dest")),
            Path::new("/dest/1999/1999_12")
        );
    }

    // An absent resolved date (the filesystem cannot report a modification
    // time) is the only road into unknown_date.
    #[test]
    fn media_with_absent_date_goes_to_unknown_date() {
        let category = classify("jpg", &Ok(None));
        assert_eq!(category, Category::MediaUnknownDate);
        assert_eq!(
            category.directory(Path::new("/dest")),
            Path::new("/dest/unknown_date")
        );
    }

    #[test]
    fn media_with_failed_resolution_is_unrecognized() {
        let category = classify("jpg", &unreadable());
        assert_eq!(category, Category::Unrecognized);
        assert_eq!(
            category.directory(Path::new("/dest")),
            Path::new("/dest/unrecognized_files")
        );
    }

    #[test]
    fn non_media_buckets_by_extension() {
        for ext in ["pdf", "doc", "docx", "txt"] {
            assert_eq!(
                classify(ext, &Ok(None)),
                Category::NonMedia(NonMediaBucket::Documents)
            );
        }
        for ext in ["zip", "rar"] {
            assert_eq!(
                classify(ext, &Ok(None)),
                Category::NonMedia(NonMediaBucket::Archives)
            );
        }
        for ext in ["csv", "exe", "webp", ""] {
            assert_eq!(
                classify(ext, &Ok(None)),
                Category::NonMedia(NonMediaBucket::Misc)
            );
        }
        assert_eq!(
            classify("txt", &Ok(None)).directory(Path::new("/dest")),
            Path::new("/dest/non-media/documents")
        );
    }

    // Non-media never files by date and never lands in the error area, even if
    // a caller hands it a date or an error.
    #[test]
    fn non_media_ignores_date_resolution() {
        assert_eq!(
            classify("pdf", &resolved(2023, 7, 4)),
            Category::NonMedia(NonMediaBucket::Documents)
        );
        assert_eq!(
            classify("xyz", &unreadable()),
            Category::NonMedia(NonMediaBucket::Misc)
        );
    }
}
