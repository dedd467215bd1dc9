use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganizeError {
    /// Bytes of a file with an image extension are not any recognizable image.
    #[error("cannot identify image file: {path}")]
    UnreadableMedia { path: PathBuf },

    /// The image itself is valid but its embedded date metadata is not.
    #[error("error reading metadata from {path}: {detail}")]
    MetadataRead { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OrganizeError>;
