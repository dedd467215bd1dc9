use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const LOG_FILE_NAME: &str = "organize_log.txt";

/// Append-style plain-text run log at the destination root, one line per file,
/// `<action>: <source> [to <dest>] [Error: <message>]`.
pub struct RunLog {
    writer: BufWriter<File>,
}

impl RunLog {
    pub fn open(dest_root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dest_root)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dest_root.join(LOG_FILE_NAME))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn moved(&mut self, source: &Path, dest: &Path) -> io::Result<()> {
        self.line(format_args!(
            "Moved: {} to {}",
            source.display(),
            dest.display()
        ))
    }

    pub fn moved_non_media(&mut self, source: &Path, dest: &Path) -> io::Result<()> {
        self.line(format_args!(
            "Moved non-media: {} to {}",
            source.display(),
            dest.display()
        ))
    }

    pub fn duplicate(&mut self, source: &Path, first: &Path, second: &Path) -> io::Result<()> {
        self.line(format_args!(
            "Duplicate: {} to {} and {}",
            source.display(),
            first.display(),
            second.display()
        ))
    }

    pub fn renamed(&mut self, source: &Path, dest: &Path) -> io::Result<()> {
        self.line(format_args!(
            "Renamed: {} to {}",
            source.display(),
            dest.display()
        ))
    }

    pub fn unrecognized(&mut self, source: &Path, dest: &Path, error: &str) -> io::Result<()> {
        self.line(format_args!(
            "Unrecognized: {} to {} Error: {}",
            source.display(),
            dest.display(),
            error
        ))
    }

    pub fn failed(&mut self, source: &Path, error: &str) -> io::Result<()> {
        self.line(format_args!("Failed: {} Error: {}", source.display(), error))
    }

    // Flushed per line so a crash mid-run leaves every completed file logged.
    fn line(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(self.writer, "{}", args)?;
        self.writer.flush()
    }
}
