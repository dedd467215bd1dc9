use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use media_tidy::organize::{Disposition, Organizer, Summary};
use media_tidy::scan;

#[derive(Parser)]
#[command(name = "media-tidy")]
#[command(about = "Organize media files into a date-based directory structure")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organize files from one or more source directories into a destination tree
    Organize {
        /// Source directories to scan
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Destination root for the organized tree
        #[arg(long, short)]
        dest: PathBuf,
        /// Suppress per-file output (show only progress bar and summary)
        #[arg(long, short)]
        quiet: bool,
        /// Write the run summary as JSON to this path
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Organize {
            sources,
            dest,
            quiet,
            summary_json,
        } => run(&sources, &dest, quiet, summary_json.as_deref()),
    }
}

fn run(sources: &[PathBuf], dest: &Path, quiet: bool, summary_json: Option<&Path>) {
    let mut files = Vec::new();
    for source in sources {
        files.extend(scan::discover_files(source));
    }

    let mut organizer = match Organizer::new(dest) {
        Ok(organizer) => organizer,
        Err(err) => {
            eprintln!("ERROR: cannot open destination {}: {}", dest.display(), err);
            std::process::exit(1);
        }
    };

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()), // safe: static template string
    );

    let mut summary = Summary::default();
    for file in &files {
        let disposition = organizer.organize_file(file);
        report(file, &disposition, quiet);
        summary.record(&disposition);
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("{}", summary);

    if let Some(path) = summary_json {
        if let Err(err) = write_summary_json(path, &summary) {
            eprintln!(
                "WARNING: failed to write summary to {}: {}",
                path.display(),
                err
            );
        }
    }
}

fn report(source: &Path, disposition: &Disposition, quiet: bool) {
    match disposition {
        // failures always print, quiet or not
        Disposition::Failed { error } => {
            eprintln!("FAILED {} ({})", source.display(), error);
        }
        _ if quiet => {}
        Disposition::Filed { dest } => {
            eprintln!("MOVE {} -> {}", source.display(), dest.display());
        }
        Disposition::UnknownDate { dest } => {
            eprintln!("UNKNOWN DATE {} -> {}", source.display(), dest.display());
        }
        Disposition::NonMedia { dest } => {
            eprintln!("NON-MEDIA {} -> {}", source.display(), dest.display());
        }
        Disposition::Duplicate { first, .. } => {
            eprintln!("DUPLICATE {} -> {}", source.display(), first.display());
        }
        Disposition::ConflictRenamed { dest } => {
            eprintln!("RENAMED {} -> {}", source.display(), dest.display());
        }
        Disposition::Unrecognized { dest, error } => {
            eprintln!(
                "UNRECOGNIZED {} -> {} ({})",
                source.display(),
                dest.display(),
                error
            );
        }
    }
}

fn write_summary_json(path: &Path, summary: &Summary) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, json)
}
