use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn discover_files(source: &Path) -> Vec<PathBuf> {
    WalkDir::new(source)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn is_media_extension(extension: &str) -> bool {
    matches!(
        extension,
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "mp4" | "avi" | "mov" | "heif"
    )
}

// The subset of media for which an embedded date is attempted. Videos and gif
// never get a metadata read; they go straight to the mtime fallback.
pub fn is_image_extension(extension: &str) -> bool {
    matches!(extension, "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "heif")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn media_set_is_closed() {
        for ext in ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "mp4", "avi", "mov", "heif"] {
            assert!(is_media_extension(ext), ".{} must be media", ext);
        }
        for ext in ["pdf", "txt", "zip", "rar", "webp", "mkv", "heic", ""] {
            assert!(!is_media_extension(ext), ".{} must not be media", ext);
        }
    }

    #[test]
    fn image_set_excludes_gif_and_videos() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("png"));
        assert!(!is_image_extension("gif"));
        assert!(!is_image_extension("mp4"));
        assert!(!is_image_extension("mov"));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of(Path::new("a/PHOTO.JPG")), "jpg");
        assert_eq!(extension_of(Path::new("a/photo.JpEg")), "jpeg");
        assert_eq!(extension_of(Path::new("a/archive.tar.GZ")), "gz");
        assert_eq!(extension_of(Path::new("a/README")), "");
    }

    #[test]
    fn discover_files_walks_nested_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::write(dir.path().join("top.jpg"), b"a").unwrap();
        fs::write(dir.path().join("x/mid.png"), b"b").unwrap();
        fs::write(dir.path().join("x/y/deep.mp4"), b"c").unwrap();

        let mut names: Vec<String> = discover_files(dir.path())
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["deep.mp4", "mid.png", "top.jpg"]);
    }
}
