//! Directory scanning
//!
//! One level deep, extension-filtered, lexicographically ordered so repeated
//! runs see the files in the same order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{FileError, Result};

/// List audio files directly inside `dir` whose extension (case-insensitive)
/// is in `extensions`, sorted by file name.
pub fn scan_audio_dir(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FileError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
        })
        .collect();

    files.sort();

    if files.is_empty() {
        return Err(FileError::NoAudioFiles(dir.to_path_buf()));
    }

    log::debug!("found {} audio files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        vec!["wav".to_string(), "flac".to_string()]
    }

    #[test]
    fn test_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.wav"), b"").unwrap();
        fs::write(dir.path().join("a.flac"), b"").unwrap();
        fs::write(dir.path().join("c.txt"), b"").unwrap();
        fs::write(dir.path().join("D.WAV"), b"").unwrap();

        let files = scan_audio_dir(dir.path(), &exts()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["D.WAV", "a.flac", "b.wav"]);
    }

    #[test]
    fn test_subdirectories_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("top.wav"), b"").unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.wav"), b"").unwrap();

        let files = scan_audio_dir(dir.path(), &exts()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.wav"));
    }

    #[test]
    fn test_missing_directory() {
        let err = scan_audio_dir(Path::new("/no/such/dir"), &exts()).unwrap_err();
        assert!(matches!(err, FileError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let err = scan_audio_dir(dir.path(), &exts()).unwrap_err();
        assert!(matches!(err, FileError::NoAudioFiles(_)));
    }
}
