//! Image file discovery.
//!
//! Each input path contributes its files in place: a regular file is taken
//! as-is (if its extension passes the allow-list), a directory contributes
//! its immediate entries sorted by the active order, and anything else is
//! reported as a warning and skipped. Contributions are concatenated in
//! input order and never re-sorted globally.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

use crate::config::SortOrder;

/// A candidate file paired with the timestamp the active sort order needs.
#[derive(Debug)]
struct ImageFileEntry {
    path: PathBuf,
    sort_key: SystemTime,
}

/// Collects every matching image file under the given inputs.
///
/// All per-path problems (missing path, unreadable entry, unavailable
/// metadata) are reported to stderr and skipped; collection itself cannot
/// fail.
pub fn collect_image_files(
    inputs: &[PathBuf],
    extensions: &[String],
    sort_order: SortOrder,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            if has_allowed_extension(input, extensions) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            files.extend(directory_files(input, extensions, sort_order));
        } else {
            eprintln!("warning: path not found, skipping: {}", input.display());
        }
    }

    files
}

/// Immediate (non-recursive) entries of one directory, filtered and sorted.
fn directory_files(dir: &Path, extensions: &[String], sort_order: SortOrder) -> Vec<PathBuf> {
    let mut entries: Vec<ImageFileEntry> = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("warning: cannot read entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_allowed_extension(entry.path(), extensions) {
            continue;
        }
        entries.push(ImageFileEntry {
            sort_key: sort_key(&entry, sort_order),
            path: entry.into_path(),
        });
    }

    // A stable sort keeps enumeration order for equal timestamps.
    match sort_order {
        SortOrder::FileName => entries.sort_by(|a, b| a.path.cmp(&b.path)),
        SortOrder::ModifiedTime | SortOrder::CreationTime => {
            entries.sort_by_key(|entry| entry.sort_key)
        }
    }

    entries.into_iter().map(|entry| entry.path).collect()
}

/// Timestamp used as the sort key, or the epoch when the filesystem cannot
/// provide one. Creation time falls back to modification time on platforms
/// that do not record it.
fn sort_key(entry: &walkdir::DirEntry, sort_order: SortOrder) -> SystemTime {
    let Ok(metadata) = entry.metadata() else {
        return UNIX_EPOCH;
    };
    let timestamp = match sort_order {
        SortOrder::FileName => return UNIX_EPOCH,
        SortOrder::ModifiedTime => metadata.modified(),
        SortOrder::CreationTime => metadata.created().or_else(|_| metadata.modified()),
    };
    timestamp.unwrap_or(UNIX_EPOCH)
}

/// Case-insensitive extension check against the normalized allow-list.
fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            let normalized = format!(".{}", ext.to_lowercase());
            extensions.iter().any(|allowed| *allowed == normalized)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::tempdir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|ext| ext.to_string()).collect()
    }

    fn touch(path: &Path) {
        File::create(path).expect("failed to create test file");
    }

    #[test]
    fn directory_contents_sorted_by_name() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("c.gif"));

        let files = collect_image_files(
            &[dir.path().to_path_buf()],
            &exts(&[".png", ".jpg", ".jpeg", ".bmp", ".gif", ".tiff"]),
            SortOrder::FileName,
        );

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.jpg", "b.png", "c.gif"]);
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("upper.PNG"));
        touch(&dir.path().join("lower.png"));
        touch(&dir.path().join("excluded.txt"));

        let files = collect_image_files(
            &[dir.path().to_path_buf()],
            &exts(&[".png"]),
            SortOrder::FileName,
        );
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn files_without_extension_are_excluded() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("noext"));

        let files = collect_image_files(
            &[dir.path().to_path_buf()],
            &exts(&[".png"]),
            SortOrder::FileName,
        );
        assert!(files.is_empty());
    }

    #[test]
    fn direct_file_input_is_filtered_by_extension() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("one.png");
        let txt = dir.path().join("two.txt");
        touch(&png);
        touch(&txt);

        let files = collect_image_files(
            &[png.clone(), txt],
            &exts(&[".png"]),
            SortOrder::FileName,
        );
        assert_eq!(files, vec![png]);
    }

    #[test]
    fn missing_path_is_skipped_without_failing() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("real.png");
        touch(&png);

        let files = collect_image_files(
            &[dir.path().join("no-such-dir"), png.clone()],
            &exts(&[".png"]),
            SortOrder::FileName,
        );
        assert_eq!(files, vec![png]);
    }

    #[test]
    fn subdirectories_are_not_entered() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("hidden.png"));
        touch(&dir.path().join("top.png"));

        let files = collect_image_files(
            &[dir.path().to_path_buf()],
            &exts(&[".png"]),
            SortOrder::FileName,
        );
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.png"));
    }

    #[test]
    fn input_path_order_is_preserved_across_directories() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        touch(&first.path().join("z.png"));
        touch(&second.path().join("a.png"));

        let files = collect_image_files(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            &exts(&[".png"]),
            SortOrder::FileName,
        );

        // z.png comes first because its directory was listed first.
        assert!(files[0].ends_with("z.png"));
        assert!(files[1].ends_with("a.png"));
    }

    #[test]
    fn modified_time_sort_is_ascending() {
        let dir = tempdir().unwrap();
        let older = dir.path().join("zz_old.png");
        let newer = dir.path().join("aa_new.png");
        touch(&older);
        touch(&newer);

        let base = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(base)
            .unwrap();
        File::options()
            .write(true)
            .open(&newer)
            .unwrap()
            .set_modified(base + Duration::from_secs(60))
            .unwrap();

        let files = collect_image_files(
            &[dir.path().to_path_buf()],
            &exts(&[".png"]),
            SortOrder::ModifiedTime,
        );
        assert_eq!(files, vec![older, newer]);
    }

    #[test]
    fn creation_time_sort_follows_creation_order_not_name_or_mtime() {
        let dir = tempdir().unwrap();

        // Names sort against creation order; a short pause separates the
        // filesystem creation stamps.
        let first = dir.path().join("zz_first.png");
        let second = dir.path().join("aa_second.png");
        touch(&first);
        std::thread::sleep(Duration::from_millis(25));
        touch(&second);

        // Invert the modification times too, so a result in creation order
        // proves the creation stamp was the key.
        let base = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&first)
            .unwrap()
            .set_modified(base + Duration::from_secs(60))
            .unwrap();
        File::options()
            .write(true)
            .open(&second)
            .unwrap()
            .set_modified(base)
            .unwrap();

        let files = collect_image_files(
            &[dir.path().to_path_buf()],
            &exts(&[".png"]),
            SortOrder::CreationTime,
        );

        let creation_time_supported = fs::metadata(&first).and_then(|m| m.created()).is_ok();
        if creation_time_supported {
            assert_eq!(files, vec![first, second]);
        } else {
            // Without a creation stamp the collector falls back to the
            // modification time, which was inverted above.
            assert_eq!(files, vec![second, first]);
        }
    }
}
