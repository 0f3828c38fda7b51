//! File-system helpers

use std::path::Path;

use crate::logger;

/// Names of the immediate subdirectories of `parent`, in listing order
///
/// Errors are logged and yield an empty list.
pub fn list_subdirectories(parent: impl AsRef<Path>) -> Vec<String> {
    let parent = parent.as_ref();
    match read_subdirectories(parent) {
        Ok(dirs) => dirs,
        Err(e) => {
            logger::log_dir_error(parent, &e);
            Vec::new()
        }
    }
}

fn read_subdirectories(parent: &Path) -> std::io::Result<Vec<String>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(parent)? {
        let entry = entry?;
        // metadata() follows symlinks, so a link to a directory counts
        if std::fs::metadata(entry.path())?.is_dir() {
            dirs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ssr-dirs-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_lists_only_directories() {
        let root = scratch_dir("mixed");
        std::fs::create_dir(root.join("vuessr")).unwrap();
        std::fs::create_dir(root.join("admin")).unwrap();
        std::fs::write(root.join("README.md"), "docs").unwrap();

        let listed = list_subdirectories(&root);
        let mut expected: Vec<String> = std::fs::read_dir(&root)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(listed, expected);

        expected.sort();
        assert_eq!(expected, vec!["admin".to_string(), "vuessr".to_string()]);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_empty_directory() {
        let root = scratch_dir("empty");
        assert!(list_subdirectories(&root).is_empty());
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_directory() {
        let root = std::env::temp_dir().join("ssr-dirs-does-not-exist-4b1f");
        assert!(list_subdirectories(root).is_empty());
    }

    #[test]
    fn test_file_instead_of_directory() {
        let root = scratch_dir("file");
        let file = root.join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(list_subdirectories(&file).is_empty());
        std::fs::remove_dir_all(&root).ok();
    }
}
