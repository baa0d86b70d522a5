//! Bounded repository file collection
//!
//! Walks a local repository directory and returns a `(relative_path,
//! content)` list capped by file count and per-file size, filtered to an
//! extension allowlist, with main code files prioritized over docs and
//! configuration. Binary and non-UTF-8 files are skipped.

use std::path::{Path, PathBuf};

/// Default cap on collected files
pub const MAX_FILES: usize = 20;

/// Files larger than this are skipped
pub const MAX_FILE_BYTES: u64 = 100_000;

const CODE_EXTENSIONS: [&str; 17] = [
    "py", "js", "ts", "jsx", "tsx", "java", "go", "rb", "php", "html", "css", "scss", "vue",
    "rs", "c", "cpp", "cs",
];

const DOC_EXTENSIONS: [&str; 6] = ["md", "txt", "json", "yml", "yaml", "xml"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect up to `max_files` text files under `root`, honoring .gitignore.
///
/// Code files come first, then docs/config, so the cap lands on the most
/// informative subset. Paths are relative to `root`.
pub fn collect_files(root: &Path, max_files: usize) -> std::io::Result<Vec<(String, String)>> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", root.display()),
        ));
    }

    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build();

    let mut code_files: Vec<PathBuf> = Vec::new();
    let mut doc_files: Vec<PathBuf> = Vec::new();
    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if entry.metadata().map(|m| m.len() > MAX_FILE_BYTES).unwrap_or(true) {
            continue;
        }
        if has_extension(path, &CODE_EXTENSIONS) {
            code_files.push(path.to_path_buf());
        } else if has_extension(path, &DOC_EXTENSIONS) {
            doc_files.push(path.to_path_buf());
        }
    }
    code_files.sort();
    doc_files.sort();

    let mut files = Vec::new();
    for path in code_files.into_iter().chain(doc_files) {
        if files.len() >= max_files {
            break;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", path.display());
                continue;
            }
        };
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        files.push((relative, content));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collects_relative_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.py", "print('hi')\n");
        write(dir.path(), "README.md", "# readme\n");

        let files = collect_files(dir.path(), MAX_FILES).unwrap();
        let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["src/main.py", "README.md"]);
    }

    #[test]
    fn test_code_files_are_prioritized() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a_doc.md", "doc\n");
        write(dir.path(), "z_code.rs", "fn main() {}\n");

        let files = collect_files(dir.path(), 1).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "z_code.rs");
    }

    #[test]
    fn test_unapproved_extensions_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "binary.exe", "MZ");
        write(dir.path(), "image.png", "PNG");
        write(dir.path(), "app.js", "const x = 1;\n");

        let files = collect_files(dir.path(), MAX_FILES).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "app.js");
    }

    #[test]
    fn test_max_files_cap() {
        let dir = TempDir::new().unwrap();
        for i in 0..10 {
            write(dir.path(), &format!("f{i}.py"), "pass\n");
        }
        let files = collect_files(dir.path(), 3).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect_files(&missing, MAX_FILES).is_err());
    }
}
