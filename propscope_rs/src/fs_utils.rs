//! Filesystem resolution for component source files.
//!
//! Turns a root path (file or directory) into the ordered list of candidate
//! source files: extension filtered, excluded-directory aware, optionally
//! bounded by the nearest project marker above the search root.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::types::{ResolveOptions, BOUNDARY_MARKERS, EXCLUDED_DIRS};

/// Build a globset from user patterns. Invalid patterns are reported and
/// dropped rather than failing the scan.
pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
                added = true;
            }
            Err(err) => eprintln!("[propscope][warn] invalid glob '{}': {}", pat, err),
        }
    }
    if !added { None } else { builder.build().ok() }
}

pub fn matches_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase()))
        .unwrap_or(false)
}

fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// Walk upward from `start` looking for a project marker file. The nearest
/// marker directory (including `start` itself) becomes the boundary.
pub fn find_project_boundary(start: &Path) -> Option<PathBuf> {
    let mut cursor = start.canonicalize().ok()?;
    if cursor.is_file() {
        cursor.pop();
    }
    loop {
        if BOUNDARY_MARKERS
            .iter()
            .any(|marker| cursor.join(marker).exists())
        {
            return Some(cursor);
        }
        if !cursor.pop() {
            return None;
        }
    }
}

/// Recursively enumerate regular files under `dir`, filtered by extension,
/// skipping hidden entries and excluded directory names, down to
/// `max_depth`. Entries are visited in lowercase lexicographic order so the
/// result is deterministic across runs.
pub fn gather_component_files(
    dir: &Path,
    options: &ResolveOptions,
    depth: usize,
    exclude: Option<&GlobSet>,
    files: &mut Vec<PathBuf>,
) -> io::Result<()> {
    let mut dir_entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .collect();

    dir_entries.sort_by_key(|entry| entry.file_name().to_string_lossy().to_lowercase());

    for entry in dir_entries {
        let path = entry.path();
        // Re-stat each candidate: a directory with a file-like name must be
        // skipped, and entries that vanished mid-scan must not crash it.
        let Ok(meta) = fs::metadata(&path) else {
            continue;
        };
        if meta.is_file() {
            if matches_extension(&path, &options.extensions)
                && exclude.is_none_or(|set| !set.is_match(&path))
            {
                files.push(path);
            }
            continue;
        }
        if meta.is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_excluded_dir(&name) {
                continue;
            }
            if options.max_depth.is_none_or(|max| depth < max) {
                gather_component_files(&path, options, depth + 1, exclude, files)?;
            }
        }
    }

    Ok(())
}

/// Resolve a root path into candidate files.
///
/// A regular file of an allowed extension yields a single-element list; a
/// directory is expanded recursively; a path that does not exist yields an
/// empty list ("nothing to analyze" is a valid outcome at this layer).
pub fn resolve_targets(root: &Path, options: &ResolveOptions) -> Vec<PathBuf> {
    let Ok(meta) = fs::metadata(root) else {
        return Vec::new();
    };

    if meta.is_file() {
        if matches_extension(root, &options.extensions) {
            return vec![root.to_path_buf()];
        }
        return Vec::new();
    }
    if !meta.is_dir() {
        return Vec::new();
    }

    let exclude = build_globset(&options.exclude_globs);
    let mut files = Vec::new();
    if let Err(err) = gather_component_files(root, options, 0, exclude.as_ref(), &mut files) {
        eprintln!(
            "[propscope][warn] scan aborted under {}: {}",
            root.display(),
            err
        );
    }

    if options.respect_boundaries {
        // With no markers anywhere above, the boundary degrades to "must be
        // a descendant of the search root".
        let boundary = find_project_boundary(root).or_else(|| root.canonicalize().ok());
        if let Some(boundary) = boundary {
            files.retain(|file| {
                file.canonicalize()
                    .map(|resolved| resolved.starts_with(&boundary))
                    .unwrap_or(false)
            });
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResolveOptions;

    fn opts() -> ResolveOptions {
        ResolveOptions::default()
    }

    #[test]
    fn resolve_filters_by_extension_and_skips_excluded_dirs() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        std::fs::create_dir_all(root.join("src")).expect("src dir");
        std::fs::create_dir_all(root.join("node_modules/pkg")).expect("node_modules dir");
        std::fs::write(root.join("src/App.tsx"), "export {}").expect("write App.tsx");
        std::fs::write(root.join("src/notes.md"), "# notes").expect("write notes.md");
        std::fs::write(root.join("node_modules/pkg/index.tsx"), "export {}")
            .expect("write vendored file");

        let files = resolve_targets(root, &opts());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().expect("file name").to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["App.tsx".to_string()]);
    }

    #[test]
    fn resolve_single_file_root() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let file = tmp.path().join("Button.jsx");
        std::fs::write(&file, "export {}").expect("write Button.jsx");

        let files = resolve_targets(&file, &opts());
        assert_eq!(files, vec![file]);

        let other = tmp.path().join("styles.css");
        std::fs::write(&other, "").expect("write styles.css");
        assert!(resolve_targets(&other, &opts()).is_empty());
    }

    #[test]
    fn missing_root_yields_empty_list_not_error() {
        let files = resolve_targets(Path::new("/nonexistent/propscope-test"), &opts());
        assert!(files.is_empty());
    }

    #[test]
    fn max_depth_bounds_recursion() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        std::fs::create_dir_all(root.join("a/b")).expect("nested dirs");
        std::fs::write(root.join("top.tsx"), "export {}").expect("write top");
        std::fs::write(root.join("a/mid.tsx"), "export {}").expect("write mid");
        std::fs::write(root.join("a/b/deep.tsx"), "export {}").expect("write deep");

        let mut options = opts();
        options.max_depth = Some(1);
        let files = resolve_targets(root, &options);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().expect("file name").to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"top.tsx".to_string()));
        assert!(names.contains(&"mid.tsx".to_string()));
        assert!(!names.contains(&"deep.tsx".to_string()));
    }

    #[test]
    fn exclude_globs_drop_matching_files() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        std::fs::create_dir_all(root.join("src/__tests__")).expect("dirs");
        std::fs::write(root.join("src/App.tsx"), "export {}").expect("write App");
        std::fs::write(root.join("src/__tests__/App.test.tsx"), "export {}")
            .expect("write test file");

        let mut options = opts();
        options.exclude_globs = vec!["**/__tests__/**".to_string()];
        let files = resolve_targets(root, &options);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/App.tsx"));
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        std::fs::write(root.join(".hidden.tsx"), "export {}").expect("write hidden");
        std::fs::write(root.join("Visible.tsx"), "export {}").expect("write visible");

        let files = resolve_targets(root, &opts());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Visible.tsx"));
    }
}
