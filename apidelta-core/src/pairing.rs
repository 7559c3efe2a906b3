//! Directory pairing using the `ignore` crate.
//!
//! Both trees are walked with the same filters and files are paired by
//! their path relative to each root. A file present on only one side is
//! still returned so the comparison can treat the other side as empty.
//!
//! Walking honors `.gitignore` and a project-level `.apideltaignore`.
//! Include patterns act as a whitelist; exclude patterns always win.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzeError, Result};
use crate::parser::AnalyzerRegistry;

/// File selection for a directory comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingOptions {
    /// Glob patterns a file must match (all analyzable files when empty).
    pub patterns: Vec<String>,
    /// Glob patterns to exclude.
    pub ignore: Vec<String>,
    pub follow_symlinks: bool,
}

/// One source unit across the two trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePair {
    /// Path relative to the roots, `/`-separated.
    pub relative: String,
    pub old: Option<PathBuf>,
    pub new: Option<PathBuf>,
}

impl FilePair {
    /// Side used to pick an analyzer: new if present, else old.
    pub fn primary(&self) -> Option<&Path> {
        self.new.as_deref().or(self.old.as_deref())
    }
}

/// Pair analyzable files under two roots, sorted by relative path.
pub fn pair_directories(
    old_root: &Path,
    new_root: &Path,
    options: &PairingOptions,
    registry: &AnalyzerRegistry,
) -> Result<Vec<FilePair>> {
    let old_files = collect_files(old_root, options, registry)?;
    let new_files = collect_files(new_root, options, registry)?;

    let mut pairs: BTreeMap<String, FilePair> = BTreeMap::new();
    for (relative, path) in old_files {
        pairs.insert(
            relative.clone(),
            FilePair {
                relative,
                old: Some(path),
                new: None,
            },
        );
    }
    for (relative, path) in new_files {
        pairs
            .entry(relative.clone())
            .or_insert_with(|| FilePair {
                relative,
                old: None,
                new: None,
            })
            .new = Some(path);
    }

    tracing::debug!(pairs = pairs.len(), "paired directory trees");
    Ok(pairs.into_values().collect())
}

/// Relative path → absolute path for every analyzable file under `root`.
fn collect_files(
    root: &Path,
    options: &PairingOptions,
    registry: &AnalyzerRegistry,
) -> Result<BTreeMap<String, PathBuf>> {
    if !root.is_dir() {
        return Err(AnalyzeError::Read {
            path: root.display().to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false) // Include hidden files, let gitignore handle it
        .git_ignore(true)
        .git_global(false) // Results must not depend on the user's machine
        .git_exclude(true)
        .require_git(false)
        .follow_links(options.follow_symlinks)
        .add_custom_ignore_filename(".apideltaignore");

    if !options.patterns.is_empty() || !options.ignore.is_empty() {
        let mut override_builder = OverrideBuilder::new(root);
        for pattern in &options.patterns {
            if let Err(e) = override_builder.add(pattern) {
                tracing::warn!(pattern = %pattern, error = %e, "invalid include pattern");
            }
        }
        for pattern in &options.ignore {
            // The ! prefix turns an override into an exclusion
            if let Err(e) = override_builder.add(&format!("!{}", pattern)) {
                tracing::warn!(pattern = %pattern, error = %e, "invalid ignore pattern");
            }
        }
        match override_builder.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => tracing::warn!(error = %e, "ignoring file patterns"),
        }
    }

    let mut files = BTreeMap::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if registry.for_path(&path).is_none() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        files.insert(relative_key(relative), path.clone());
    }

    Ok(files)
}

fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
