//! Grouping of sprite files into category directories.
//!
//! Files at the top level of a source directory are bucketed by
//! [`CategoryRules`] and copied into `<output>/<category>/`. Originals are
//! only removed when explicitly requested, after every copy has finished.

use crate::category::CategoryRules;
use crate::config::{DEFAULT_EXTENSION, normalize_extension};
use crate::output::{OutputFormatter, plural_files};
use std::collections::BTreeMap;
use std::fs::{self, File, FileTimes, OpenOptions};
use std::path::{Path, PathBuf};

/// Errors that can occur while organizing or renaming files.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory is missing or cannot be listed.
    InvalidSourceDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to copy a file to its destination.
    FileCopyFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Failed to delete an original file.
    DeleteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSourceDir { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileCopyFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DeleteFailed { path, source } => {
                write!(f, "Failed to delete {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSourceDir { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::DeleteFailed { source, .. } => Some(source),
            Self::FileCopyFailed { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Options for a grouping run.
#[derive(Debug, Clone)]
pub struct GroupOptions {
    /// Directory whose top-level files are grouped.
    pub source_dir: PathBuf,
    /// Root for category directories. `None` organizes in place.
    pub output_dir: Option<PathBuf>,
    /// Lower-case extensions with a leading dot. Defaults to `[".svg"]`.
    pub extensions: Vec<String>,
    /// Report planned moves without touching the filesystem.
    pub dry_run: bool,
    /// After copying, delete every matching top-level file in `source_dir`.
    pub delete_originals: bool,
}

impl GroupOptions {
    /// Options with defaults: in place, `.svg` only, no dry run, no deletion.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: None,
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            dry_run: false,
            delete_originals: false,
        }
    }

    /// Replaces the extension filter, normalizing each entry.
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    /// Directory category folders are created in.
    pub fn output_root(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.source_dir)
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dry run: the copy was only reported.
    Planned,
    /// The file was copied to its destination.
    Copied,
    /// Source and destination are the same file.
    Skipped,
}

/// A single file placed (or planned) into a category directory.
#[derive(Debug, Clone)]
pub struct FileMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: String,
    pub outcome: MoveOutcome,
}

/// Summary of a grouping run.
#[derive(Debug, Default)]
pub struct GroupReport {
    /// Number of matching files found in the source directory.
    pub files_found: usize,
    /// Files per category, sorted by category and file name.
    pub categories: BTreeMap<String, Vec<PathBuf>>,
    /// Every planned, copied or skipped file.
    pub moves: Vec<FileMove>,
    /// Originals removed by `delete_originals`.
    pub deleted: Vec<PathBuf>,
}

impl GroupReport {
    /// Number of files actually copied.
    pub fn copied(&self) -> usize {
        self.count(MoveOutcome::Copied)
    }

    /// Number of files skipped because source and destination matched.
    pub fn skipped(&self) -> usize {
        self.count(MoveOutcome::Skipped)
    }

    /// Category names with file counts, in category order.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.categories
            .iter()
            .map(|(name, files)| (name.clone(), files.len()))
            .collect()
    }

    fn count(&self, outcome: MoveOutcome) -> usize {
        self.moves.iter().filter(|m| m.outcome == outcome).count()
    }
}

/// Groups the top-level files of a directory into category directories.
///
/// Every category gets a directory, even when it holds a single file.
/// The first filesystem error aborts the run; files already copied stay
/// where they are.
///
/// # Examples
///
/// ```no_run
/// use spritesort::category::CategoryRules;
/// use spritesort::file_organizer::{GroupOptions, organize_by_category};
///
/// let options = GroupOptions::new("sprites_done").with_extensions(&["svg", "png"]);
/// match organize_by_category(&options, &CategoryRules::default()) {
///     Ok(report) => println!("{} categories", report.categories.len()),
///     Err(e) => eprintln!("Organization failed: {}", e),
/// }
/// ```
pub fn organize_by_category(
    options: &GroupOptions,
    rules: &CategoryRules,
) -> OrganizeResult<GroupReport> {
    let output_root = options.output_root();

    let files = list_matching_files(&options.source_dir, &options.extensions)?;
    OutputFormatter::info(&format!("Found {} files to organize", files.len()));

    let categories = group_by_category(&files, rules);
    OutputFormatter::info(&format!(
        "Grouped files into {} categories",
        categories.len()
    ));

    if !options.dry_run {
        create_dir(output_root)?;
    }

    let pb = OutputFormatter::create_progress_bar(files.len() as u64);
    if options.dry_run {
        pb.finish_and_clear();
    }

    let mut moves = Vec::with_capacity(files.len());
    for (category, paths) in &categories {
        let category_dir = output_root.join(category);
        if !options.dry_run {
            create_dir(&category_dir)?;
        }

        OutputFormatter::above(
            &pb,
            &format!(
                "Category '{}' has {} {}",
                category,
                paths.len(),
                plural_files(paths.len())
            ),
        );

        for source in paths {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let destination = category_dir.join(file_name);
            let name = file_name.to_string_lossy();

            let outcome = if options.dry_run {
                OutputFormatter::dry_run_notice(&format!(
                    "  Would move {} -> {}",
                    source.display(),
                    destination.display()
                ));
                MoveOutcome::Planned
            } else if is_same_file(source, &destination) {
                OutputFormatter::above(&pb, &format!("  Skipping {} (same as destination)", name));
                pb.inc(1);
                MoveOutcome::Skipped
            } else {
                OutputFormatter::above(&pb, &format!("  Moving {} -> {}/{}", name, category, name));
                copy_with_metadata(source, &destination).map_err(|e| {
                    OrganizeError::FileCopyFailed {
                        source: source.clone(),
                        destination: destination.clone(),
                        source_error: e,
                    }
                })?;
                pb.inc(1);
                MoveOutcome::Copied
            };

            moves.push(FileMove {
                source: source.clone(),
                destination,
                category: category.clone(),
                outcome,
            });
        }
    }
    pb.finish_and_clear();

    let mut report = GroupReport {
        files_found: files.len(),
        categories,
        moves,
        deleted: Vec::new(),
    };

    OutputFormatter::success("All done! Files have been organized into categories");

    if options.delete_originals && !options.dry_run {
        report.deleted = delete_root_files(&options.source_dir, &options.extensions)?;
    }

    Ok(report)
}

/// Buckets files by the category of their file name.
///
/// Files keep their input order within a category.
pub fn group_by_category(
    files: &[PathBuf],
    rules: &CategoryRules,
) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        categories
            .entry(rules.extract(&name))
            .or_default()
            .push(path.clone());
    }
    categories
}

/// Lists regular files directly inside `dir` whose lower-cased extension is
/// in `extensions`, sorted by path.
pub fn list_matching_files(dir: &Path, extensions: &[String]) -> OrganizeResult<Vec<PathBuf>> {
    let invalid = |e| OrganizeError::InvalidSourceDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(invalid)? {
        let path = entry.map_err(invalid)?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Deletes every matching file at the top level of `dir`.
///
/// This is not limited to files that were grouped: all matching root-level
/// files are removed.
pub fn delete_root_files(dir: &Path, extensions: &[String]) -> OrganizeResult<Vec<PathBuf>> {
    let mut deleted = Vec::new();
    for path in list_matching_files(dir, extensions)? {
        fs::remove_file(&path).map_err(|e| OrganizeError::DeleteFailed {
            path: path.clone(),
            source: e,
        })?;
        if let Some(name) = path.file_name() {
            OutputFormatter::plain(&format!("Deleted: {}", name.to_string_lossy()));
        }
        deleted.push(path);
    }

    OutputFormatter::warning(&format!(
        "Deleted {} non-foldered {}",
        deleted.len(),
        plural_files(deleted.len())
    ));
    Ok(deleted)
}

/// Copies a file, keeping its permissions and access/modification times.
///
/// An existing destination is overwritten, unless it is the source itself
/// (same path, symlink or hard link), which is refused.
pub fn copy_with_metadata(source: &Path, destination: &Path) -> std::io::Result<()> {
    if is_same_file(source, destination) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        ));
    }

    let metadata = fs::metadata(source)?;
    fs::copy(source, destination)?;

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // The copy inherits read-only permissions; fall back to a read handle.
    let file = OpenOptions::new()
        .write(true)
        .open(destination)
        .or_else(|_| File::open(destination))?;
    file.set_times(times)
}

/// Creates a directory and its parents; an existing directory is fine.
pub(crate) fn create_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .is_some_and(|ext| extensions.contains(&ext))
}

pub(crate) fn is_same_file(source: &Path, destination: &Path) -> bool {
    if source == destination {
        return true;
    }
    if !destination.exists() {
        return false;
    }
    same_inode(source, destination)
}

#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

// Hard links are not detected here.
#[cfg(not(unix))]
fn same_inode(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
