//! Renaming of sprite-sheet export folders.
//!
//! Each export folder holds one or more images. A folder with a single
//! image becomes `<output>/<ProperName>.svg`; a folder with several becomes
//! `<output>/<ProperName>/<ProperName>_NN.svg`, numbered from 01 in sorted
//! filename order. Source folders are never modified.

use crate::category::is_plain_dir_name;
use crate::config::{DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR, normalize_extension};
use crate::file_organizer::{OrganizeError, OrganizeResult, copy_with_metadata, create_dir};
use crate::output::{OutputFormatter, plural_files};
use crate::proper_name::NameRules;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for a fan-out run.
#[derive(Debug, Clone)]
pub struct FanOutOptions {
    /// Directory holding the sprite export folders.
    pub working_dir: PathBuf,
    /// Output directory name, created inside `working_dir`. Folders whose
    /// name starts with it are never treated as exports.
    pub output_dir_name: String,
    /// Image extension, lower case with a leading dot.
    pub extension: String,
    /// Report planned copies without touching the filesystem.
    pub dry_run: bool,
}

impl FanOutOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            dry_run: false,
        }
    }

    /// Replaces the image extension, normalizing it.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    pub fn output_dir(&self) -> PathBuf {
        self.working_dir.join(&self.output_dir_name)
    }
}

/// Output layout chosen for a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// No images; nothing copied.
    Empty,
    /// One image, copied to the output root.
    Flat,
    /// Several images, numbered inside a subfolder.
    Nested,
}

impl Layout {
    /// Layout for a number of images.
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => Layout::Empty,
            1 => Layout::Flat,
            _ => Layout::Nested,
        }
    }
}

/// What happened to one export folder.
#[derive(Debug, Clone)]
pub struct FolderOutcome {
    pub folder: PathBuf,
    pub proper_name: String,
    pub layout: Layout,
    /// Destination paths, in copy order.
    pub outputs: Vec<PathBuf>,
}

/// Summary of a fan-out run.
#[derive(Debug, Default)]
pub struct FanOutReport {
    pub output_dir: PathBuf,
    pub folders: Vec<FolderOutcome>,
}

impl FanOutReport {
    /// Total number of files written (or planned).
    pub fn files_written(&self) -> usize {
        self.folders.iter().map(|f| f.outputs.len()).sum()
    }
}

/// Copies every export folder's images into the output directory under
/// their proper names.
///
/// # Examples
///
/// ```no_run
/// use spritesort::fanout::{FanOutOptions, fan_out};
/// use spritesort::proper_name::NameRules;
///
/// let report = fan_out(&FanOutOptions::new("."), &NameRules::default());
/// if let Ok(report) = report {
///     println!("{} files written", report.files_written());
/// }
/// ```
pub fn fan_out(options: &FanOutOptions, rules: &NameRules) -> OrganizeResult<FanOutReport> {
    let folders = list_export_folders(&options.working_dir, &options.output_dir_name)?;
    OutputFormatter::info(&format!("Found {} directories to process", folders.len()));

    let output_dir = options.output_dir();
    if !options.dry_run {
        create_dir(&output_dir)?;
    }

    let mut report = FanOutReport {
        output_dir: output_dir.clone(),
        folders: Vec::with_capacity(folders.len()),
    };

    for folder in folders {
        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let proper_name = output_name(rules.extract(&folder_name), &folder_name);
        let images = list_images(&folder, &options.extension)?;
        let layout = Layout::for_count(images.len());

        OutputFormatter::plain(&format!(
            "Processing {} -> {} ({} {})",
            folder_name,
            proper_name,
            images.len(),
            plural_files(images.len())
        ));

        let targets = plan_targets(&output_dir, &proper_name, &options.extension, &images);

        if options.dry_run {
            for (source, destination) in images.iter().zip(&targets) {
                OutputFormatter::dry_run_notice(&format!(
                    "  Would copy {} -> {}",
                    source.display(),
                    destination.display()
                ));
            }
        } else {
            if layout == Layout::Nested {
                create_dir(&output_dir.join(&proper_name))?;
            }
            copy_all(&images, &targets)?;
        }

        report.folders.push(FolderOutcome {
            folder,
            proper_name,
            layout,
            outputs: targets,
        });
    }

    if options.dry_run {
        OutputFormatter::dry_run_notice("No files were written.");
    } else {
        OutputFormatter::success(&format!(
            "All done! Files have been saved to {}",
            output_dir.display()
        ));
    }

    Ok(report)
}

/// The proper name, or the folder name when the proper name would not stay
/// inside the output directory (e.g. `..` from `xa_..`).
pub fn output_name(proper_name: String, folder_name: &str) -> String {
    if is_plain_dir_name(&proper_name) {
        proper_name
    } else {
        OutputFormatter::warning(&format!(
            "Name '{}' is not usable as a path, keeping '{}'",
            proper_name, folder_name
        ));
        folder_name.to_string()
    }
}

/// Destination paths for a folder's sorted images.
///
/// ```
/// use spritesort::fanout::plan_targets;
/// use std::path::{Path, PathBuf};
///
/// let images = vec![PathBuf::from("a.svg"), PathBuf::from("b.svg")];
/// let targets = plan_targets(Path::new("out"), "Torso", ".svg", &images);
/// assert_eq!(targets[1], Path::new("out/Torso/Torso_02.svg"));
/// ```
pub fn plan_targets(
    output_dir: &Path,
    proper_name: &str,
    extension: &str,
    images: &[PathBuf],
) -> Vec<PathBuf> {
    match Layout::for_count(images.len()) {
        Layout::Empty => Vec::new(),
        Layout::Flat => vec![output_dir.join(format!("{proper_name}{extension}"))],
        Layout::Nested => {
            let subfolder = output_dir.join(proper_name);
            (1..=images.len())
                .map(|i| subfolder.join(format!("{proper_name}_{i:02}{extension}")))
                .collect()
        }
    }
}

/// Immediate subdirectories of `working_dir`, excluding the output
/// directory and anything named after it, sorted by path.
pub fn list_export_folders(
    working_dir: &Path,
    output_dir_name: &str,
) -> OrganizeResult<Vec<PathBuf>> {
    let invalid = |e| OrganizeError::InvalidSourceDir {
        path: working_dir.to_path_buf(),
        source: e,
    };

    let mut folders = Vec::new();
    for entry in fs::read_dir(working_dir).map_err(invalid)? {
        let path = entry.map_err(invalid)?.path();
        let reserved = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with(output_dir_name));
        if path.is_dir() && !reserved {
            folders.push(path);
        }
    }
    folders.sort();
    Ok(folders)
}

/// Regular files in `folder` whose lower-cased name ends with `extension`,
/// sorted by file name.
pub fn list_images(folder: &Path, extension: &str) -> OrganizeResult<Vec<PathBuf>> {
    let invalid = |e| OrganizeError::InvalidSourceDir {
        path: folder.to_path_buf(),
        source: e,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(folder).map_err(invalid)? {
        let entry = entry.map_err(invalid)?;
        let matches = entry
            .file_name()
            .to_string_lossy()
            .to_lowercase()
            .ends_with(extension);
        if matches && entry.path().is_file() {
            images.push(entry.path());
        }
    }
    images.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(images)
}

fn copy_all(sources: &[PathBuf], targets: &[PathBuf]) -> OrganizeResult<()> {
    let pb = OutputFormatter::create_progress_bar(sources.len() as u64);
    for (source, destination) in sources.iter().zip(targets) {
        copy_with_metadata(source, destination).map_err(|e| OrganizeError::FileCopyFailed {
            source: source.clone(),
            destination: destination.clone(),
            source_error: e,
        })?;
        let from = source.file_name().unwrap_or_default().to_string_lossy();
        let to = destination.file_name().unwrap_or_default().to_string_lossy();
        OutputFormatter::above(&pb, &format!("  Copied {} -> {}", from, to));
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_for_count() {
        assert_eq!(Layout::for_count(0), Layout::Empty);
        assert_eq!(Layout::for_count(1), Layout::Flat);
        assert_eq!(Layout::for_count(5), Layout::Nested);
    }

    #[test]
    fn test_plan_targets_flat() {
        let targets = plan_targets(
            Path::new("out"),
            "WaistSide_ThunderGolem",
            ".svg",
            &[PathBuf::from("x/1.svg")],
        );
        assert_eq!(targets, vec![PathBuf::from("out/WaistSide_ThunderGolem.svg")]);
    }

    #[test]
    fn test_plan_targets_nested_two_digit_index() {
        let images: Vec<PathBuf> = (0..12).map(|i| PathBuf::from(format!("{i}.svg"))).collect();
        let targets = plan_targets(Path::new("out"), "Torso", ".svg", &images);

        assert_eq!(targets.len(), 12);
        assert_eq!(targets[0], PathBuf::from("out/Torso/Torso_01.svg"));
        assert_eq!(targets[11], PathBuf::from("out/Torso/Torso_12.svg"));
    }

    #[test]
    fn test_plan_targets_empty() {
        assert!(plan_targets(Path::new("out"), "Nothing", ".svg", &[]).is_empty());
    }

    #[test]
    fn test_output_name_rejects_dot_names() {
        assert_eq!(output_name("Head".to_string(), "DefineSprite_1_a_Head"), "Head");
        assert_eq!(output_name("..".to_string(), "xa_.."), "xa_..");
        assert_eq!(output_name(".".to_string(), "xa_."), "xa_.");
    }

    #[test]
    fn test_list_export_folders_skips_reserved_prefix() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        for dir in ["DefineSprite_1_a_Head", "sprites_done", "sprites_done_old", "Other"] {
            fs::create_dir(base.join(dir)).unwrap();
        }
        fs::write(base.join("stray.svg"), "x").unwrap();

        let folders = list_export_folders(base, "sprites_done").unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["DefineSprite_1_a_Head", "Other"]);
    }

    #[test]
    fn test_list_images_sorted_and_case_insensitive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        for name in ["3.svg", "1.SVG", "10.svg", "note.txt"] {
            fs::write(base.join(name), name).unwrap();
        }
        fs::create_dir(base.join("nested.svg")).unwrap();

        let images = list_images(base, ".svg").unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["1.SVG", "10.svg", "3.svg"]);
    }

    #[test]
    fn test_fan_out_missing_working_dir() {
        let options = FanOutOptions {
            dry_run: true,
            ..FanOutOptions::new("/non/existent/path")
        };
        let result = fan_out(&options, &NameRules::default());
        assert!(matches!(result, Err(OrganizeError::InvalidSourceDir { .. })));
    }
}
