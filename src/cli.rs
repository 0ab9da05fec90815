//! Command-line interface module for spritesort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Merging flags with the loaded configuration
//! - Orchestrating the grouping and renaming pipelines

use crate::config::{DEFAULT_OUTPUT_DIR, SorterConfig, normalize_extension};
use crate::fanout::{FanOutOptions, fan_out};
use crate::file_organizer::{GroupOptions, organize_by_category};
use crate::output::OutputFormatter;
use crate::proper_name::NameRules;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Organize exported sprite images by naming convention.
#[derive(Debug, Parser)]
#[command(name = "spritesort", version, about)]
pub struct Cli {
    /// Configuration file (defaults to .spritesortrc.toml, then ~/.config/spritesort/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: SortCommand,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum SortCommand {
    /// Group files into folders based on name patterns
    Group(GroupArgs),
    /// Copy sprite export folders into the output directory under readable names
    Rename(RenameArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GroupArgs {
    /// Directory containing files to organize
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    pub directory: PathBuf,

    /// Output directory (if not specified, files are organized in place)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File types to process (e.g., .svg .png)
    #[arg(short, long, num_args = 1..)]
    pub types: Vec<String>,

    /// Dry run (don't actually copy files)
    #[arg(short, long)]
    pub dry_run: bool,

    /// Delete all matching top-level files after organizing
    #[arg(long)]
    pub delete_originals: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RenameArgs {
    /// Directory holding the sprite export folders
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Dry run (don't actually copy files)
    #[arg(short, long)]
    pub dry_run: bool,
}

/// Runs the CLI application with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use spritesort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["spritesort", "group", "sprites_done", "--dry-run"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<(), String> {
    let config = SorterConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    run_command(&cli.command, &config)
}

/// Runs a single command against an already loaded configuration.
pub fn run_command(command: &SortCommand, config: &SorterConfig) -> Result<(), String> {
    match command {
        SortCommand::Group(args) => group_command(args, config),
        SortCommand::Rename(args) => rename_command(args, config),
    }
}

/// Builds grouping options; explicit flags override the configuration.
pub fn group_options(args: &GroupArgs, config: &SorterConfig) -> GroupOptions {
    let extensions = if args.types.is_empty() {
        config.group_extensions()
    } else {
        args.types.iter().map(|t| normalize_extension(t)).collect()
    };

    GroupOptions {
        source_dir: args.directory.clone(),
        output_dir: args.output.clone(),
        extensions,
        dry_run: args.dry_run,
        delete_originals: args.delete_originals,
    }
}

/// Builds fan-out options from arguments and configuration.
pub fn rename_options(args: &RenameArgs, config: &SorterConfig) -> FanOutOptions {
    FanOutOptions {
        working_dir: args.directory.clone(),
        output_dir_name: config.rename.output_dir.clone(),
        extension: normalize_extension(&config.rename.extension),
        dry_run: args.dry_run,
    }
}

fn group_command(args: &GroupArgs, config: &SorterConfig) -> Result<(), String> {
    let options = group_options(args, config);
    let rules = config
        .category_rules()
        .map_err(|e| format!("Error compiling category rules: {}", e))?;

    announce(
        "Organizing contents of",
        &options.source_dir,
        options.dry_run,
    );
    if options.delete_originals && !options.dry_run {
        OutputFormatter::warning(
            "--delete-originals is set: every matching top-level file will be removed after copying",
        );
    }

    let report = organize_by_category(&options, &rules).map_err(|e| format!("{}", e))?;

    OutputFormatter::summary_table(&report.category_counts(), report.files_found);
    if options.dry_run {
        OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    }
    Ok(())
}

fn rename_command(args: &RenameArgs, config: &SorterConfig) -> Result<(), String> {
    let options = rename_options(args, config);

    announce("Renaming sprite folders in", &options.working_dir, options.dry_run);

    let report = fan_out(&options, &NameRules::default()).map_err(|e| format!("{}", e))?;

    OutputFormatter::plain(&format!(
        "{} folders processed, {} files {}",
        report.folders.len(),
        report.files_written(),
        if options.dry_run { "planned" } else { "written" }
    ));
    Ok(())
}

fn announce(action: &str, path: &Path, dry_run: bool) {
    let message = format!("{}: {}", action, path.display());
    if dry_run {
        OutputFormatter::dry_run_notice(&message);
    } else {
        OutputFormatter::info(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_defaults() {
        let cli = Cli::parse_from(["spritesort", "group"]);
        let SortCommand::Group(args) = cli.command else {
            panic!("expected group command");
        };
        assert_eq!(args.directory, PathBuf::from("sprites_done"));
        assert!(args.output.is_none());
        assert!(!args.dry_run);
        assert!(!args.delete_originals);

        let options = group_options(&args, &SorterConfig::default());
        assert_eq!(options.extensions, vec![".svg"]);
    }

    #[test]
    fn test_group_flags() {
        let cli = Cli::parse_from([
            "spritesort",
            "group",
            "in",
            "-o",
            "out",
            "-t",
            "SVG",
            "..png",
            "-d",
            "--delete-originals",
        ]);
        let SortCommand::Group(args) = cli.command else {
            panic!("expected group command");
        };
        let options = group_options(&args, &SorterConfig::default());

        assert_eq!(options.source_dir, PathBuf::from("in"));
        assert_eq!(options.output_dir, Some(PathBuf::from("out")));
        assert_eq!(options.extensions, vec![".svg", ".png"]);
        assert!(options.dry_run);
        assert!(options.delete_originals);
    }

    #[test]
    fn test_types_from_config_when_flag_absent() {
        let config = SorterConfig::from_toml("[group]\ntypes = [\"png\"]").unwrap();
        let cli = Cli::parse_from(["spritesort", "group", "in"]);
        let SortCommand::Group(args) = cli.command else {
            panic!("expected group command");
        };
        assert_eq!(group_options(&args, &config).extensions, vec![".png"]);
    }

    #[test]
    fn test_rename_defaults() {
        let cli = Cli::parse_from(["spritesort", "rename"]);
        let SortCommand::Rename(args) = cli.command else {
            panic!("expected rename command");
        };
        let options = rename_options(&args, &SorterConfig::default());

        assert_eq!(options.working_dir, PathBuf::from("."));
        assert_eq!(options.output_dir_name, "sprites_done");
        assert_eq!(options.extension, ".svg");
        assert!(!options.dry_run);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["spritesort", "rename", "--config", "custom.toml", "-d"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
