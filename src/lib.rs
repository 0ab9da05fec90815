//! spritesort - organize exported sprite images by naming convention
//!
//! This library groups flat sprite exports into category folders inferred
//! from their file names, and copies sprite-sheet export folders into an
//! output tree under readable asset names.

pub mod category;
pub mod cli;
pub mod config;
pub mod fanout;
pub mod file_organizer;
pub mod output;
pub mod proper_name;

pub use category::{CategoryRules, extract_category};
pub use config::{ConfigError, SorterConfig};
pub use fanout::{FanOutOptions, FanOutReport, fan_out};
pub use file_organizer::{GroupOptions, GroupReport, OrganizeError, organize_by_category};
pub use proper_name::{NameRules, extract_proper_name};

pub use cli::{Cli, SortCommand, run_cli};
