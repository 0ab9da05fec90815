//! Category extraction from sprite export filenames.
//!
//! Exported sprite files follow loose naming conventions such as
//! `_IconArtStoreFront14.svg` or `DefineSprite_539__FrameBendBronze01/1.svg`.
//! This module infers a grouping label from those names by running an
//! ordered cascade of rules, first match wins.
//!
//! # Examples
//!
//! ```
//! use spritesort::category::extract_category;
//!
//! assert_eq!(extract_category("_IconArtStoreFront14.svg"), "IconArt");
//! assert_eq!(extract_category("DefineSprite_539__FrameBendBronze01/1.svg"), "Frame");
//! assert_eq!(extract_category("DefineSprite_10__Zorblat99.svg"), "Zorblat");
//! ```

use crate::config::ConfigError;
use regex::Regex;
use std::sync::LazyLock;

/// Keywords recognised as categories, in priority order.
///
/// `Frame` sits before `Doodad`, `Window` and `Button`, so a name such as
/// `FrameDoodadThing.svg` always lands in `Frame`.
pub const DEFAULT_KEYWORDS: [&str; 5] = ["IconArt", "Frame", "Doodad", "Window", "Button"];

static DEFAULT_RULES: LazyLock<CategoryRules> = LazyLock::new(CategoryRules::default);

/// The step of the cascade that produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStep {
    /// The final path segment starts with a known keyword.
    KnownPrefix,
    /// The text after the first `__` starts with a known keyword.
    DoubleUnderscoreKnown,
    /// The leading letters after the first `__`.
    DoubleUnderscoreLetters,
    /// The leading letters after a single leading underscore.
    LeadingUnderscoreLetters,
    /// The filename without its extension.
    FileStem,
}

/// Order in which the cascade is evaluated.
const CASCADE: [CategoryStep; 5] = [
    CategoryStep::KnownPrefix,
    CategoryStep::DoubleUnderscoreKnown,
    CategoryStep::DoubleUnderscoreLetters,
    CategoryStep::LeadingUnderscoreLetters,
    CategoryStep::FileStem,
];

/// Result of classifying a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    /// The category label, never empty for non-empty input.
    pub label: String,
    /// The cascade step that produced the label.
    pub step: CategoryStep,
}

/// A keyword prefix rule: an optional underscore followed by the keyword.
#[derive(Debug, Clone)]
struct PrefixRule {
    pattern: Regex,
    label: String,
}

impl PrefixRule {
    fn new(keyword: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^_?{}", regex::escape(keyword)))?,
            label: keyword.to_string(),
        })
    }
}

/// Ordered table of category rules.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    prefixes: Vec<PrefixRule>,
}

impl CategoryRules {
    /// Builds a rule table from keywords, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKeyword` for a keyword that cannot name a
    /// single directory: empty, `.`, `..`, or containing a path separator.
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, ConfigError> {
        let prefixes = keywords
            .iter()
            .map(|keyword| {
                let keyword = keyword.as_ref();
                if !is_plain_dir_name(keyword) {
                    return Err(ConfigError::InvalidKeyword {
                        keyword: keyword.to_string(),
                        reason: "keyword must be a plain directory name".to_string(),
                    });
                }
                PrefixRule::new(keyword).map_err(|e| ConfigError::InvalidKeyword {
                    keyword: keyword.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { prefixes })
    }

    /// Returns the keywords in evaluation order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(|rule| rule.label.as_str())
    }

    /// Extracts the category label for a filename.
    pub fn extract(&self, filename: &str) -> String {
        self.classify(filename).label
    }

    /// Classifies a filename, reporting which cascade step matched.
    ///
    /// Keyword and underscore rules look at the final `/`-separated segment.
    /// The double-underscore split runs on the whole input, so a `__` in a
    /// directory segment is honoured too.
    pub fn classify(&self, filename: &str) -> CategoryMatch {
        let segment = filename.rsplit('/').next().unwrap_or(filename);
        let after_double = filename.split_once("__").map(|(_, rest)| rest);

        for step in CASCADE {
            let label = match step {
                CategoryStep::KnownPrefix => self.known_prefix(segment),
                CategoryStep::DoubleUnderscoreKnown => {
                    after_double.and_then(|rest| self.known_prefix(rest))
                }
                CategoryStep::DoubleUnderscoreLetters => {
                    after_double.and_then(leading_letters)
                }
                CategoryStep::LeadingUnderscoreLetters => {
                    segment.strip_prefix('_').and_then(leading_letters)
                }
                CategoryStep::FileStem => Some(file_stem(filename, segment)),
            };

            if let Some(label) = label {
                return CategoryMatch { label, step };
            }
        }

        // FileStem always yields a label
        CategoryMatch {
            label: filename.to_string(),
            step: CategoryStep::FileStem,
        }
    }

    fn known_prefix(&self, text: &str) -> Option<String> {
        self.prefixes
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.label.clone())
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_KEYWORDS
                .iter()
                .filter_map(|keyword| PrefixRule::new(keyword).ok())
                .collect(),
        }
    }
}

/// The leading run of ASCII letters, if any.
fn leading_letters(text: &str) -> Option<String> {
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    (end > 0).then(|| text[..end].to_string())
}

/// True for a name that stays inside its parent when joined as a path.
pub fn is_plain_dir_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Last-resort label: the segment without its extension.
///
/// Leading dots never start an extension, so `..svg` and `...svg` are kept
/// whole.
fn file_stem(filename: &str, segment: &str) -> String {
    let stem = match segment.rfind('.') {
        Some(dot) if !segment[..dot].trim_start_matches('.').is_empty() => &segment[..dot],
        _ => segment,
    };

    if !stem.is_empty() {
        stem.to_string()
    } else if !segment.is_empty() {
        segment.to_string()
    } else {
        filename.to_string()
    }
}

/// Extracts a category using the default keyword table.
///
/// ```
/// use spritesort::category::extract_category;
///
/// assert_eq!(extract_category("FrameDoodadThing.svg"), "Frame");
/// assert_eq!(extract_category("_WindowSkinHeaderTalents.svg"), "Window");
/// assert_eq!(extract_category("lonely.svg"), "lonely");
/// ```
pub fn extract_category(filename: &str) -> String {
    DEFAULT_RULES.extract(filename)
}
