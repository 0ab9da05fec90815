//! Proper-name extraction for sprite-sheet export folders.
//!
//! Sprite exporters name their output folders after the internal symbol,
//! e.g. `DefineSprite_2_a_WaistSide_ThunderGolem`. The readable asset name
//! is the tail of that string.
//!
//! # Examples
//!
//! ```
//! use spritesort::proper_name::extract_proper_name;
//!
//! assert_eq!(
//!     extract_proper_name("DefineSprite_2_a_WaistSide_ThunderGolem"),
//!     "WaistSide_ThunderGolem"
//! );
//! assert_eq!(extract_proper_name("NoPatternHere"), "NoPatternHere");
//! ```

use regex::Regex;
use std::sync::LazyLock;

static DEFAULT_RULES: LazyLock<NameRules> = LazyLock::new(NameRules::new);

/// Which rule produced a proper name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRuleKind {
    /// Everything after the first `a_`.
    AfterAPrefix,
    /// Everything after `DefineSprite_<digits>_`.
    DefineSpriteId,
}

/// Result of extracting a proper name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProperNameMatch {
    /// The extracted name.
    pub name: String,
    /// The rule that matched, `None` when the folder name was kept as is.
    pub rule: Option<NameRuleKind>,
}

#[derive(Debug, Clone)]
struct NameRule {
    kind: NameRuleKind,
    pattern: Regex,
    group: usize,
}

/// Ordered table of folder-name rules, first match wins.
#[derive(Debug, Clone)]
pub struct NameRules {
    rules: Vec<NameRule>,
}

impl NameRules {
    /// Builds the standard rule table.
    pub fn new() -> Self {
        let table = [
            (NameRuleKind::AfterAPrefix, r"a_(.+)$", 1),
            (NameRuleKind::DefineSpriteId, r"DefineSprite_(\d+)_(.+)$", 2),
        ];

        let rules = table
            .into_iter()
            .filter_map(|(kind, pattern, group)| {
                Regex::new(pattern).ok().map(|pattern| NameRule {
                    kind,
                    pattern,
                    group,
                })
            })
            .collect();

        Self { rules }
    }

    /// Extracts the proper name for a folder name.
    pub fn extract(&self, folder_name: &str) -> String {
        self.classify(folder_name).name
    }

    /// Extracts the proper name and reports which rule matched.
    ///
    /// Rules search anywhere in the string; the first rule with a match
    /// wins. Unmatched names come back unchanged.
    pub fn classify(&self, folder_name: &str) -> ProperNameMatch {
        for rule in &self.rules {
            if let Some(found) = rule
                .pattern
                .captures(folder_name)
                .and_then(|caps| caps.get(rule.group))
            {
                return ProperNameMatch {
                    name: found.as_str().to_string(),
                    rule: Some(rule.kind),
                };
            }
        }

        ProperNameMatch {
            name: folder_name.to_string(),
            rule: None,
        }
    }
}

impl Default for NameRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts a proper name using the standard rule table.
pub fn extract_proper_name(folder_name: &str) -> String {
    DEFAULT_RULES.extract(folder_name)
}
