//! Configuration options for form expansion.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Default number of iterations when a referenced count has no upper bound.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Choice labels treated as "none/unknown" answers by `checkbox_mutex` fields.
pub const DEFAULT_MUTEX_SYNONYMS: [&str; 5] = [
    "none",
    "unknown",
    "result not known",
    "unknown/not documented",
    "unknown or not reported",
];

/// How the number of visible iterations of a group is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UxScheme {
    /// A "how many ...?" field precedes the group.
    #[default]
    Upfront,
    /// An "add another?" checkbox follows every iteration but the last.
    PromptToAddAnother,
    /// The next iteration appears once the previous one's first field is filled.
    AutoReveal,
}

impl UxScheme {
    /// Whether the scheme inserts the upfront count field.
    pub fn asks_count_upfront(self) -> bool {
        matches!(self, Self::Upfront)
    }
}

/// Options controlling both expansion passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    /// Emit validation types and bounds. When false they are cleared on every
    /// unrolled record.
    pub validation_enabled: bool,

    pub ux_scheme: UxScheme,

    /// Iteration count used when a referenced count field has no numeric
    /// upper bound.
    pub default_max_iterations: u32,

    /// Word used instead of the pluralized group name in generated prompts,
    /// e.g. `items` gives "How many medication items would you like to enter?".
    pub group_display_name: Option<String>,

    /// Lower-cased choice labels that may not be combined with other answers.
    pub mutex_synonyms: Vec<String>,

    /// Lower-cased singular group name to plural, consulted before the
    /// pluralizer.
    #[serde(deserialize_with = "lowercase_keys")]
    pub irregular_plurals: BTreeMap<String, String>,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            validation_enabled: true,
            ux_scheme: UxScheme::default(),
            default_max_iterations: DEFAULT_MAX_ITERATIONS,
            group_display_name: None,
            mutex_synonyms: DEFAULT_MUTEX_SYNONYMS
                .iter()
                .map(|synonym| (*synonym).to_string())
                .collect(),
            irregular_plurals: BTreeMap::new(),
        }
    }
}

impl ExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_ux_scheme(mut self, scheme: UxScheme) -> Self {
        self.ux_scheme = scheme;
        self
    }

    #[must_use]
    pub fn with_default_max_iterations(mut self, max: u32) -> Self {
        self.default_max_iterations = max;
        self
    }

    #[must_use]
    pub fn with_group_display_name(mut self, name: Option<String>) -> Self {
        self.group_display_name = name;
        self
    }

    /// Replaces the irregular plural table. Keys are lower-cased.
    #[must_use]
    pub fn with_irregular_plurals(mut self, plurals: BTreeMap<String, String>) -> Self {
        self.irregular_plurals = lowercased(plurals);
        self
    }

    /// Irregular plural for a group name, matched case-insensitively.
    pub fn irregular_plural(&self, name: &str) -> Option<&str> {
        self.irregular_plurals
            .get(&name.to_lowercase())
            .map(String::as_str)
    }
}

fn lowercased(plurals: BTreeMap<String, String>) -> BTreeMap<String, String> {
    plurals
        .into_iter()
        .map(|(singular, plural)| (singular.to_lowercase(), plural))
        .collect()
}

fn lowercase_keys<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::deserialize(deserializer).map(lowercased)
}
