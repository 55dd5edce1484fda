//! Group display names and their plurals.
//!
//! The upfront count field asks "How many medications ...?", so every group
//! name needs a plural. Plurals come from, in order: the configured group name
//! override, the irregular plural table, then a [`Pluralize`] implementation.

use std::sync::LazyLock;

use redcap_common::display_case;
use redcap_model::ExpandOptions;
use regex::Regex;

/// `Words (qualifier)`: only `Words` is pluralized.
static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9 ]*)(\([a-zA-Z0-9 ]*\))").expect("Invalid qualified name regex")
});

/// Turns a singular noun phrase into its plural.
pub trait Pluralize: Send + Sync {
    fn pluralize(&self, phrase: &str) -> String;
}

/// Rule-based English plurals for the last word of a phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

const UNCOUNTABLE: [&str; 12] = [
    "data",
    "deer",
    "equipment",
    "fish",
    "information",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
    "staff",
];

const IRREGULAR: [(&str, &str); 8] = [
    ("child", "children"),
    ("foot", "feet"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
    ("ox", "oxen"),
];

const VES: [&str; 10] = [
    "calf", "half", "knife", "leaf", "life", "loaf", "shelf", "thief", "wife", "wolf",
];

impl EnglishPluralizer {
    fn word(word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        if word.chars().all(|ch| !ch.is_alphabetic() || ch.is_uppercase()) {
            // Acronyms: BP -> BPs
            return format!("{word}s");
        }

        let lower = word.to_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
            return match_initial_case(word, plural);
        }
        if VES.contains(&lower.as_str()) {
            let stem = word
                .strip_suffix("fe")
                .or_else(|| word.strip_suffix('f'))
                .unwrap_or(word);
            return format!("{stem}ves");
        }
        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| lower.ends_with(*suffix))
        {
            return format!("{word}es");
        }
        if let Some(stem) = word.strip_suffix('y')
            && stem
                .chars()
                .last()
                .is_some_and(|ch| !"aeiouAEIOU".contains(ch))
        {
            return format!("{stem}ies");
        }
        format!("{word}s")
    }
}

fn match_initial_case(original: &str, plural: &str) -> String {
    let mut chars = plural.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(plural_first)) if first.is_uppercase() => {
            plural_first.to_uppercase().chain(chars).collect()
        }
        _ => plural.to_string(),
    }
}

impl Pluralize for EnglishPluralizer {
    fn pluralize(&self, phrase: &str) -> String {
        let phrase = phrase.trim_end();
        match phrase.rsplit_once(' ') {
            Some((head, last)) => format!("{head} {}", Self::word(last)),
            None => Self::word(phrase),
        }
    }
}

/// Wording derived from a group's display name.
#[derive(Clone, Copy)]
pub struct GroupNamer<'a> {
    options: &'a ExpandOptions,
    pluralizer: &'a dyn Pluralize,
}

impl<'a> GroupNamer<'a> {
    pub fn new(options: &'a ExpandOptions, pluralizer: &'a dyn Pluralize) -> Self {
        Self {
            options,
            pluralizer,
        }
    }

    /// The phrase standing for all iterations of the group, e.g.
    /// `medications` or, with a `items` override, `medication items`.
    pub fn collective(&self, name: &str) -> String {
        if let Some(word) = &self.options.group_display_name {
            return format!("{} {word}", display_case(name));
        }
        if let Some(plural) = self.options.irregular_plural(name) {
            return plural.to_string();
        }
        if let Some(captures) = QUALIFIED_NAME.captures(name)
            && let (Some(words), Some(qualifier)) = (captures.get(1), captures.get(2))
        {
            let words = display_case(words.as_str().trim());
            return format!("{} {}", self.pluralizer.pluralize(&words), qualifier.as_str());
        }
        self.pluralizer.pluralize(&display_case(name))
    }

    /// Label of the upfront count field.
    pub fn count_prompt(&self, name: &str, max: u32) -> String {
        format!(
            "How many {} would you like to enter (up to {max})?",
            self.collective(name)
        )
    }
}
