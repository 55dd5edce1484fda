//! Identifier and wording helpers.

/// Turns free text into an identifier fragment.
///
/// Spaces, slashes and parentheses become underscores and the result is
/// lower-cased.
///
/// # Examples
///
/// ```
/// use redcap_common::clean_identifier;
///
/// assert_eq!(clean_identifier("Normal Range Minimum"), "normal_range_minimum");
/// assert_eq!(clean_identifier("Unknown/Not documented"), "unknown_not_documented");
/// assert_eq!(clean_identifier("Other (specify)"), "other__specify_");
/// ```
pub fn clean_identifier(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            ' ' | '/' | '(' | ')' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// English ordinal suffix for a number (`st`, `nd`, `rd`, `th`).
pub fn ordinal_suffix(number: u32) -> &'static str {
    if (11..=19).contains(&(number % 100)) {
        return "th";
    }
    match number % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Number followed by its ordinal suffix.
///
/// # Examples
///
/// ```
/// use redcap_common::ordinal;
///
/// assert_eq!(ordinal(1), "1st");
/// assert_eq!(ordinal(12), "12th");
/// assert_eq!(ordinal(23), "23rd");
/// ```
pub fn ordinal(number: u32) -> String {
    format!("{number}{}", ordinal_suffix(number))
}

/// Lower-cases a display name unless it is written entirely in capitals.
///
/// Acronyms such as `MRI` keep their case when used mid-sentence.
pub fn display_case(name: &str) -> String {
    let has_cased = name.chars().any(char::is_alphabetic);
    let all_upper = name
        .chars()
        .filter(|ch| ch.is_alphabetic())
        .all(char::is_uppercase);
    if has_cased && all_upper {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}
