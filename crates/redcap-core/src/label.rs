//! Per-iteration label rendering.
//!
//! | Token | Value |
//! |-------|-------|
//! | `$d` | current iteration number |
//! | `$s` | current iteration as an ordinal (`1st`, `2nd`, ...) |
//! | `$dK` / `$sK` | iteration of nesting level `K`, 1 being the outermost group |

use redcap_common::{ordinal, safe_substitute};
use regex::RegexBuilder;

/// Renders `label` for one iteration.
///
/// `levels` holds the iteration of every enclosing group, outermost first,
/// followed by the current one. When the label has no token that resolves,
/// the iteration number is inserted after the first case-insensitive
/// occurrence of `group_name` instead.
pub fn iteration_label(label: &str, group_name: &str, levels: &[u32]) -> String {
    let Some(&current) = levels.last() else {
        return label.to_string();
    };

    let rendered = safe_substitute(label, |token| match token {
        "d" => Some(current.to_string()),
        "s" => Some(ordinal(current)),
        _ => {
            let (kind, level) = token.split_at(1);
            let level: usize = level.parse().ok()?;
            let iteration = *levels.get(level.checked_sub(1)?)?;
            match kind {
                "d" => Some(iteration.to_string()),
                "s" => Some(ordinal(iteration)),
                _ => None,
            }
        }
    });
    if rendered != label {
        return rendered;
    }

    number_group_name(label, group_name, current)
}

/// Inserts ` {iteration}` after the first occurrence of `group_name`.
fn number_group_name(label: &str, group_name: &str, iteration: u32) -> String {
    if group_name.is_empty() {
        return label.to_string();
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(group_name))
        .case_insensitive(true)
        .build()
    else {
        return label.to_string();
    };
    match pattern.find(label) {
        Some(found) => format!(
            "{} {iteration}{}",
            &label[..found.end()],
            &label[found.end()..]
        ),
        None => label.to_string(),
    }
}
