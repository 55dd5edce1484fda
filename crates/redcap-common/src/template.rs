//! Safe `$name` template substitution.
//!
//! Data dictionary cells use shell-style placeholders: `$name`, `${name}` and
//! `$$` for a literal dollar sign. Substitution is *safe*: a placeholder the
//! lookup does not know is left in the output exactly as written.

/// Substitutes every `$name` / `${name}` placeholder that `lookup` resolves.
///
/// Identifiers follow `[A-Za-z_][A-Za-z0-9_]*`. Unresolved placeholders and a
/// lone `$` are copied through unchanged; `$$` always collapses to `$`.
///
/// # Examples
///
/// ```
/// use redcap_common::safe_substitute;
///
/// let out = safe_substitute("Dose $d of ${total}, $other", |name| match name {
///     "d" => Some("2".to_string()),
///     "total" => Some("3".to_string()),
///     _ => None,
/// });
/// assert_eq!(out, "Dose 2 of 3, $other");
/// assert_eq!(safe_substitute("costs $$5", |_| None), "costs $5");
/// ```
pub fn safe_substitute<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(stripped) = after.strip_prefix('$') {
            out.push('$');
            rest = stripped;
            continue;
        }

        if let Some(inner) = after.strip_prefix('{') {
            if let Some(end) = inner.find('}') {
                let name = &inner[..end];
                if !name.is_empty()
                    && identifier_len(name) == name.len()
                    && let Some(value) = lookup(name)
                {
                    out.push_str(&value);
                    rest = &inner[end + 1..];
                    continue;
                }
            }
            out.push('$');
            rest = after;
            continue;
        }

        let len = identifier_len(after);
        if len > 0 {
            let name = &after[..len];
            match lookup(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
            continue;
        }

        out.push('$');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Replaces the `$placeholder` token used by label and section header cells.
pub fn fill_placeholder(text: &str, value: &str) -> String {
    safe_substitute(text, |name| (name == "placeholder").then(|| value.to_string()))
}

/// Returns true if `text` contains the braced placeholder `${name}`.
pub fn has_braced_placeholder(text: &str, name: &str) -> bool {
    text.contains(&format!("${{{name}}}"))
}

/// Length of the leading identifier in `text`, or 0 when there is none.
fn identifier_len(text: &str) -> usize {
    let mut len = 0;
    for (idx, ch) in text.char_indices() {
        let valid = if idx == 0 {
            ch.is_ascii_alphabetic() || ch == '_'
        } else {
            ch.is_ascii_alphanumeric() || ch == '_'
        };
        if !valid {
            break;
        }
        len = idx + ch.len_utf8();
    }
    len
}
