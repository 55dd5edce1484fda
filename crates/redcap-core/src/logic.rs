//! Branching logic rewriting and the conditions generated for iterations.
//!
//! Field references in REDCap branching logic are written `[field]` or, for a
//! checkbox choice, `[field(code)]`. Unrolling renames fields, so every
//! condition copied into an iteration is passed through an [`IdRewrite`].

use std::collections::HashMap;

/// Field renames visible in one unrolling scope, keyed by original base id.
///
/// Each nested group works on its own copy so renames made for one subgroup
/// never reach its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRewrite {
    renames: HashMap<String, String>,
}

impl IdRewrite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.renames.insert(from.into(), to.into());
    }

    /// The current name of `id`.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.renames.get(id).map_or(id, String::as_str)
    }

    /// Rewrites every `[id]` and `[id(` reference to a renamed field.
    ///
    /// Each reference is examined once, so a rename whose target is itself a
    /// renamed id is never applied twice.
    ///
    /// ```
    /// use redcap_core::IdRewrite;
    ///
    /// let mut rewrite = IdRewrite::new();
    /// rewrite.insert("dose", "dose2");
    /// assert_eq!(
    ///     rewrite.apply("[dose] > 0 and [dose_units(1)]='1' or [dose(3)]='1'"),
    ///     "[dose2] > 0 and [dose_units(1)]='1' or [dose2(3)]='1'"
    /// );
    /// ```
    pub fn apply(&self, logic: &str) -> String {
        if self.renames.is_empty() {
            return logic.to_string();
        }

        let mut out = String::with_capacity(logic.len() + 8);
        let mut rest = logic;
        while let Some(open) = rest.find('[') {
            out.push_str(&rest[..=open]);
            rest = &rest[open + 1..];
            let end = rest.find([']', '(', '[']).unwrap_or(rest.len());
            let (reference, tail) = rest.split_at(end);
            match self.renames.get(reference) {
                Some(renamed) if tail.starts_with([']', '(']) => out.push_str(renamed),
                _ => out.push_str(reference),
            }
            rest = tail;
        }
        out.push_str(rest);
        out
    }
}

/// `condition` restricted by `gate`: `(condition) and gate`.
///
/// A blank condition yields the gate alone; no gate leaves the condition as is.
pub fn conjoin(condition: &str, gate: Option<&str>) -> String {
    match gate {
        Some(gate) if !gate.trim().is_empty() => {
            if condition.trim().is_empty() {
                gate.to_string()
            } else {
                format!("({condition}) and {gate}")
            }
        }
        _ => condition.to_string(),
    }
}

/// Shown while the count in `field` reaches `iteration`.
pub fn at_least(field: &str, iteration: u32) -> String {
    format!("[{field}]>={iteration}")
}

/// True when the single choice of the checkbox `field` is ticked.
pub fn ticked(field: &str) -> String {
    format!("[{field}(1)]='1'")
}

/// True once `field` has a value.
pub fn filled(field: &str) -> String {
    format!("[{field}] <> \"\"")
}

/// True when any of the listed checkbox choices of `field` is ticked.
pub fn any_ticked<'a, I>(field: &str, codes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let checks: Vec<String> = codes
        .into_iter()
        .map(|code| format!("[{field}({code})] = '1'"))
        .collect();
    format!("({})", checks.join(" or "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(pairs: &[(&str, &str)]) -> IdRewrite {
        let mut rewrite = IdRewrite::new();
        for (from, to) in pairs {
            rewrite.insert(*from, *to);
        }
        rewrite
    }

    #[test]
    fn only_whole_references_are_renamed() {
        let rewrite = rewrite(&[("med", "med1")]);
        assert_eq!(
            rewrite.apply("[med] = '1' and [med_name] <> '' and [meds] = 2"),
            "[med1] = '1' and [med_name] <> '' and [meds] = 2"
        );
    }

    #[test]
    fn renames_are_not_chained() {
        let rewrite = rewrite(&[("a", "b"), ("b", "c")]);
        assert_eq!(rewrite.apply("[a] or [b]"), "[b] or [c]");
    }

    #[test]
    fn unterminated_references_are_copied() {
        let rewrite = rewrite(&[("a", "a1")]);
        assert_eq!(rewrite.apply("[a"), "[a");
        assert_eq!(rewrite.apply("[[a]"), "[[a1]");
        assert_eq!(rewrite.apply(""), "");
    }

    #[test]
    fn resolve_falls_back_to_original() {
        let rewrite = rewrite(&[("n", "visit1_n")]);
        assert_eq!(rewrite.resolve("n"), "visit1_n");
        assert_eq!(rewrite.resolve("m"), "m");
    }

    #[test]
    fn conjoin_handles_blank_sides() {
        assert_eq!(conjoin("[a]='1'", Some("[n]>=2")), "([a]='1') and [n]>=2");
        assert_eq!(conjoin("  ", Some("[n]>=2")), "[n]>=2");
        assert_eq!(conjoin("[a]='1'", None), "[a]='1'");
        assert_eq!(conjoin("[a]='1'", Some("")), "[a]='1'");
    }

    #[test]
    fn generated_conditions() {
        assert_eq!(at_least("med_group_no", 3), "[med_group_no]>=3");
        assert_eq!(ticked("med_repeat1"), "[med_repeat1(1)]='1'");
        assert_eq!(filled("med1"), "[med1] <> \"\"");
        assert_eq!(
            any_ticked("sx1", ["1", "2"]),
            "([sx1(1)] = '1' or [sx1(2)] = '1')"
        );
    }
}
