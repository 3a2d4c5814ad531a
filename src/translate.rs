// src/translate.rs

//! Prefix-based path translation.
//!
//! Rewrites path arguments so that a location named inside the client's
//! environment (a VM, a container) points at the equivalent location on
//! the host.

use crate::config::MappingRule;

/// Apply the configured substitution rules to one path.
///
/// Each rule replaces the first occurrence of its `from` prefix with `to`,
/// at most once. Rules run in declared order on the result of the previous
/// rule, so later rules see earlier replacements. A rule without a match
/// leaves the path unchanged. Separators come out in the host's native
/// convention.
pub fn translate(rules: &[MappingRule], path: &str) -> String {
    let mut out = path.to_string();
    for rule in rules {
        out = out.replacen(&rule.from, &rule.to, 1);
    }
    from_slash(out)
}

/// Translate a list of paths element-wise, preserving order and count.
pub fn translate_all(rules: &[MappingRule], paths: &[String]) -> Vec<String> {
    paths.iter().map(|path| translate(rules, path)).collect()
}

#[cfg(windows)]
fn from_slash(path: String) -> String {
    path.replace('/', "\\")
}

#[cfg(not(windows))]
fn from_slash(path: String) -> String {
    path
}
