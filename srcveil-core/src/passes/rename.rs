//! Identifier substitution pass
//!
//! Assigns each identifier a stable sequential alias (`v1001`, `v1002`, ...)
//! in order of first appearance and reuses it on every later occurrence.
//! Common C/C++ keywords and a small set of library identifiers are left
//! alone. There is no scope awareness: textually identical identifiers from
//! unrelated scopes collapse onto one alias.

use std::collections::{HashMap, HashSet};

use regex::Regex;

/// Identifiers that are never renamed (keywords plus common library names)
const EXCLUDED: &[&str] = &[
    "int", "return", "for", "while", "if", "else", "printf", "cout", "using", "namespace", "std",
    "include", "main", "void", "char", "double", "float", "long", "short", "unsigned", "signed",
    "extern", "static", "const",
];

/// Rename every non-excluded identifier to its per-request alias.
///
/// Returns the rewritten text and the number of distinct identifiers that
/// received an alias.
pub fn rename_identifiers(source: &str) -> (String, usize) {
    let re = Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").unwrap();
    let skip: HashSet<&str> = EXCLUDED.iter().copied().collect();
    let mut aliases: HashMap<String, String> = HashMap::new();

    let out = re.replace_all(source, |caps: &regex::Captures| {
        let ident = &caps[0];
        if skip.contains(ident) {
            return ident.to_string();
        }
        let next = aliases.len() + 1;
        aliases
            .entry(ident.to_string())
            .or_insert_with(|| format!("v{}", 1000 + next))
            .clone()
    });

    let count = aliases.len();
    (out.into_owned(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_numbered_by_first_appearance() {
        let (out, count) = rename_identifiers("int foo; int bar; foo = bar;");
        assert_eq!(count, 2);
        assert_eq!(out, "int v1001; int v1002; v1001 = v1002;");
    }

    #[test]
    fn test_same_identifier_maps_to_same_alias() {
        let (out, _) = rename_identifiers("counter = counter + counter;");
        assert_eq!(out, "v1001 = v1001 + v1001;");
    }

    #[test]
    fn test_distinct_identifiers_get_distinct_aliases() {
        let (out, count) = rename_identifiers("a b c d");
        assert_eq!(count, 4);
        assert_eq!(out, "v1001 v1002 v1003 v1004");
    }

    #[test]
    fn test_keywords_untouched() {
        let (out, count) = rename_identifiers("int main(void) { return 0; }");
        assert_eq!(count, 0);
        assert_eq!(out, "int main(void) { return 0; }");
    }

    #[test]
    fn test_library_names_untouched() {
        let (out, _) = rename_identifiers("std cout printf total");
        assert_eq!(out, "std cout printf v1001");
    }

    #[test]
    fn test_underscore_identifiers_renamed() {
        let (out, count) = rename_identifiers("_private _private");
        assert_eq!(count, 1);
        assert_eq!(out, "v1001 v1001");
    }
}
