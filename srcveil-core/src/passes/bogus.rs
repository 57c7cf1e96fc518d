//! Dead-code injection pass
//!
//! Prepends N placeholder routines under a comment banner. Each routine is
//! a trivial loop whose bound cycles through {1, 2, 3} by index, so the
//! injected text is fully deterministic in N.

use std::fmt::Write as _;

/// Prepend `count` bogus routines to the source.
///
/// A count of zero leaves the text untouched. Returns the rewritten text
/// and the number of routines injected.
pub fn insert_bogus_functions(source: &str, count: u32) -> (String, usize) {
    if count == 0 {
        return (source.to_string(), 0);
    }

    let mut block = String::from("\n/* bogus functions inserted (demo) */\n");
    for i in 0..count {
        let _ = writeln!(
            block,
            "static void __bogus{i}(){{ volatile int x={i}; for(int j=0;j<{}; ++j) x += j; }}",
            (i % 3) + 1
        );
    }

    (format!("{}\n{}", block, source), count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_is_noop() {
        let (out, added) = insert_bogus_functions("int main(){}", 0);
        assert_eq!(added, 0);
        assert_eq!(out, "int main(){}");
        assert!(!out.contains("bogus"));
    }

    #[test]
    fn test_exact_count_injected() {
        let (out, added) = insert_bogus_functions("int main(){}", 5);
        assert_eq!(added, 5);
        for i in 0..5 {
            assert!(out.contains(&format!("__bogus{}", i)));
        }
        assert!(!out.contains("__bogus5"));
        assert!(out.contains("/* bogus functions inserted (demo) */"));
    }

    #[test]
    fn test_loop_bounds_cycle() {
        let (out, _) = insert_bogus_functions("", 4);
        assert!(out.contains("__bogus0(){ volatile int x=0; for(int j=0;j<1;"));
        assert!(out.contains("__bogus1(){ volatile int x=1; for(int j=0;j<2;"));
        assert!(out.contains("__bogus2(){ volatile int x=2; for(int j=0;j<3;"));
        assert!(out.contains("__bogus3(){ volatile int x=3; for(int j=0;j<1;"));
    }

    #[test]
    fn test_deterministic_for_same_count() {
        let (a, _) = insert_bogus_functions("int x;", 7);
        let (b, _) = insert_bogus_functions("int x;", 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_original_source_preserved_after_block() {
        let (out, _) = insert_bogus_functions("int main(){ return 0; }", 2);
        assert!(out.ends_with("int main(){ return 0; }"));
    }
}
