//! Property-based tests for definition parsing and variant resolution.
//! Verifies invariants hold for ALL generated inputs, not just fixed examples.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use hal_select::{parse_cflags, Define, HalName, HalSelector, SelectionSource};

proptest::proptest! {
    /// Any accepted HAL value resolves to exactly its lowercase form.
    #[test]
    fn resolved_name_is_lowercase_of_value(value in "[A-Za-z][A-Za-z0-9_]{0,15}") {
        let selector = HalSelector::new("/proj");
        let (name, source) = selector
            .resolve_variant(&[Define::pair("HAL", value.clone())])
            .unwrap();
        assert_eq!(name.as_str(), value.to_lowercase());
        assert_eq!(source, SelectionSource::Defined);
    }

    /// Lists without a HAL pair always resolve to the default.
    #[test]
    fn lists_without_hal_pair_resolve_to_posix(
        names in proptest::collection::vec("[A-Z]{1,8}", 0..8)
    ) {
        let defs: Vec<Define> = names
            .iter()
            .filter(|n| n.as_str() != "HAL")
            .map(|n| Define::pair(n.as_str(), "1"))
            .chain(std::iter::once(Define::bare("HAL")))
            .collect();
        let (name, source) = HalSelector::new("/proj").resolve_variant(&defs).unwrap();
        assert_eq!(name.as_str(), "posix");
        assert_eq!(source, SelectionSource::Default);
    }

    /// HalName::new never panics, and accepted names never contain separators.
    #[test]
    fn hal_name_never_escapes(value in "\\PC{0,12}") {
        if let Ok(name) = HalName::new(&value) {
            assert!(!name.as_str().contains('/'));
            assert!(!name.as_str().contains('\\'));
            assert_ne!(name.as_str(), "..");
        }
    }

    /// Joined `-D` flags parse back to the same definitions, in order.
    #[test]
    fn cflags_preserve_order(
        pairs in proptest::collection::vec(("[A-Z][A-Z0-9_]{0,7}", "[a-z0-9]{1,6}"), 0..6)
    ) {
        let flags: Vec<String> = pairs.iter().map(|(n, v)| format!("-D{n}={v}")).collect();
        let parsed = parse_cflags(&flags.join(" -Wall ")).unwrap();
        let expected: Vec<Define> = pairs
            .iter()
            .map(|(n, v)| Define::pair(n.as_str(), v.as_str()))
            .collect();
        assert_eq!(parsed, expected);
    }
}
