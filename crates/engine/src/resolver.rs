//! Intent resolution
//!
//! Maps free-form visitor text onto the fixed response catalog using
//! ordered substring matching. Matching is case-insensitive; no other
//! normalization is applied. Catalog order is the tie-break: the first
//! entry with a firing trigger wins, so "course and fee" resolves to
//! the course answer.

use std::sync::Arc;

use chat_widget_config::{IntentCatalog, IntentEntry};

/// Resolves visitor text to a canned response
///
/// Resolution is pure and stateless: identical input always yields the
/// same output.
pub struct IntentResolver {
    catalog: Arc<IntentCatalog>,
}

impl IntentResolver {
    /// Create a resolver over a catalog
    pub fn new(catalog: Arc<IntentCatalog>) -> Self {
        Self { catalog }
    }

    /// Find the first catalog entry with a trigger contained in the input
    ///
    /// Triggers are substrings, not whole words: "coursework" fires the
    /// "course" trigger.
    pub fn classify(&self, text: &str) -> Option<&IntentEntry> {
        let normalized = text.to_lowercase();
        self.catalog
            .entries
            .iter()
            .find(|entry| entry.triggers.iter().any(|t| normalized.contains(t.as_str())))
    }

    /// Resolve input to a response, falling back to the default when no
    /// trigger matches
    pub fn resolve(&self, text: &str) -> &str {
        self.classify(text)
            .map(|entry| entry.response.as_str())
            .unwrap_or(self.catalog.default_response.as_str())
    }

    /// Get the underlying catalog
    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> IntentResolver {
        IntentResolver::new(Arc::new(IntentCatalog::builtin()))
    }

    #[test]
    fn test_each_entry_resolves() {
        let resolver = resolver();
        let cases = [
            ("What courses do you offer?", "courses"),
            ("How to apply for admission?", "admission"),
            ("What is the fee structure?", "fees"),
            ("Do you have hostel facilities?", "hostel"),
            ("What are the eligibility criteria?", "eligibility"),
            ("Is the institute government recognized?", "recognition"),
            ("What are the class timings?", "timings"),
            ("Do you provide placement assistance?", "placement"),
            ("What is the course duration?", "courses"), // "course" fires first
            ("Do you offer online classes?", "online"),
        ];
        for (input, expected_key) in cases {
            let entry = resolver.classify(input).unwrap_or_else(|| {
                panic!("expected a match for {input:?}");
            });
            assert_eq!(entry.key, expected_key, "input: {input:?}");
        }
    }

    #[test]
    fn test_alternate_triggers() {
        let resolver = resolver();
        assert_eq!(resolver.classify("What is your class schedule?").unwrap().key, "timings");
        assert_eq!(resolver.classify("Will I get a job after this?").unwrap().key, "placement");
        assert_eq!(resolver.classify("What is the program length?").unwrap().key, "duration");
        assert_eq!(resolver.classify("Is distance learning available?").unwrap().key, "online");
    }

    #[test]
    fn test_catalog_order_breaks_ties() {
        let resolver = resolver();
        // "course" (entry 1) is tested before "fee" (entry 3)
        assert_eq!(resolver.classify("course and fee").unwrap().key, "courses");
        // "apply" (entry 2) before "hostel" (entry 4)
        assert_eq!(
            resolver.classify("can I apply for hostel").unwrap().key,
            "admission"
        );
    }

    #[test]
    fn test_case_insensitive() {
        let resolver = resolver();
        assert_eq!(resolver.classify("FEE structure").unwrap().key, "fees");
        assert_eq!(resolver.classify("CoUrSe").unwrap().key, "courses");
    }

    #[test]
    fn test_substring_not_whole_word() {
        let resolver = resolver();
        assert_eq!(resolver.classify("my coursework").unwrap().key, "courses");
        assert_eq!(resolver.classify("eligibility?").unwrap().key, "eligibility");
    }

    #[test]
    fn test_fallback() {
        let resolver = resolver();
        assert!(resolver.classify("hello there").is_none());
        assert_eq!(
            resolver.resolve("hello there"),
            resolver.catalog().default_response
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = resolver();
        let first = resolver.resolve("fee details please").to_string();
        for _ in 0..3 {
            assert_eq!(resolver.resolve("fee details please"), first);
        }
    }
}
