//! Rule identifier to checker bindings.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::checker::GrammarChecker;

/// Immutable mapping from rule identifiers to checkers, with a fallback.
///
/// Built once at start-up through [`CheckerRegistryBuilder`] and then passed
/// by reference into the extraction pipeline.
#[derive(Clone)]
pub struct CheckerRegistry {
    bindings: AHashMap<String, Arc<dyn GrammarChecker>>,
    default: Arc<dyn GrammarChecker>,
}

impl CheckerRegistry {
    /// Start building a registry.
    pub fn builder() -> CheckerRegistryBuilder {
        CheckerRegistryBuilder::default()
    }

    /// A registry with no bindings, sending every rule to `default`.
    pub fn with_default(default: Arc<dyn GrammarChecker>) -> Self {
        Self::builder().build(default)
    }

    /// Get the checker bound to `rule_id`, or the default one.
    pub fn checker_for(&self, rule_id: &str) -> &dyn GrammarChecker {
        self.bindings
            .get(rule_id)
            .map(|checker| &**checker)
            .unwrap_or(&*self.default)
    }

    /// Whether `rule_id` has its own binding.
    pub fn is_bound(&self, rule_id: &str) -> bool {
        self.bindings.contains_key(rule_id)
    }

    /// Number of explicit bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no explicit bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<_> = self
            .bindings
            .iter()
            .map(|(rule, checker)| (rule.as_str(), checker.name()))
            .collect();
        rules.sort_unstable();
        f.debug_struct("CheckerRegistry")
            .field("bindings", &rules)
            .field("default", &self.default.name())
            .finish()
    }
}

/// Collects bindings before freezing them into a [`CheckerRegistry`].
#[derive(Default)]
pub struct CheckerRegistryBuilder {
    bindings: AHashMap<String, Arc<dyn GrammarChecker>>,
}

impl CheckerRegistryBuilder {
    /// Bind a rule identifier to a checker. A later binding for the same
    /// rule replaces the earlier one.
    pub fn bind(mut self, rule_id: impl Into<String>, checker: Arc<dyn GrammarChecker>) -> Self {
        self.bindings.insert(rule_id.into(), checker);
        self
    }

    /// Freeze the bindings with `default` as the fallback checker.
    pub fn build(self, default: Arc<dyn GrammarChecker>) -> CheckerRegistry {
        CheckerRegistry {
            bindings: self.bindings,
            default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::RuleMatch;
    use crate::error::Result;

    struct Named(&'static str);

    impl GrammarChecker for Named {
        fn check(&self, _sentence: &str) -> Result<Vec<RuleMatch>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_lookup_and_fallback() {
        let registry = CheckerRegistry::builder()
            .bind("GERMAN_SPELLER_RULE", Arc::new(Named("de")))
            .bind("MORFOLOGIK_RULE_EN_US", Arc::new(Named("en-us")))
            .build(Arc::new(Named("default")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.checker_for("GERMAN_SPELLER_RULE").name(), "de");
        assert_eq!(registry.checker_for("MORFOLOGIK_RULE_EN_US").name(), "en-us");
        assert_eq!(registry.checker_for("UNKNOWN_RULE").name(), "default");
        assert!(registry.is_bound("GERMAN_SPELLER_RULE"));
        assert!(!registry.is_bound("UNKNOWN_RULE"));
    }

    #[test]
    fn test_later_binding_wins() {
        let registry = CheckerRegistry::builder()
            .bind("R", Arc::new(Named("first")))
            .bind("R", Arc::new(Named("second")))
            .build(Arc::new(Named("default")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.checker_for("R").name(), "second");
    }

    #[test]
    fn test_debug_lists_bindings() {
        let registry = CheckerRegistry::with_default(Arc::new(Named("fallback")));
        let debug = format!("{registry:?}");
        assert!(debug.contains("fallback"));
        assert!(registry.is_empty());
    }
}
