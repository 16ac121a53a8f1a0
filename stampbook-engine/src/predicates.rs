//! Registration table for `named` requirements.
//!
//! A named requirement carries only a string key. The game registers the
//! predicate behind each key up front; evaluation then looks it up here.
//! Keys nobody registered evaluate as incomplete.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::progress::Progress;
use crate::stats::PlayerStatistics;

pub type PredicateFn = Arc<dyn Fn(&PlayerStatistics) -> Progress + Send + Sync>;

#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, PredicateFn>,
}

impl PredicateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate that computes its own progress.
    ///
    /// Re-registering a key replaces the previous predicate.
    pub fn register<F>(&mut self, key: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&PlayerStatistics) -> Progress + Send + Sync + 'static,
    {
        self.predicates.insert(key.into(), Arc::new(predicate));
        self
    }

    /// Register a plain yes/no predicate.
    pub fn register_flag<F>(&mut self, key: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&PlayerStatistics) -> bool + Send + Sync + 'static,
    {
        self.register(key, move |stats| Progress::flag(predicate(stats)))
    }

    /// Builder-style [`Self::register`].
    #[must_use]
    pub fn with<F>(mut self, key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&PlayerStatistics) -> Progress + Send + Sync + 'static,
    {
        self.register(key, predicate);
        self
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.predicates.contains_key(key)
    }

    /// Evaluate `key`, or `None` when nothing is registered under it.
    #[must_use]
    pub fn resolve(&self, key: &str, stats: &PlayerStatistics) -> Option<Progress> {
        self.predicates.get(key).map(|predicate| predicate(stats))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("PredicateRegistry")
            .field("keys", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_keys_only() {
        let mut registry = PredicateRegistry::new();
        registry
            .register_flag("night_runner", |stats| stats.total_play_time_ms > 0)
            .register("coin_half", |stats| {
                Progress::counted(stats.total_coins_collected, 50)
            });

        let stats = PlayerStatistics {
            total_coins_collected: 25,
            ..PlayerStatistics::default()
        };
        let half = registry.resolve("coin_half", &stats).unwrap();
        assert!((half.percent_complete - 50.0).abs() < f64::EPSILON);
        assert!(!registry.resolve("night_runner", &stats).unwrap().is_complete);
        assert!(registry.resolve("missing", &stats).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn debug_lists_sorted_keys() {
        let registry = PredicateRegistry::new()
            .with("zeta", |_| Progress::complete())
            .with("alpha", |_| Progress::complete());
        assert_eq!(
            format!("{registry:?}"),
            r#"PredicateRegistry { keys: ["alpha", "zeta"] }"#
        );
    }
}
