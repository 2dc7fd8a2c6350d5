//! Unique names for created and copied nodes.
//!
//! Names are tried in two phases. The deterministic phase walks attempt
//! numbers `0..n`; if every candidate is taken, the randomized phase draws
//! attempt numbers from a random generator until a free name turns up or the
//! optional budget runs out.

use rand::Rng;
use tracing::{debug, warn};

use navtree_core::{NavConfig, NavError, NavResult};

/// Build the candidate name for one attempt.
///
/// Copies read `Copy_of_<base>` for attempt 0 and `Copy_(<n>)_of_<base>`
/// afterwards; everything else reads `<base>_<n>`.
pub fn candidate_name(base: &str, is_copy: bool, attempt: u64) -> String {
    match (is_copy, attempt) {
        (true, 0) => format!("Copy_of_{base}"),
        (true, n) => format!("Copy_({n})_of_{base}"),
        (false, n) => format!("{base}_{n}"),
    }
}

/// Two-phase unique-name search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameGenerator {
    deterministic_attempts: u32,
    random_attempt_budget: Option<u64>,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::from_config(&NavConfig::default())
    }
}

impl NameGenerator {
    pub fn new(deterministic_attempts: u32, random_attempt_budget: Option<u64>) -> Self {
        Self {
            deterministic_attempts,
            random_attempt_budget,
        }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.deterministic_attempts, config.random_attempt_budget)
    }

    /// Find a name for which `is_taken` answers `false`.
    ///
    /// Errors from `is_taken` abort the search unchanged. Without a random
    /// budget the randomized phase does not terminate until a name is free.
    pub fn generate<R, F>(
        &self,
        base: &str,
        is_copy: bool,
        rng: &mut R,
        mut is_taken: F,
    ) -> NavResult<String>
    where
        R: Rng,
        F: FnMut(&str) -> NavResult<bool>,
    {
        if base.trim().is_empty() {
            return Err(NavError::invalid_argument("base name cannot be empty"));
        }

        for attempt in 0..u64::from(self.deterministic_attempts) {
            let candidate = candidate_name(base, is_copy, attempt);
            if !is_taken(&candidate)? {
                debug!(base, name = %candidate, attempt, "Generated unique name");
                return Ok(candidate);
            }
        }

        warn!(
            base,
            attempts = self.deterministic_attempts,
            "Deterministic names exhausted, falling back to random attempts"
        );

        let mut tries = 0u64;
        loop {
            if self.random_attempt_budget.is_some_and(|budget| tries >= budget) {
                return Err(NavError::NamesExhausted {
                    base: base.to_string(),
                    attempts: u64::from(self.deterministic_attempts) + tries,
                });
            }
            tries += 1;

            let attempt = u64::from(rng.random::<u32>());
            let candidate = candidate_name(base, is_copy, attempt);
            if !is_taken(&candidate)? {
                debug!(base, name = %candidate, tries, "Generated random unique name");
                return Ok(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn taken_by(names: &[&str]) -> impl FnMut(&str) -> NavResult<bool> {
        let names: HashSet<String> = names.iter().map(|s| s.to_string()).collect();
        move |candidate: &str| Ok(names.contains(candidate))
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name("Foo", false, 0), "Foo_0");
        assert_eq!(candidate_name("Foo", false, 7), "Foo_7");
        assert_eq!(candidate_name("Bar", true, 0), "Copy_of_Bar");
        assert_eq!(candidate_name("Bar", true, 1), "Copy_(1)_of_Bar");
    }

    #[test]
    fn test_skips_taken_names() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = NameGenerator::default()
            .generate("Foo", false, &mut rng, taken_by(&["Foo_0", "Foo_1"]))
            .unwrap();
        assert_eq!(name, "Foo_2");
    }

    #[test]
    fn test_copy_names() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = NameGenerator::default();
        assert_eq!(
            generator
                .generate("Bar", true, &mut rng, taken_by(&[]))
                .unwrap(),
            "Copy_of_Bar"
        );
        assert_eq!(
            generator
                .generate("Bar", true, &mut rng, taken_by(&["Copy_of_Bar"]))
                .unwrap(),
            "Copy_(1)_of_Bar"
        );
    }

    #[test]
    fn test_falls_back_to_random_attempts() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = NameGenerator::new(3, None);
        let name = generator
            .generate("Foo", false, &mut rng, taken_by(&["Foo_0", "Foo_1", "Foo_2"]))
            .unwrap();
        let attempt: u64 = name.strip_prefix("Foo_").unwrap().parse().unwrap();
        assert!(attempt <= u64::from(u32::MAX));
    }

    #[test]
    fn test_random_budget_exhaustion() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = NameGenerator::new(2, Some(5));
        let mut calls = 0;
        let err = generator
            .generate("Foo", false, &mut rng, |_| {
                calls += 1;
                Ok(true)
            })
            .unwrap_err();
        assert!(matches!(err, NavError::NamesExhausted { attempts: 7, .. }));
        assert_eq!(calls, 7);
    }

    #[test]
    fn test_predicate_errors_propagate() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = NameGenerator::default()
            .generate("Foo", false, &mut rng, |_| {
                Err(NavError::collaborator("backend down"))
            })
            .unwrap_err();
        assert!(matches!(err, NavError::Collaborator(_)));
    }

    #[test]
    fn test_blank_base_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(
            NameGenerator::default()
                .generate(" ", false, &mut rng, taken_by(&[]))
                .is_err()
        );
    }
}
