//! Search configuration.
//!
//! Each option is a distinct type and the configuration is a plain typed
//! bundle; the facade reads options by field, never by string key. Error
//! limits come in absolute and per-query-rate flavors; the rate flavor is
//! floor-cast to whole errors against each query's length.

use serde::{Deserialize, Serialize};

/// Absolute error budget across a whole query.
///
/// `total` caps the sum of all edits; the per-kind fields cap each edit
/// kind on its own. A kind with budget 0 is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxError {
    pub total: u8,
    pub substitution: u8,
    pub insertion: u8,
    pub deletion: u8,
}

impl MaxError {
    /// Budget that allows exact matches only.
    pub const EXACT: MaxError = MaxError {
        total: 0,
        substitution: 0,
        insertion: 0,
        deletion: 0,
    };

    /// Budget of `n` substitutions and nothing else.
    pub fn substitutions(n: u8) -> Self {
        MaxError {
            total: n,
            substitution: n,
            insertion: 0,
            deletion: 0,
        }
    }
}

/// Error budget as fractions of the query length.
///
/// Every rate must lie in `[0, 1]`; each resolves per query as
/// `floor(rate * |query|)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxErrorRate {
    pub total: f64,
    pub substitution: f64,
    pub insertion: f64,
    pub deletion: f64,
}

impl MaxErrorRate {
    /// Resolve the rates into an absolute budget for a query of length
    /// `query_len`. Casting truncates: a rate of 0.25 on a length-7 query
    /// permits floor(1.75) = 1 error.
    pub fn resolve(&self, query_len: usize) -> MaxError {
        debug_assert!(
            [self.total, self.substitution, self.insertion, self.deletion]
                .iter()
                .all(|r| (0.0..=1.0).contains(r)),
            "error rates must lie in [0, 1]"
        );
        let cast = |rate: f64| (rate * query_len as f64) as u8;
        MaxError {
            total: cast(self.total),
            substitution: cast(self.substitution),
            insertion: cast(self.insertion),
            deletion: cast(self.deletion),
        }
    }
}

/// How errors are limited: absolutely or relative to query length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorLimit {
    Count(MaxError),
    Rate(MaxErrorRate),
}

impl Default for ErrorLimit {
    fn default() -> Self {
        ErrorLimit::Count(MaxError::EXACT)
    }
}

/// Which matches to report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Every match within the budget.
    #[default]
    All,
    /// One match with the fewest errors.
    Best,
    /// Every match tying for the fewest errors.
    AllBest,
    /// Every match with at most (fewest + s) errors.
    Strata(u8),
}

/// Configuration bundle for the search facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub limit: ErrorLimit,
    pub mode: Mode,
}

impl SearchConfig {
    /// Exact search, mode [`Mode::All`].
    pub fn new() -> Self {
        SearchConfig::default()
    }

    /// Set an absolute error budget.
    pub fn max_error(mut self, limit: MaxError) -> Self {
        self.limit = ErrorLimit::Count(limit);
        self
    }

    /// Set a rate-based error budget.
    pub fn max_error_rate(mut self, limit: MaxErrorRate) -> Self {
        self.limit = ErrorLimit::Rate(limit);
        self
    }

    /// Set the reporting mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// The absolute budget for a query of length `query_len`.
    pub fn budget_for(&self, query_len: usize) -> MaxError {
        match self.limit {
            ErrorLimit::Count(limit) => limit,
            ErrorLimit::Rate(rate) => rate.resolve(query_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_exact_all() {
        let config = SearchConfig::new();
        assert_eq!(config.mode, Mode::All);
        assert_eq!(config.budget_for(10), MaxError::EXACT);
    }

    #[test]
    fn test_rate_floor_cast() {
        let rate = MaxErrorRate {
            total: 0.25,
            substitution: 0.25,
            insertion: 0.0,
            deletion: 0.0,
        };
        // 0.25 * 7 = 1.75 -> 1 error
        assert_eq!(rate.resolve(7).total, 1);
        assert_eq!(rate.resolve(7).substitution, 1);
        // 0.25 * 3 = 0.75 -> exact
        assert_eq!(rate.resolve(3).total, 0);
        // 0.25 * 4 = 1.0 -> 1
        assert_eq!(rate.resolve(4).total, 1);
    }

    #[test]
    fn test_builder_chains() {
        let config = SearchConfig::new()
            .max_error(MaxError::substitutions(2))
            .mode(Mode::Strata(1));
        assert_eq!(config.budget_for(100).substitution, 2);
        assert_eq!(config.mode, Mode::Strata(1));
    }
}
