//! Per-builder / per-call configuration.

use crate::dialect::{Dialect, default_dialect};

/// Rendering and logging options used when a builder is finalized.
///
/// `QueryConfig::default()` snapshots the process-wide default dialect at the
/// moment it is constructed.
///
/// ```ignore
/// let cfg = QueryConfig::new(Dialect::Postgres).max_logged_sql_len(500);
/// let fq = relq::select_from(&users).finalize_with(&cfg)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Dialect used to render placeholders, identifiers and concatenation.
    pub dialect: Dialect,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_logged_sql_len: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(default_dialect())
    }
}

impl QueryConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            max_logged_sql_len: Some(200),
        }
    }

    /// Override the dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_len(mut self, len: usize) -> Self {
        self.max_logged_sql_len = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_len = None;
        self
    }
}
