//! Trait definitions for statement builders.

use crate::client::Connection;
use crate::config::QueryConfig;
use crate::error::RelqResult;
use crate::log;
use crate::writer::{FinalQuery, QueryWriter};

/// Base trait for all builders: rendering to SQL text plus arguments.
pub trait SqlQuery {
    /// Statement kind used in log events.
    const KIND: &'static str;

    /// Configuration attached to this builder, if any.
    fn config(&self) -> Option<&QueryConfig>;

    /// Render the statement into `w`.
    ///
    /// Validation failures are returned directly; problems found while
    /// rendering nested expressions are recorded on the writer.
    fn write_sql(&self, w: &mut QueryWriter) -> RelqResult<()>;

    /// The attached configuration, or one built from the process defaults.
    fn effective_config(&self) -> QueryConfig {
        self.config().cloned().unwrap_or_default()
    }

    /// Render with an explicit configuration.
    fn finalize_with(&self, cfg: &QueryConfig) -> RelqResult<FinalQuery> {
        let mut w = QueryWriter::new(cfg.dialect);
        self.write_sql(&mut w)?;
        let fq = w.finish()?;
        log::finalized(Self::KIND, cfg, &fq);
        Ok(fq)
    }

    /// Render with the attached configuration or the process defaults.
    fn finalize(&self) -> RelqResult<FinalQuery> {
        self.finalize_with(&self.effective_config())
    }
}

/// INSERT / UPDATE / DELETE execution.
pub trait Mutation: SqlQuery {
    /// Finalize and hand the statement to `conn`. Returns the affected rows.
    fn execute<C: Connection + ?Sized>(&self, conn: &C) -> RelqResult<u64> {
        let cfg = self.effective_config();
        let fq = self.finalize_with(&cfg)?;
        log::sending(Self::KIND, &cfg, &fq);
        conn.execute(&fq.sql, &fq.args)
    }
}
