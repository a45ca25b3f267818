//! SQL logging via `tracing` (target `relq.sql`).
//!
//! Compiled out when the `tracing` feature is disabled.

#[cfg(feature = "tracing")]
use crate::config::QueryConfig;
#[cfg(feature = "tracing")]
use crate::writer::FinalQuery;

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
fn display_sql(cfg: &QueryConfig, sql: &str) -> String {
    match cfg.max_logged_sql_len {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// A builder was rendered.
#[cfg(feature = "tracing")]
pub(crate) fn finalized(kind: &'static str, cfg: &QueryConfig, fq: &FinalQuery) {
    tracing::trace!(
        target: "relq.sql",
        kind,
        dialect = %cfg.dialect,
        args = fq.args.len(),
        sql = %display_sql(cfg, &fq.sql),
        "finalized"
    );
}

/// A finalized statement is about to be sent to the connection.
#[cfg(feature = "tracing")]
pub(crate) fn sending(kind: &'static str, cfg: &QueryConfig, fq: &FinalQuery) {
    tracing::debug!(
        target: "relq.sql",
        kind,
        dialect = %cfg.dialect,
        args = fq.args.len(),
        sql = %display_sql(cfg, &fq.sql),
        "sending"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn finalized(_: &'static str, _: &crate::config::QueryConfig, _: &crate::writer::FinalQuery) {}

#[cfg(not(feature = "tracing"))]
pub(crate) fn sending(_: &'static str, _: &crate::config::QueryConfig, _: &crate::writer::FinalQuery) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes; cutting inside it backs off.
        assert_eq!(truncate_sql_bytes("café", 4), "caf");
    }
}
