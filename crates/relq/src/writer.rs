//! Accumulating SQL text + argument list shared by every builder.

use crate::dialect::Dialect;
use crate::error::{RelqError, RelqResult};
use crate::value::Value;

/// Rendered SQL text with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Text buffer, ordered arguments and deferred errors for one statement.
///
/// Placeholders are produced from the number of arguments already pushed, so
/// anything rendered into the same writer (nested sub-queries included) keeps
/// Postgres `$N` numbering in step with the argument list.
#[derive(Debug)]
pub struct QueryWriter {
    dialect: Dialect,
    sql: String,
    args: Vec<Value>,
    errors: Vec<RelqError>,
}

impl QueryWriter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            args: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Number of arguments emitted so far.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Append literal SQL text.
    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append an identifier, quoted for the dialect.
    pub fn push_ident(&mut self, name: &str) {
        self.dialect.write_ident(&mut self.sql, name);
    }

    /// Append a placeholder and its argument in one step.
    pub fn push_arg(&mut self, value: Value, type_hint: Option<&str>) {
        let ph = self.dialect.placeholder(type_hint, self.args.len());
        self.sql.push_str(&ph);
        self.args.push(value);
    }

    /// Append a raw fragment that uses `?` markers for its arguments.
    ///
    /// Each unquoted `?` becomes a dialect placeholder bound to the next
    /// argument. Quoted text and the `??`, `?|`, `?&` operators are copied as-is.
    /// A marker/argument count mismatch is recorded as a deferred error.
    pub fn push_raw(&mut self, sql: &str, args: &[Value]) {
        let mut remaining = args.iter();
        let mut markers = 0usize;
        let mut quote: Option<char> = None;
        let mut span_start = 0;
        let mut chars = sql.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            if let Some(q) = quote {
                if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '\'' | '"' | '`' => quote = Some(ch),
                '?' => {
                    if let Some(&(_, '?' | '|' | '&')) = chars.peek() {
                        chars.next();
                        continue;
                    }
                    self.sql.push_str(&sql[span_start..idx]);
                    span_start = idx + ch.len_utf8();
                    markers += 1;
                    match remaining.next() {
                        Some(value) => self.push_arg(value.clone(), None),
                        None => self.sql.push('?'),
                    }
                }
                _ => {}
            }
        }
        self.sql.push_str(&sql[span_start..]);

        if markers != args.len() {
            self.add_error(RelqError::validation(format!(
                "raw fragment {sql:?} has {markers} placeholder(s) but {} argument(s)",
                args.len()
            )));
        }
    }

    /// Record an error to be reported by [`finish`](Self::finish).
    pub fn add_error(&mut self, err: RelqError) {
        self.errors.push(err);
    }

    /// Return the rendered statement, or the first recorded error.
    pub fn finish(self) -> RelqResult<FinalQuery> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        Ok(FinalQuery {
            sql: self.sql,
            args: self.args,
        })
    }
}
