//! SQL dialects and the process-wide default.

use crate::error::{RelqError, RelqResult};
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

/// How a dialect joins strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `a || b || c`
    Infix(&'static str),
    /// `CONCAT(a, b, c)`
    FunctionCall(&'static str),
}

/// Target SQL dialect.
///
/// | Dialect  | Placeholder | Quoting   | Concat         |
/// |----------|-------------|-----------|----------------|
/// | Generic  | `?`         | none      | `a \|\| b`     |
/// | Postgres | `$N[::ty]`  | `"name"`  | `a \|\| b`     |
/// | MySql    | `?`         | `` `name` `` | `CONCAT(a, b)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Generic,
    Postgres,
    MySql,
}

impl Dialect {
    /// Look up a dialect by its configuration name.
    pub fn by_name(name: &str) -> RelqResult<Self> {
        match name {
            "generic" => Ok(Dialect::Generic),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            other => Err(RelqError::UnsupportedDialect(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }

    /// Placeholder for the next argument.
    ///
    /// `args_so_far` is the number of arguments already emitted into the
    /// statement, so Postgres numbering continues across nested sub-queries.
    pub fn placeholder(&self, type_hint: Option<&str>, args_so_far: usize) -> String {
        match self {
            Dialect::Generic | Dialect::MySql => "?".to_string(),
            Dialect::Postgres => match type_hint {
                Some(ty) if !ty.is_empty() => format!("${}::{ty}", args_so_far + 1),
                _ => format!("${}", args_so_far + 1),
            },
        }
    }

    fn quote_char(&self) -> Option<char> {
        match self {
            Dialect::Generic => None,
            Dialect::Postgres => Some('"'),
            Dialect::MySql => Some('`'),
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote_ident(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_ident(&mut out, name);
        out
    }

    pub(crate) fn write_ident(&self, out: &mut String, name: &str) {
        let Some(quote) = self.quote_char() else {
            out.push_str(name);
            return;
        };
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
    }

    pub fn concat_style(&self) -> ConcatStyle {
        match self {
            Dialect::Generic | Dialect::Postgres => ConcatStyle::Infix("||"),
            Dialect::MySql => ConcatStyle::FunctionCall("CONCAT"),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = RelqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::by_name(s)
    }
}

static DEFAULT_DIALECT: RwLock<Dialect> = RwLock::new(Dialect::Generic);

/// Replace the process-wide default dialect.
///
/// Meant to be called once at startup. The value is read whenever a builder
/// is finalized without its own configuration; SQL that was already finalized
/// is not affected.
pub fn set_default_dialect(dialect: Dialect) {
    let mut guard = DEFAULT_DIALECT
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = dialect;
}

/// The current process-wide default dialect.
pub fn default_dialect() -> Dialect {
    *DEFAULT_DIALECT
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
