//! Build-time preprocessor definitions.
//!
//! The orchestrator hands the selector an ordered list of definitions. Each
//! entry is either a bare symbol (`DEBUG`) or a name/value pair
//! (`HAL=STM32`). Order is preserved because the first matching pair wins.

use core::fmt;
use core::str::FromStr;

/// One preprocessor definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Define {
    /// A symbol defined without a value, e.g. `-DDEBUG`.
    Bare(String),
    /// A symbol defined with a value, e.g. `-DHAL=STM32`.
    Pair(String, String),
}

impl Define {
    /// Build a bare definition.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::Bare(name.into())
    }

    /// Build a name/value definition.
    pub fn pair(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Pair(name.into(), value.into())
    }

    /// Symbol name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::Pair(name, _) => name,
        }
    }

    /// Value, if this is a pair.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Pair(_, value) => Some(value),
        }
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(name) => write!(f, "{name}"),
            Self::Pair(name, value) => write!(f, "{name}={value}"),
        }
    }
}

/// Error parsing a definition token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDefineError {
    /// The token was empty or whitespace.
    #[error("empty definition")]
    Empty,
    /// The token had a value but no name (`=x`).
    #[error("definition `{0}` has no name")]
    MissingName(String),
}

impl FromStr for Define {
    type Err = ParseDefineError;

    /// Parse `NAME` or `NAME=VALUE`. Only the first `=` separates; the value
    /// may itself contain `=`. Surrounding double quotes on the value are
    /// dropped, matching how shells pass `-DNAME="value"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(ParseDefineError::Empty);
        }
        match token.split_once('=') {
            None => Ok(Self::bare(token)),
            Some((name, _)) if name.is_empty() => {
                Err(ParseDefineError::MissingName(token.to_owned()))
            }
            Some((name, value)) => Ok(Self::pair(name, unquote(value))),
        }
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Extract definitions from a compiler flag string.
///
/// Recognises both `-DNAME[=VALUE]` and the split form `-D NAME[=VALUE]`.
/// Every other flag is ignored. A `-D` with nothing after it, or followed by
/// another flag (`-D -O2`), is ignored as well.
///
/// # Errors
///
/// Returns [`ParseDefineError`] if a `-D` operand has an empty name.
pub fn parse_cflags(flags: &str) -> Result<Vec<Define>, ParseDefineError> {
    let mut defines = Vec::new();
    let mut tokens = flags.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        let Some(rest) = token.strip_prefix("-D") else {
            continue;
        };
        let operand = if rest.is_empty() {
            match tokens.next_if(|next| !next.starts_with('-')) {
                Some(next) => next,
                None => continue,
            }
        } else {
            rest
        };
        defines.push(operand.parse()?);
    }
    Ok(defines)
}

/// First value of a pair named exactly `key`, in list order.
///
/// Bare symbols never match, even when their name equals `key`.
#[must_use]
pub fn find_value<'a>(defines: &'a [Define], key: &str) -> Option<&'a str> {
    defines.iter().find_map(|d| match d {
        Define::Pair(name, value) if name == key => Some(value.as_str()),
        _ => None,
    })
}
