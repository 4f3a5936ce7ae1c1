//! Lexical classification of the raw argument vector.
//!
//! The scanner has no knowledge of the command schema. It only decides the
//! *shape* of every argument so the matcher can make schema-aware decisions
//! later. In particular, short-option clusters such as `-abc` are kept intact
//! here: whether they mean `-a -b -c` or `-a bc` depends on the declared
//! value types, which only the matcher can see.
//!
//! # Examples
//!
//! ```
//! use argmatch_core::{TokenKind, scan};
//!
//! let tokens = scan(["--target=release", "-vq", "file.txt", "--", "-x"]);
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::OptionWithValue,
//!         TokenKind::ShortCluster,
//!         TokenKind::Positional,
//!         TokenKind::Terminator,
//!         TokenKind::Positional,
//!     ]
//! );
//! assert!(tokens[4].escaped);
//! ```

use serde::Serialize;

/// Shape of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// A plain value (or subcommand name).
    Positional,
    /// `--name`
    LongOption,
    /// `-abc`; split later by the matcher.
    ShortCluster,
    /// `--name=value`
    OptionWithValue,
    /// A bare `--`.
    Terminator,
}

/// One classified argument. Immutable once produced by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Classification of the argument.
    pub kind: TokenKind,
    /// The argument exactly as it appeared in the vector.
    pub text: String,
    /// Option name without leading hyphens (long options and clusters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Inline value of an `--name=value` token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Position in the argument vector.
    pub index: usize,
    /// Set on positional tokens that followed a terminator.
    pub escaped: bool,
}

impl Token {
    fn new(kind: TokenKind, text: &str, index: usize) -> Self {
        Self {
            kind,
            text: text.to_string(),
            name: None,
            value: None,
            index,
            escaped: false,
        }
    }

    /// Returns `true` for the three option-shaped kinds.
    pub fn is_option(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LongOption | TokenKind::ShortCluster | TokenKind::OptionWithValue
        )
    }

    /// Characters of a short cluster, without the leading hyphen.
    pub fn cluster(&self) -> &str {
        match self.kind {
            TokenKind::ShortCluster => self.name.as_deref().unwrap_or_default(),
            _ => "",
        }
    }

    /// Returns `true` if the token text reads as a signed number (`-5`, `-1.5e3`).
    pub fn looks_numeric(&self) -> bool {
        match self.text.strip_prefix('-') {
            Some(rest) => {
                rest.starts_with(|c: char| c.is_ascii_digit() || c == '.')
                    && self.text.parse::<f64>().is_ok()
            }
            None => false,
        }
    }
}

/// Splits an argument vector (program name excluded) into classified tokens.
///
/// Single pass, never fails: every string is a valid token.
pub fn scan<I, S>(argv: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    let mut escaped = false;

    for (index, arg) in argv.into_iter().enumerate() {
        let arg = arg.as_ref();

        if escaped {
            let mut token = Token::new(TokenKind::Positional, arg, index);
            token.escaped = true;
            tokens.push(token);
            continue;
        }

        tokens.push(classify(arg, index));
        if arg == "--" {
            escaped = true;
        }
    }

    tokens
}

fn classify(arg: &str, index: usize) -> Token {
    if arg == "--" {
        return Token::new(TokenKind::Terminator, arg, index);
    }

    if let Some(body) = arg.strip_prefix("--") {
        return match body.split_once('=') {
            // `--=value` has no option name to resolve.
            Some(("", _)) => Token::new(TokenKind::Positional, arg, index),
            Some((name, value)) => {
                let mut token = Token::new(TokenKind::OptionWithValue, arg, index);
                token.name = Some(name.to_string());
                token.value = Some(value.to_string());
                token
            }
            None => {
                let mut token = Token::new(TokenKind::LongOption, arg, index);
                token.name = Some(body.to_string());
                token
            }
        };
    }

    match arg.strip_prefix('-') {
        Some(body) if !body.is_empty() => {
            let mut token = Token::new(TokenKind::ShortCluster, arg, index);
            token.name = Some(body.to_string());
            token
        }
        // A lone `-` (stdin) stays positional.
        _ => Token::new(TokenKind::Positional, arg, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_long_option_with_inline_value() {
        let tokens = scan(["--target=release"]);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::OptionWithValue);
        assert_eq!(tokens[0].name.as_deref(), Some("target"));
        assert_eq!(tokens[0].value.as_deref(), Some("release"));
    }

    #[test]
    fn test_scan_splits_on_first_equals_only() {
        let tokens = scan(["--define=key=value"]);
        assert_eq!(tokens[0].name.as_deref(), Some("define"));
        assert_eq!(tokens[0].value.as_deref(), Some("key=value"));
    }

    #[test]
    fn test_scan_keeps_short_cluster_intact() {
        let tokens = scan(["-abc"]);
        assert_eq!(tokens[0].kind, TokenKind::ShortCluster);
        assert_eq!(tokens[0].cluster(), "abc");
    }

    #[test]
    fn test_scan_terminator_forces_positional() {
        let tokens = scan(["-v", "--", "--verbose", "-x", "--"]);
        assert_eq!(tokens[1].kind, TokenKind::Terminator);
        for token in &tokens[2..] {
            assert_eq!(token.kind, TokenKind::Positional);
            assert!(token.escaped);
        }
        assert!(!tokens[0].escaped);
    }

    #[test]
    fn test_scan_single_dash_is_positional() {
        let tokens = scan(["-"]);
        assert_eq!(tokens[0].kind, TokenKind::Positional);
    }

    #[test]
    fn test_scan_empty_long_name_is_positional() {
        let tokens = scan(["--=x"]);
        assert_eq!(tokens[0].kind, TokenKind::Positional);
    }

    #[test]
    fn test_scan_records_source_index() {
        let tokens = scan(["a", "-b", "--c"]);
        let indices: Vec<_> = tokens.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_looks_numeric() {
        let tokens = scan(["-5", "-1.5", "-v", "-inf", "-.5"]);
        assert!(tokens[0].looks_numeric());
        assert!(tokens[1].looks_numeric());
        assert!(!tokens[2].looks_numeric());
        assert!(!tokens[3].looks_numeric());
        assert!(tokens[4].looks_numeric());
    }
}
