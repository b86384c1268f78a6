//! Identifier validation and per-app uniqueness
//!
//! Every node class name, entity id and function name ends up as a symbol in
//! generated C, C++, Rust, Python or Java code. Names must therefore use the
//! common subset `[A-Za-z_][A-Za-z0-9_]*` and must not collide with a
//! keyword of any of those languages.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use crate::error::{CompileError, Result};
use crate::location::Location;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

fn reserved_words() -> &'static HashSet<&'static str> {
    static RESERVED: OnceLock<HashSet<&'static str>> = OnceLock::new();
    RESERVED.get_or_init(|| {
        [
            // C / C++
            "auto", "break", "case", "char", "class", "const", "continue", "default",
            "delete", "do", "double", "else", "enum", "extern", "float", "for", "friend",
            "goto", "if", "inline", "int", "long", "namespace", "new", "operator",
            "private", "protected", "public", "register", "return", "short", "signed",
            "sizeof", "static", "struct", "switch", "template", "this", "throw", "try",
            "typedef", "typename", "union", "unsigned", "using", "virtual", "void",
            "volatile", "while", "bool", "true", "false", "nullptr",
            // Rust
            "as", "crate", "dyn", "fn", "impl", "in", "let", "loop", "match", "mod",
            "move", "mut", "pub", "ref", "self", "Self", "super", "trait", "type",
            "unsafe", "use", "where", "async", "await",
            // Python
            "and", "def", "del", "elif", "except", "False", "finally", "from", "global",
            "import", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise",
            "True", "with", "yield",
            // Java
            "abstract", "boolean", "byte", "catch", "extends", "final", "implements",
            "instanceof", "interface", "native", "package", "synchronized", "throws",
            "transient", "null",
        ]
        .into_iter()
        .collect()
    })
}

/// Check if `s` can be used as a symbol in every target language
pub fn is_valid_identifier(s: &str) -> bool {
    identifier_pattern().is_match(s) && !reserved_words().contains(s)
}

/// Identifiers declared or generated within one app.
///
/// Registration keeps document order; duplicates are only reported by
/// [`check_duplicates`](Self::check_duplicates) once the app is complete.
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    identifiers: Vec<String>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `identifier` and add it to the app scope
    pub fn register(&mut self, identifier: &str, location: &Location) -> Result<()> {
        if !is_valid_identifier(identifier) {
            return Err(CompileError::InvalidIdentifier {
                location: location.clone(),
                identifier: identifier.to_string(),
            });
        }
        tracing::trace!("register identifier {} ({})", identifier, location);
        self.identifiers.push(identifier.to_string());
        Ok(())
    }

    /// Identifiers that were registered more than once, sorted
    pub fn duplicates(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for id in &self.identifiers {
            *counts.entry(id.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect()
    }

    /// Fail with every repeated identifier in this scope
    pub fn check_duplicates(&self, location: &Location) -> Result<()> {
        let duplicates = self.duplicates();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(CompileError::DuplicateIdentifier {
                location: location.clone(),
                duplicates,
            })
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Registered identifiers in registration order
    pub fn into_identifiers(self) -> Vec<String> {
        self.identifiers
    }
}
