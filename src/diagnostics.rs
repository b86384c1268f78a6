//! Diagnostics
//!
//! Collects warnings and notes while a document is compiled. Fatal problems
//! are returned as [`CompileError`](crate::CompileError); everything the
//! compiler recovers from (defaulted optional fields, discarded version
//! groups, placeholder modules) lands here and the caller decides how to
//! render it.

use serde::Serialize;
use std::fmt;

use crate::location::Location;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing recoverable issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// Optional field absent, a generated default was used
    OptionalFieldDefaulted,
    /// Optional field without a default (file paths) absent
    OptionalFieldOmitted,
    /// Element parsed as a placeholder only
    NotYetImplemented,
    /// Version groups beyond build were dropped
    VersionGroupsDiscarded,
    /// `~` in a path was expanded to the home directory
    HomeDirExpanded,
}

impl DiagnosticCode {
    pub const ALL: &'static [DiagnosticCode] = &[
        Self::OptionalFieldDefaulted,
        Self::OptionalFieldOmitted,
        Self::NotYetImplemented,
        Self::VersionGroupsDiscarded,
        Self::HomeDirExpanded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OptionalFieldDefaulted => "W001",
            Self::NotYetImplemented => "W002",
            Self::VersionGroupsDiscarded => "W003",
            Self::HomeDirExpanded => "I001",
            Self::OptionalFieldOmitted => "I002",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::OptionalFieldDefaulted
            | Self::NotYetImplemented
            | Self::VersionGroupsDiscarded => Severity::Warning,

            Self::HomeDirExpanded | Self::OptionalFieldOmitted => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticItem {
    /// Where in the document this was raised
    pub location: Location,
    pub code: DiagnosticCode,
    pub message: String,
}

impl DiagnosticItem {
    pub fn new(location: Location, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            location,
            code,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.location
        )
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from one compile run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    /// Record that an optional field was absent and `value` was used instead
    pub fn defaulted(&mut self, location: Location, value: impl fmt::Display) {
        let message = format!("optional field not set, using default \"{}\"", value);
        self.push(DiagnosticItem::new(
            location,
            DiagnosticCode::OptionalFieldDefaulted,
            message,
        ));
    }

    /// Record that an optional field without a default was absent
    pub fn omitted(&mut self, location: Location) {
        self.push(DiagnosticItem::new(
            location,
            DiagnosticCode::OptionalFieldOmitted,
            "optional field not set",
        ));
    }

    /// Record an element that is accepted but not populated yet
    pub fn not_yet_implemented(&mut self, location: Location, what: &str) {
        self.push(DiagnosticItem::new(
            location,
            DiagnosticCode::NotYetImplemented,
            format!("{} is parsed as an empty placeholder", what),
        ));
    }

    pub fn items(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|d| d.severity() == Severity::Warning)
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticItem;
    type IntoIter = std::vec::IntoIter<DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaulted_is_warning() {
        let mut diags = Diagnostics::new();
        diags.defaulted(Location::root().field("domain_id"), 0);

        assert_eq!(diags.len(), 1);
        assert!(diags.has_warnings());
        let item = &diags.items()[0];
        assert_eq!(item.code, DiagnosticCode::OptionalFieldDefaulted);
        assert_eq!(
            item.to_string(),
            "[W001] warning: optional field not set, using default \"0\" (domain_id)"
        );
    }

    #[test]
    fn test_info_is_not_warning() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticItem::new(
            Location::root(),
            DiagnosticCode::HomeDirExpanded,
            "expanded",
        ));
        assert!(!diags.has_warnings());
        assert_eq!(diags.with_code(DiagnosticCode::HomeDirExpanded).count(), 1);
    }

    #[test]
    fn test_code_prefix_matches_severity() {
        for code in DiagnosticCode::ALL {
            let prefix = match code.severity() {
                Severity::Info => 'I',
                Severity::Warning => 'W',
            };
            assert!(code.as_str().starts_with(prefix), "{} has the wrong prefix", code);
        }
    }
}
