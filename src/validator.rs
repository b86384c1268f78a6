//! IR Validator
//!
//! Semantic pass run once over a freshly built [`Ir`]. Only the version gate
//! enforces anything today; the compatibility and custom-message steps are
//! declared so the pass order is fixed, and accept every IR.

use std::fmt;

use crate::error::{CompileError, Result};
use crate::ir::Ir;
use crate::version::{format_allow_list, is_supported, SUPPORTED_VERSIONS};

/// Validation steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStep {
    /// Document version is in the allow-list
    Version,
    /// Platform supported by this document version
    PlatformCompatibility,
    /// Language supported by this document version
    LanguageCompatibility,
    /// Protocol type and domain id usable on the platform
    ProtocolCompatibility,
    /// Custom message definitions exist and match their msg type
    CustomMessages,
}

impl ValidationStep {
    pub const ALL: &'static [ValidationStep] = &[
        Self::Version,
        Self::PlatformCompatibility,
        Self::LanguageCompatibility,
        Self::ProtocolCompatibility,
        Self::CustomMessages,
    ];

    /// Whether the step performs real checks
    pub fn is_enforced(self) -> bool {
        matches!(self, Self::Version)
    }
}

impl fmt::Display for ValidationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Version => "version",
            Self::PlatformCompatibility => "platform compatibility",
            Self::LanguageCompatibility => "language compatibility",
            Self::ProtocolCompatibility => "protocol compatibility",
            Self::CustomMessages => "custom messages",
        };
        write!(f, "{}", name)
    }
}

/// Validates built IR against a version allow-list
#[derive(Debug, Clone)]
pub struct IrValidator {
    allow_list: &'static [(u64, u64)],
}

impl Default for IrValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl IrValidator {
    pub fn new() -> Self {
        Self {
            allow_list: SUPPORTED_VERSIONS,
        }
    }

    /// Run every step; the first failing step is returned
    pub fn validate(&self, ir: &Ir) -> Result<()> {
        for step in ValidationStep::ALL {
            self.run_step(*step, ir)?;
        }
        Ok(())
    }

    pub fn is_valid(&self, ir: &Ir) -> bool {
        self.validate(ir).is_ok()
    }

    fn run_step(&self, step: ValidationStep, ir: &Ir) -> Result<()> {
        match step {
            ValidationStep::Version => self.check_version(ir),
            _ => {
                tracing::debug!("validation step \"{}\" not enforced, skipped", step);
                Ok(())
            }
        }
    }

    fn check_version(&self, ir: &Ir) -> Result<()> {
        if is_supported(&ir.version, self.allow_list) {
            tracing::debug!("version {}.{} validated", ir.version.major, ir.version.minor);
            Ok(())
        } else {
            Err(CompileError::UnsupportedVersion {
                version: format!("{}.{}", ir.version.major, ir.version.minor),
                supported: format_allow_list(self.allow_list),
            })
        }
    }
}
