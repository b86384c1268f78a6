//! Compile pipeline
//!
//! reader → decoder → builder → validator, one synchronous pass. Recoverable
//! findings go to the caller's [`Diagnostics`]; the first error ends the run.

use std::path::Path;

use crate::builder::IrBuilder;
use crate::decoder;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::ir::Ir;
use crate::reader;
use crate::validator::IrValidator;

/// Front end turning a configuration document into validated IR
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    validator: IrValidator,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the document at `path`. Relative file references inside the
    /// document resolve against the document's directory.
    pub fn compile_file(&self, path: &str, diagnostics: &mut Diagnostics) -> Result<Ir> {
        let document = reader::load(path, diagnostics)?;
        let value = document.decode()?;

        let mut builder = IrBuilder::new(diagnostics);
        if let Some(dir) = document.base_dir() {
            builder = builder.with_base_dir(dir);
        }
        let ir = builder.build(&value)?;

        self.validator.validate(&ir)?;
        tracing::debug!("compiled {}: {}", document.path.display(), ir.summary());
        Ok(ir)
    }

    /// Compile in-memory document text
    pub fn compile_str(
        &self,
        text: &str,
        base_dir: Option<&Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Ir> {
        let value = decoder::decode(text)?;

        let mut builder = IrBuilder::new(diagnostics);
        if let Some(dir) = base_dir {
            builder = builder.with_base_dir(dir);
        }
        let ir = builder.build(&value)?;

        self.validator.validate(&ir)?;
        Ok(ir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileError, ErrorCode};
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
// minimal document
{
    "wolfes_version": "0.9.1",
    "platform": 0,
    "lang": 0,
    "apps": [{
        "namespace": "demo",
        "protocol_type": 0,
        "nodes": [{
            "classname": "DemoNode",
            // one timer, everything else defaulted
            "timers": [{ "type": 0, "period": 50 }]
        }]
    }]
}
"#;

    #[test]
    fn test_compile_str() {
        let mut diags = Diagnostics::new();
        let ir = Compiler::new().compile_str(MINIMAL, None, &mut diags).unwrap();
        assert_eq!(ir.summary().timers, 1);
        assert!(diags.has_warnings());
    }

    #[test]
    fn test_compile_file_resolves_relative_refs() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("sched.json"), "{}").unwrap();
        let text = MINIMAL.replace(
            "\"protocol_type\": 0,",
            "\"protocol_type\": 0, \"scheduler_config\": \"sched.json\",",
        );
        let path = dir.path().join("app.json");
        std::fs::write(&path, text).unwrap();

        let mut diags = Diagnostics::new();
        let ir = Compiler::new()
            .compile_file(path.to_str().unwrap(), &mut diags)
            .unwrap();
        assert_eq!(ir.apps[0].scheduler_config.as_deref(), Some("sched.json"));
    }

    #[test]
    fn test_compile_file_reports_decode_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"wolfes_version\": ").unwrap();

        let mut diags = Diagnostics::new();
        let err = Compiler::new()
            .compile_file(path.to_str().unwrap(), &mut diags)
            .unwrap_err();
        assert!(matches!(err, CompileError::DocumentInvalid(_)));
        assert_eq!(err.code(), ErrorCode::FileInvalid);
    }
}
