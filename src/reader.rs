//! Configuration document reader
//!
//! Resolves the input path, performs the minimal sanity checks and hands the
//! raw text to the decoder.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::decoder;
use crate::diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
use crate::error::{CompileError, Result};
use crate::location::Location;

/// Paths shorter than this are rejected before touching the filesystem
pub const MIN_PATH_LEN: usize = 4;

/// Documents shorter than this cannot hold even `{}`
pub const MIN_CONTENT_LEN: usize = 2;

/// A loaded configuration document
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    /// Path the document was read from, after `~` expansion
    pub path: PathBuf,
    /// Raw text including comment lines
    pub text: String,
}

impl ConfigDocument {
    /// Directory relative referenced files are resolved against
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Decode the text into a document tree
    pub fn decode(&self) -> Result<Value> {
        decoder::decode(&self.text)
    }
}

/// Read the configuration document at `path`
pub fn load(path: &str, diagnostics: &mut Diagnostics) -> Result<ConfigDocument> {
    if path.chars().count() < MIN_PATH_LEN {
        return Err(CompileError::InvalidArgument(format!(
            "config file path \"{}\" is too short",
            path
        )));
    }

    let resolved = expand_home(path)?;
    if resolved.as_os_str() != path {
        diagnostics.push(DiagnosticItem::new(
            Location::root(),
            DiagnosticCode::HomeDirExpanded,
            format!("expanded \"{}\" to {}", path, resolved.display()),
        ));
    }

    if !resolved.exists() {
        return Err(CompileError::FileNotFound { path: resolved });
    }

    let bytes = fs::read(&resolved)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        CompileError::FileInvalid(format!("{} is not valid UTF-8: {}", resolved.display(), e))
    })?;
    if text.chars().count() < MIN_CONTENT_LEN {
        return Err(CompileError::FileInvalid(format!(
            "{} is too short ({} characters)",
            resolved.display(),
            text.chars().count()
        )));
    }

    tracing::debug!("read {} bytes from {}", text.len(), resolved.display());
    Ok(ConfigDocument {
        path: resolved,
        text,
    })
}

/// Expand a leading `~` to the current user's home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return Ok(PathBuf::from(path)),
    };

    let dirs = directories::BaseDirs::new().ok_or_else(|| {
        CompileError::InvalidArgument(format!("cannot expand \"{}\": no home directory", path))
    })?;
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(dirs.home_dir().to_path_buf())
    } else {
        Ok(dirs.home_dir().join(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    #[test]
    fn test_short_path_rejected() {
        let mut diags = Diagnostics::new();
        let err = load("a.j", &mut diags).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let mut diags = Diagnostics::new();
        let err = load(path.to_str().unwrap(), &mut diags).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileNotFound);
    }

    #[test]
    fn test_too_short_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.json");
        fs::write(&path, "{").unwrap();
        let mut diags = Diagnostics::new();
        let err = load(path.to_str().unwrap(), &mut diags).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileInvalid);
    }

    #[test]
    fn test_non_utf8_content_is_file_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.json");
        fs::write(&path, [0xff, 0xfe, b'{', b'}']).unwrap();
        let mut diags = Diagnostics::new();
        let err = load(path.to_str().unwrap(), &mut diags).unwrap_err();
        assert!(matches!(err, CompileError::FileInvalid(_)));
        assert_eq!(err.code(), ErrorCode::FileInvalid);
    }

    #[test]
    fn test_load_and_decode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, "// c\n{\"a\": 1}").unwrap();
        let mut diags = Diagnostics::new();
        let doc = load(path.to_str().unwrap(), &mut diags).unwrap();
        assert_eq!(doc.base_dir(), Some(dir.path()));
        assert_eq!(doc.decode().unwrap()["a"], 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("./cfg.json").unwrap(), PathBuf::from("./cfg.json"));
        assert_eq!(expand_home("a~b.json").unwrap(), PathBuf::from("a~b.json"));
        if let Some(dirs) = directories::BaseDirs::new() {
            assert_eq!(
                expand_home("~/cfg.json").unwrap(),
                dirs.home_dir().join("cfg.json")
            );
        }
    }
}
