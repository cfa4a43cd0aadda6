use std::path::PathBuf;

use thiserror::Error;

use crate::DeclarationGroup;

/// A manifest that does not cover the full C API or was stamped by another version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("declaration group `{0}` is missing from the manifest")]
    MissingGroup(DeclarationGroup),
    #[error("manifest version {found} does not match version {expected} of these bindings")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("manifest guard {0:?} is not the wrapper guard")]
    UnexpectedGuard(String),
}

/// Failure to resolve a declaration group against an SDK include root.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("SDK include root `{}` is not a directory", .0.display())]
    IncludeRootNotFound(PathBuf),
    #[error("header for declaration group `{group}` not found at `{}`", .path.display())]
    MissingHeader {
        group: DeclarationGroup,
        path: PathBuf,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl HeaderError {
    /// The declaration group the failure is attributable to, if any.
    pub fn group(&self) -> Option<DeclarationGroup> {
        match self {
            Self::MissingHeader { group, .. } => Some(*group),
            Self::Manifest(ManifestError::MissingGroup(group)) => Some(*group),
            Self::Manifest(_) | Self::IncludeRootNotFound(_) => None,
        }
    }
}

/// Invalid build configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` must be set to the LiteRT SDK include root (or set `{1}` to pre-generated bindings)")]
    MissingIncludeDir(&'static str, &'static str),
    #[error("`{var}` has invalid value `{value}`, expected one of 1, 0, true, false")]
    InvalidFlag { var: &'static str, value: String },
}
