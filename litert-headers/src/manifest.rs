use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::{DeclarationGroup, HeaderError, ManifestError};

/// Bumped whenever the set of groups or the rendered wrapper changes.
pub const MANIFEST_VERSION: u32 = 1;

/// Include guard of the rendered wrapper header.
pub const WRAPPER_GUARD: &str = "LITERT_RUST_LITERT_SYS_WRAPPER_H_";

const KEEP_PRAGMA: &str = "// IWYU pragma: keep";

/// Ordered set of declaration groups exposed through one inclusion point.
///
/// Adding a group that is already present is a no-op, so a manifest built from any number
/// of repetitions of the same groups is equal to one built from a single pass.
///
/// Deserialization rejects a version stamp or guard other than [`MANIFEST_VERSION`] and
/// [`WRAPPER_GUARD`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ManifestRepr")]
pub struct Manifest {
    version: u32,
    guard: String,
    groups: IndexSet<DeclarationGroup>,
}

#[derive(Deserialize)]
struct ManifestRepr {
    version: u32,
    guard: String,
    groups: IndexSet<DeclarationGroup>,
}

impl TryFrom<ManifestRepr> for Manifest {
    type Error = ManifestError;

    fn try_from(repr: ManifestRepr) -> Result<Self, Self::Error> {
        let manifest = Self {
            version: repr.version,
            guard: repr.guard,
            groups: repr.groups,
        };
        manifest.check_stamp()?;
        Ok(manifest)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::litert()
    }
}

impl Manifest {
    /// The full LiteRT C API in canonical order.
    pub fn litert() -> Self {
        Self::from_groups(DeclarationGroup::ALL)
    }

    /// Builds a manifest from `groups`, keeping the first occurrence of each.
    pub fn from_groups(groups: impl IntoIterator<Item = DeclarationGroup>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            guard: WRAPPER_GUARD.to_string(),
            groups: groups.into_iter().collect(),
        }
    }

    /// Adds `group`, returning `false` if it was already included.
    pub fn include(&mut self, group: DeclarationGroup) -> bool {
        self.groups.insert(group)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn guard(&self) -> &str {
        &self.guard
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, group: DeclarationGroup) -> bool {
        self.groups.contains(&group)
    }

    /// Groups in manifest order.
    pub fn groups(&self) -> impl ExactSizeIterator<Item = DeclarationGroup> + '_ {
        self.groups.iter().copied()
    }

    /// Fails on a foreign version stamp or guard, then on the first group of the C API that
    /// is not part of this manifest.
    pub fn validate(&self) -> Result<(), ManifestError> {
        self.check_stamp()?;
        match DeclarationGroup::ALL
            .into_iter()
            .find(|group| !self.groups.contains(group))
        {
            Some(group) => Err(ManifestError::MissingGroup(group)),
            None => Ok(()),
        }
    }

    fn check_stamp(&self) -> Result<(), ManifestError> {
        if self.version != MANIFEST_VERSION {
            return Err(ManifestError::VersionMismatch {
                found: self.version,
                expected: MANIFEST_VERSION,
            });
        }
        if self.guard != WRAPPER_GUARD {
            return Err(ManifestError::UnexpectedGuard(self.guard.clone()));
        }
        Ok(())
    }

    /// Renders the guarded C header that includes every group once.
    ///
    /// Include paths are relative to the SDK include root, which must be passed to the
    /// compiler with `-I`.
    pub fn render_wrapper(&self) -> String {
        let includes: Vec<String> = self
            .groups()
            .map(|group| format!("#include \"{}\"", group.header()))
            .collect();
        let width = includes.iter().map(String::len).max().unwrap_or(0);

        let mut out = format!("#ifndef {0}\n#define {0}\n\n", self.guard);
        for include in &includes {
            out.push_str(&format!("{include:<width$}  {KEEP_PRAGMA}\n"));
        }
        out.push_str(&format!("\n#endif  // {}\n", self.guard));
        out
    }

    /// Locates every group header under `include_root`.
    ///
    /// The manifest must cover the whole C API; the first header that does not exist is
    /// reported together with its group.
    pub fn resolve(&self, include_root: impl AsRef<Path>) -> Result<ResolvedManifest, HeaderError> {
        let include_root = include_root.as_ref();
        self.validate()?;
        if !include_root.is_dir() {
            return Err(HeaderError::IncludeRootNotFound(include_root.to_path_buf()));
        }

        let mut headers = IndexMap::with_capacity(self.len());
        for group in self.groups() {
            let path = group
                .header()
                .split('/')
                .fold(include_root.to_path_buf(), |path, part| path.join(part));
            if !path.is_file() {
                return Err(HeaderError::MissingHeader { group, path });
            }
            headers.insert(group, path);
        }

        Ok(ResolvedManifest {
            include_root: include_root.to_path_buf(),
            headers,
        })
    }
}

/// A manifest whose headers were all found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    include_root: PathBuf,
    headers: IndexMap<DeclarationGroup, PathBuf>,
}

impl ResolvedManifest {
    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    pub fn path(&self, group: DeclarationGroup) -> Option<&Path> {
        self.headers.get(&group).map(PathBuf::as_path)
    }

    /// `(group, absolute header path)` in manifest order.
    pub fn headers(&self) -> impl ExactSizeIterator<Item = (DeclarationGroup, &Path)> + '_ {
        self.headers
            .iter()
            .map(|(group, path)| (*group, path.as_path()))
    }

    /// One file-allowlist regex per header, for bindgen's `allowlist_file`.
    ///
    /// Restricting generation to these files keeps declarations pulled in transitively
    /// (libc, platform headers) out of the bindings.
    pub fn allowlist_patterns(&self) -> Vec<String> {
        self.headers
            .keys()
            .map(|group| allowlist_pattern(*group))
            .collect()
    }
}

/// Regex matching the path of `group`'s header with either separator style.
pub fn allowlist_pattern(group: DeclarationGroup) -> String {
    let parts: Vec<String> = group.header().split('/').map(regex::escape).collect();
    format!(".*[/\\\\]{}", parts.join("[/\\\\]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_manifest_is_complete() {
        let manifest = Manifest::litert();
        assert_eq!(manifest.len(), DeclarationGroup::COUNT);
        assert_eq!(manifest.version(), MANIFEST_VERSION);
        assert!(manifest.validate().is_ok());
        assert_eq!(
            manifest.groups().collect::<Vec<_>>(),
            DeclarationGroup::ALL.to_vec()
        );
    }

    #[test]
    fn repeated_groups_collapse() {
        let once = Manifest::litert();
        for n in 1..=4 {
            let repeated = Manifest::from_groups(
                std::iter::repeat(DeclarationGroup::ALL)
                    .take(n)
                    .flatten(),
            );
            assert_eq!(repeated, once);
            assert_eq!(repeated.render_wrapper(), once.render_wrapper());
        }
    }

    #[test]
    fn include_reports_duplicates() {
        let mut manifest = Manifest::from_groups([DeclarationGroup::Common]);
        assert!(!manifest.include(DeclarationGroup::Common));
        assert!(manifest.include(DeclarationGroup::Event));
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn validate_names_missing_group() {
        let manifest = Manifest::from_groups(
            DeclarationGroup::ALL
                .into_iter()
                .filter(|g| *g != DeclarationGroup::Metrics),
        );
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::MissingGroup(DeclarationGroup::Metrics))
        );
    }

    #[test]
    fn wrapper_is_guarded() {
        let wrapper = Manifest::litert().render_wrapper();
        let lines: Vec<&str> = wrapper.lines().collect();
        assert_eq!(lines[0], format!("#ifndef {WRAPPER_GUARD}"));
        assert_eq!(lines[1], format!("#define {WRAPPER_GUARD}"));
        assert_eq!(
            lines.last().copied(),
            Some(format!("#endif  // {WRAPPER_GUARD}").as_str())
        );
        assert_eq!(wrapper.matches("#include").count(), DeclarationGroup::COUNT);
    }

    #[test]
    fn wrapper_pragmas_are_aligned() {
        let wrapper = Manifest::litert().render_wrapper();
        let columns: Vec<usize> = wrapper
            .lines()
            .filter(|line| line.starts_with("#include"))
            .map(|line| line.find(KEEP_PRAGMA).unwrap())
            .collect();
        assert!(columns.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn escapes_dots() {
        assert_eq!(
            allowlist_pattern(DeclarationGroup::Common),
            ".*[/\\\\]litert[/\\\\]c[/\\\\]litert_common\\.h"
        );
    }

    #[test]
    fn validate_rejects_foreign_version() {
        let mut manifest = Manifest::litert();
        manifest.version = MANIFEST_VERSION + 1;
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::VersionMismatch {
                found: MANIFEST_VERSION + 1,
                expected: MANIFEST_VERSION,
            })
        );
    }

    #[test]
    fn validate_rejects_foreign_guard() {
        let mut manifest = Manifest::litert();
        manifest.guard = "FOO\n#include \"other.h\"".to_string();
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::UnexpectedGuard(manifest.guard.clone()))
        );
    }

    #[test]
    fn deserialize_checks_stamp() {
        let mut json = serde_json::to_value(Manifest::litert()).unwrap();
        assert_eq!(
            serde_json::from_value::<Manifest>(json.clone()).unwrap(),
            Manifest::litert()
        );

        json["version"] = serde_json::json!(99);
        let err = serde_json::from_value::<Manifest>(json.clone()).unwrap_err();
        assert!(err.to_string().contains("version 99"), "{err}");

        json["version"] = serde_json::json!(MANIFEST_VERSION);
        json["guard"] = serde_json::json!("FOO\n#include \"other.h\"");
        let err = serde_json::from_value::<Manifest>(json).unwrap_err();
        assert!(err.to_string().contains("guard"), "{err}");
    }
}
