use std::path::PathBuf;

use crate::ConfigError;

pub const INCLUDE_DIR_VAR: &str = "LITERT_INCLUDE_DIR";
pub const LIB_DIR_VAR: &str = "LITERT_LIB_DIR";
pub const LIB_NAME_VAR: &str = "LITERT_LIB_NAME";
pub const LINK_STATIC_VAR: &str = "LITERT_LINK_STATIC";
pub const BINDINGS_RS_VAR: &str = "LITERT_BINDINGS_RS";

/// Shared library exported by the LiteRT runtime C API target.
pub const DEFAULT_LIB_NAME: &str = "LiteRtRuntimeCApi";

/// Every variable `BuildConfig` reads, for `cargo:rerun-if-env-changed`.
pub const ENV_VARS: [&str; 5] = [
    INCLUDE_DIR_VAR,
    LIB_DIR_VAR,
    LIB_NAME_VAR,
    LINK_STATIC_VAR,
    BINDINGS_RS_VAR,
];

/// Where bindings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingsSource {
    /// Run bindgen over the SDK headers found under this include root.
    Generate { include_dir: PathBuf },
    /// Use a bindings file produced by another build system.
    Pregenerated(PathBuf),
}

/// How `litert-sys` finds headers and links the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub source: BindingsSource,
    pub lib_dir: Option<PathBuf>,
    pub lib_name: String,
    pub link_static: bool,
}

impl BuildConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let source = match (get(BINDINGS_RS_VAR), get(INCLUDE_DIR_VAR)) {
            (Some(bindings), _) => BindingsSource::Pregenerated(PathBuf::from(bindings)),
            (None, Some(include_dir)) => BindingsSource::Generate {
                include_dir: PathBuf::from(include_dir),
            },
            (None, None) => {
                return Err(ConfigError::MissingIncludeDir(
                    INCLUDE_DIR_VAR,
                    BINDINGS_RS_VAR,
                ))
            }
        };

        let link_static = match get(LINK_STATIC_VAR) {
            None => false,
            Some(value) => parse_flag(LINK_STATIC_VAR, &value)?,
        };

        Ok(Self {
            source,
            lib_dir: get(LIB_DIR_VAR).map(PathBuf::from),
            lib_name: get(LIB_NAME_VAR).unwrap_or_else(|| DEFAULT_LIB_NAME.to_string()),
            link_static,
        })
    }

    /// `cargo:rustc-link-lib` kind for the runtime library.
    pub fn link_kind(&self) -> &'static str {
        if self.link_static {
            "static"
        } else {
            "dylib"
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<BuildConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BuildConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[(INCLUDE_DIR_VAR, "/opt/litert/include")]).unwrap();
        assert_eq!(
            cfg.source,
            BindingsSource::Generate {
                include_dir: PathBuf::from("/opt/litert/include")
            }
        );
        assert_eq!(cfg.lib_dir, None);
        assert_eq!(cfg.lib_name, DEFAULT_LIB_NAME);
        assert_eq!(cfg.link_kind(), "dylib");
    }

    #[test]
    fn pregenerated_wins() {
        let cfg = config(&[
            (INCLUDE_DIR_VAR, "/opt/litert/include"),
            (BINDINGS_RS_VAR, "/tmp/bindings.rs"),
        ])
        .unwrap();
        assert_eq!(
            cfg.source,
            BindingsSource::Pregenerated(PathBuf::from("/tmp/bindings.rs"))
        );
    }

    #[test]
    fn missing_include_dir() {
        assert_eq!(
            config(&[]),
            Err(ConfigError::MissingIncludeDir(INCLUDE_DIR_VAR, BINDINGS_RS_VAR))
        );
        assert_eq!(
            config(&[(INCLUDE_DIR_VAR, "  ")]),
            Err(ConfigError::MissingIncludeDir(INCLUDE_DIR_VAR, BINDINGS_RS_VAR))
        );
    }

    #[test]
    fn link_overrides() {
        let cfg = config(&[
            (INCLUDE_DIR_VAR, "/sdk"),
            (LIB_DIR_VAR, "/sdk/lib"),
            (LIB_NAME_VAR, "litert_c_api"),
            (LINK_STATIC_VAR, "TRUE"),
        ])
        .unwrap();
        assert_eq!(cfg.lib_dir, Some(PathBuf::from("/sdk/lib")));
        assert_eq!(cfg.lib_name, "litert_c_api");
        assert_eq!(cfg.link_kind(), "static");
    }

    #[test]
    fn bad_flag() {
        let err = config(&[(INCLUDE_DIR_VAR, "/sdk"), (LINK_STATIC_VAR, "yes")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidFlag {
                var: LINK_STATIC_VAR,
                value: "yes".to_string()
            }
        );
    }
}
