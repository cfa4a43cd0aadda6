use serde::{Deserialize, Serialize};

/// Directory of the LiteRT C API, relative to the SDK include root.
pub const C_API_DIR: &str = "litert/c";

/// One facet of the LiteRT C API, declared by a single header.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeclarationGroup {
    /// Log severities and the default logger.
    Logging,
    /// Status codes, shared enums and opaque handle typedefs.
    Common,
    CompiledModel,
    Environment,
    EnvironmentOptions,
    /// Synchronization fences attached to tensor buffers.
    Event,
    Metrics,
    Model,
    OpOptions,
    OpaqueOptions,
    Options,
    TensorBuffer,
    /// Size, alignment and supported buffer types for a tensor buffer.
    TensorBufferRequirements,
}

impl DeclarationGroup {
    /// Number of declaration groups in the C API.
    pub const COUNT: usize = 13;

    /// All groups in canonical manifest order.
    pub const ALL: [DeclarationGroup; Self::COUNT] = [
        Self::Logging,
        Self::Common,
        Self::CompiledModel,
        Self::Environment,
        Self::EnvironmentOptions,
        Self::Event,
        Self::Metrics,
        Self::Model,
        Self::OpOptions,
        Self::OpaqueOptions,
        Self::Options,
        Self::TensorBuffer,
        Self::TensorBufferRequirements,
    ];

    /// Stable kebab-case name, e.g. `tensor-buffer-requirements`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Header file name without directories.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Logging => "litert_logging.h",
            Self::Common => "litert_common.h",
            Self::CompiledModel => "litert_compiled_model.h",
            Self::Environment => "litert_environment.h",
            Self::EnvironmentOptions => "litert_environment_options.h",
            Self::Event => "litert_event.h",
            Self::Metrics => "litert_metrics.h",
            Self::Model => "litert_model.h",
            Self::OpOptions => "litert_op_options.h",
            Self::OpaqueOptions => "litert_opaque_options.h",
            Self::Options => "litert_options.h",
            Self::TensorBuffer => "litert_tensor_buffer.h",
            Self::TensorBufferRequirements => "litert_tensor_buffer_requirements.h",
        }
    }

    /// Whether the header lives under `litert/c/internal`.
    pub fn is_internal(self) -> bool {
        matches!(self, Self::Logging)
    }

    /// Header path relative to the SDK include root, with `/` separators.
    pub fn header(self) -> String {
        if self.is_internal() {
            format!("{C_API_DIR}/internal/{}", self.file_name())
        } else {
            format!("{C_API_DIR}/{}", self.file_name())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::DeclarationGroup;

    #[test]
    fn all_matches_declaration_order() {
        let iterated: Vec<_> = DeclarationGroup::iter().collect();
        assert_eq!(iterated, DeclarationGroup::ALL.to_vec());
    }

    #[test]
    fn names_round_trip() {
        for group in DeclarationGroup::ALL {
            assert_eq!(DeclarationGroup::from_str(group.name()).unwrap(), group);
            assert_eq!(group.to_string(), group.name());
        }
        assert_eq!(
            DeclarationGroup::TensorBufferRequirements.name(),
            "tensor-buffer-requirements"
        );
        assert!(DeclarationGroup::from_str("tensor-buffers").is_err());
    }

    #[test]
    fn headers_are_distinct() {
        let headers: HashSet<_> = DeclarationGroup::ALL.iter().map(|g| g.header()).collect();
        assert_eq!(headers.len(), DeclarationGroup::COUNT);
    }

    #[test]
    fn logging_is_internal() {
        assert_eq!(
            DeclarationGroup::Logging.header(),
            "litert/c/internal/litert_logging.h"
        );
        assert_eq!(
            DeclarationGroup::OpaqueOptions.header(),
            "litert/c/litert_opaque_options.h"
        );
        assert_eq!(
            DeclarationGroup::ALL
                .iter()
                .filter(|g| g.is_internal())
                .count(),
            1
        );
    }
}
