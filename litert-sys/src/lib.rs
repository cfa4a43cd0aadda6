//! Raw bindings to the LiteRT C API.
//!
//! Every declaration of the thirteen C API headers listed in [`build_info::Manifest::litert`]
//! is generated from `wrapper.h` into this one module, so `use litert_sys::*` exposes the
//! whole API in one step. Nothing else is generated: types pulled in from libc or platform
//! headers only appear when a LiteRT declaration needs them.
//!
//! The build script reads its configuration from the environment:
//!
//! - `LITERT_INCLUDE_DIR`: SDK include root, the directory containing `litert/c`.
//! - `LITERT_LIB_DIR`: directory with the runtime library.
//! - `LITERT_LIB_NAME`: library to link, `LiteRtRuntimeCApi` by default.
//! - `LITERT_LINK_STATIC`: link the library statically.
//! - `LITERT_BINDINGS_RS`: use these pre-generated bindings instead of running bindgen.
//!
//! Safe wrappers live in the `litert` crate.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code, clippy::all)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

/// Provenance of the generated bindings.
///
/// Kept in its own module so the crate root holds nothing but C API declarations.
pub mod build_info {
    pub use litert_headers::{DeclarationGroup, Manifest, MANIFEST_VERSION, WRAPPER_GUARD};

    /// The manifest these bindings were generated from, as JSON.
    pub const MANIFEST_JSON: &str = include_str!(concat!(env!("OUT_DIR"), "/manifest.json"));

    /// Parses [`MANIFEST_JSON`], rejecting a foreign version stamp or guard.
    pub fn manifest() -> Result<Manifest, serde_json::Error> {
        serde_json::from_str(MANIFEST_JSON)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn built_from_canonical_manifest() {
            let manifest = manifest().unwrap();
            assert_eq!(manifest.version(), MANIFEST_VERSION);
            assert_eq!(manifest.guard(), WRAPPER_GUARD);
            assert_eq!(manifest, Manifest::litert());
            assert!(manifest.validate().is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use litert_headers::DeclarationGroup;

    use super::*;

    #[test]
    fn status_codes_are_exported() {
        assert_eq!(LiteRtStatus_kLiteRtStatusOk, 0);
        assert_eq!(LiteRtStatus_kLiteRtStatusErrorInvalidArgument, 1);
    }

    #[test]
    fn every_group_contributes_declarations() {
        // Exhaustive so a new group cannot be added without naming one of its symbols.
        for group in DeclarationGroup::ALL {
            match group {
                DeclarationGroup::Logging => {
                    let _ = size_of::<LiteRtLogger>();
                    let _ = LiteRtLogSeverity_kLiteRtLogSeverityError;
                    let _ = LiteRtSetMinLoggerSeverity;
                }
                DeclarationGroup::Common => {
                    let _ = size_of::<LiteRtStatus>();
                    let _ = LiteRtGetStatusString;
                }
                DeclarationGroup::CompiledModel => {
                    let _ = size_of::<LiteRtCompiledModel>();
                    let _ = LiteRtCreateCompiledModel;
                    let _ = LiteRtRunCompiledModel;
                }
                DeclarationGroup::Environment => {
                    let _ = size_of::<LiteRtEnvironment>();
                    let _ = LiteRtCreateEnvironment;
                    let _ = LiteRtDestroyEnvironment;
                }
                DeclarationGroup::EnvironmentOptions => {
                    let _ = size_of::<LiteRtEnvironmentOptions>();
                    let _ = size_of::<LiteRtEnvOption>();
                    let _ = LiteRtEnvOptionTag_kLiteRtEnvOptionTagDispatchLibraryDir;
                }
                DeclarationGroup::Event => {
                    let _ = size_of::<LiteRtEvent>();
                    let _ = LiteRtWaitEvent;
                }
                DeclarationGroup::Metrics => {
                    let _ = size_of::<LiteRtMetrics>();
                }
                DeclarationGroup::Model => {
                    let _ = size_of::<LiteRtModel>();
                    let _ = size_of::<LiteRtSignature>();
                    let _ = LiteRtCreateModelFromFile;
                }
                DeclarationGroup::OpOptions => {
                    let _ = LiteRtGetAddFusedActivationOption;
                }
                DeclarationGroup::OpaqueOptions => {
                    let _ = size_of::<LiteRtOpaqueOptions>();
                }
                DeclarationGroup::Options => {
                    let _ = size_of::<LiteRtOptions>();
                    let _ = LiteRtCreateOptions;
                    let _ = LiteRtSetOptionsHardwareAccelerators;
                }
                DeclarationGroup::TensorBuffer => {
                    let _ = size_of::<LiteRtTensorBuffer>();
                    let _ = LiteRtCreateManagedTensorBuffer;
                    let _ = LiteRtLockTensorBuffer;
                }
                DeclarationGroup::TensorBufferRequirements => {
                    let _ = size_of::<LiteRtTensorBufferRequirements>();
                    let _ = LiteRtGetTensorBufferRequirementsBufferSize;
                }
            }
        }
    }
}
