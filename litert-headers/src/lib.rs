//! Manifest of the LiteRT C API declaration groups.
//!
//! The LiteRT C API is split over thirteen headers. `litert-sys` exposes all of them through
//! one guarded wrapper header and one Rust module; this crate is the single source of truth
//! for which headers that is, in which order, and how to find them in an SDK checkout. It has
//! no native dependencies so the manifest can be inspected and tested without the SDK.
//!
//! ```
//! use litert_headers::{DeclarationGroup, Manifest};
//!
//! let manifest = Manifest::litert();
//! assert!(manifest.contains(DeclarationGroup::TensorBuffer));
//! assert!(manifest.render_wrapper().contains("litert/c/litert_tensor_buffer.h"));
//! ```

mod config;
mod error;
mod group;
mod manifest;

pub use config::{
    BindingsSource, BuildConfig, BINDINGS_RS_VAR, DEFAULT_LIB_NAME, ENV_VARS, INCLUDE_DIR_VAR,
    LIB_DIR_VAR, LIB_NAME_VAR, LINK_STATIC_VAR,
};
pub use error::{ConfigError, HeaderError, ManifestError};
pub use group::{DeclarationGroup, C_API_DIR};
pub use manifest::{allowlist_pattern, Manifest, ResolvedManifest, MANIFEST_VERSION, WRAPPER_GUARD};
