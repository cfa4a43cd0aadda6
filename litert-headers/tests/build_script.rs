//! Checks on the `litert-sys` build script, which cannot be unit tested in place.

const BUILD_RS: &str = include_str!("../../litert-sys/build.rs");

// Instructions Cargo acts on, plus the `links` metadata published to dependents as
// `DEP_LITERT_*`.
const INSTRUCTIONS: &[&str] = &[
    "rerun-if-changed",
    "rerun-if-env-changed",
    "rustc-link-search",
    "rustc-link-lib",
    "warning",
];
const LINKS_METADATA: &[&str] = &["include", "lib_dir"];

#[test]
fn build_script_emits_only_known_directives() {
    let keys: Vec<&str> = BUILD_RS
        .match_indices("\"cargo:")
        .map(|(start, _)| {
            let rest = &BUILD_RS[start + "\"cargo:".len()..];
            &rest[..rest.find('=').expect("cargo directive without `=`")]
        })
        .collect();
    assert!(!keys.is_empty());
    for key in keys {
        assert!(
            INSTRUCTIONS.contains(&key) || LINKS_METADATA.contains(&key),
            "build.rs emits unexpected `cargo:{key}=`"
        );
    }
}

#[test]
fn build_script_reruns_on_every_config_var() {
    assert!(BUILD_RS.contains("for var in ENV_VARS"));
    assert!(BUILD_RS.contains("cargo:rerun-if-env-changed={var}"));
    assert!(BUILD_RS.contains("cargo:rerun-if-changed={WRAPPER}"));
}
