use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use litert_headers::{BindingsSource, BuildConfig, Manifest, ENV_VARS};

const WRAPPER: &str = "wrapper.h";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={WRAPPER}");
    for var in ENV_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR is not set")?);
    let manifest = Manifest::litert();

    // The checked-in wrapper is what bindgen parses, it must not drift from the manifest.
    let wrapper = fs::read_to_string(WRAPPER).with_context(|| format!("reading {WRAPPER}"))?;
    if wrapper != manifest.render_wrapper() {
        bail!(
            "{WRAPPER} does not match declaration manifest v{}, regenerate it from `Manifest::render_wrapper`",
            manifest.version()
        );
    }
    fs::write(
        out_dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    let config = BuildConfig::from_env()?;

    let bindings_rs = out_dir.join("bindings.rs");
    match &config.source {
        BindingsSource::Pregenerated(path) => {
            println!("cargo:rerun-if-changed={}", path.display());
            fs::copy(path, &bindings_rs)
                .with_context(|| format!("copying pre-generated bindings {}", path.display()))?;
        }
        BindingsSource::Generate { include_dir } => {
            generate(&manifest, include_dir, &bindings_rs)?;
            println!("cargo:include={}", include_dir.display());
        }
    }

    if let Some(lib_dir) = &config.lib_dir {
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
        println!("cargo:lib_dir={}", lib_dir.display());
    }
    println!(
        "cargo:rustc-link-lib={}={}",
        config.link_kind(),
        config.lib_name
    );
    Ok(())
}

fn generate(manifest: &Manifest, include_dir: &Path, out_file: &Path) -> Result<()> {
    // A missing group fails here, naming the group, before clang ever runs.
    let resolved = manifest.resolve(include_dir)?;
    for (_, header) in resolved.headers() {
        println!("cargo:rerun-if-changed={}", header.display());
    }

    let mut builder = bindgen::Builder::default()
        .header(WRAPPER)
        .clang_arg(format!("-I{}", resolved.include_root().display()))
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .derive_default(true)
        .layout_tests(false)
        .generate_comments(true);
    for pattern in resolved.allowlist_patterns() {
        builder = builder.allowlist_file(pattern);
    }

    builder
        .generate()
        .context("bindgen failed to process the LiteRT C API headers")?
        .write_to_file(out_file)
        .with_context(|| format!("writing {}", out_file.display()))?;
    Ok(())
}
