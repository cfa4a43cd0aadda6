#[test]
fn segmentation_example_propagates_errors() {
    let example = include_str!("../examples/segmentation.rs");
    assert!(
        !example.contains(".unwrap()") && !example.contains(".expect("),
        "the example should report failures through anyhow instead of panicking"
    );
    assert!(
        example.contains("fn main() -> Result<()>"),
        "the example should return anyhow::Result from main"
    );
}

#[test]
fn segmentation_example_syncs_native_logging() {
    let example = include_str!("../examples/segmentation.rs");
    let subscriber = example
        .find("tracing_subscriber::fmt()")
        .expect("the example should install a tracing subscriber");
    let sync = example
        .find("litert::sync_native_log_severity()")
        .expect("the example should align the runtime logger with RUST_LOG");
    assert!(
        subscriber < sync,
        "the runtime logger must be synced after the subscriber is installed"
    );
}
