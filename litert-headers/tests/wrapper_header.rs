use litert_headers::{DeclarationGroup, Manifest, WRAPPER_GUARD};

const CHECKED_IN_WRAPPER: &str = include_str!("../../litert-sys/wrapper.h");

#[test]
fn checked_in_wrapper_matches_manifest() {
    assert_eq!(
        CHECKED_IN_WRAPPER,
        Manifest::litert().render_wrapper(),
        "litert-sys/wrapper.h is stale, regenerate it from Manifest::render_wrapper"
    );
}

#[test]
fn checked_in_wrapper_includes_each_group_once() {
    for group in DeclarationGroup::ALL {
        let include = format!("#include \"{}\"", group.header());
        assert_eq!(
            CHECKED_IN_WRAPPER.matches(&include).count(),
            1,
            "{group} should be included exactly once"
        );
    }
    assert_eq!(CHECKED_IN_WRAPPER.matches(WRAPPER_GUARD).count(), 3);
}
