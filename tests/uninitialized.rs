#[test]
fn nothing_is_installed_by_default() {
    assert!(tierlog::try_global().is_none());
}

#[test]
#[should_panic(expected = "tierlog::init must be called before logging")]
fn logging_before_init_panics() {
    tierlog::info("too early", &[]);
}
