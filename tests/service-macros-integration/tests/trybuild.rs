//! service_macros 编译期测试

#[test]
fn trybuild_service_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/service_ok.rs");
    t.pass("tests/trybuild/service_members.rs");
}
