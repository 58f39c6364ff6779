//! End-to-end behaviour of the locators and inserters on realistic sources.

use brace_patcher::imports::add_imports;
use brace_patcher::locate::{
    append_contents_inside_declaration_block, append_contents_inside_named_block,
    find_declaration_code_block, find_named_code_block, find_new_instance_code_block,
    ImportStyle, Language, LocateError,
};
use brace_patcher::scan::find_matching_bracket_position;
use std::fs;

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|err| panic!("failed to load fixture {name}: {err}"))
}

#[test]
fn method_body_append_leaves_class_braces_alone() {
    let src = "class Foo {\n  void bar() {\n  }\n}";
    let out = append_contents_inside_declaration_block(src, "void bar()", "  doStuff();\n").unwrap();

    let inserted_at = out.find("doStuff();").unwrap();
    let bar_close = find_matching_bracket_position(&out, '{', out.find("bar()").unwrap()).unwrap();
    assert!(inserted_at < bar_close);
    assert_eq!(&out[inserted_at + "doStuff();\n".len()..], "}\n}");
    assert!(out.starts_with("class Foo {\n  void bar() {\n"));
    assert!(out.ends_with("}\n}"));
}

#[test]
fn plugin_block_span_and_append() {
    let src = "plugins {\n  id 'com.android.application'\n}";

    let block = find_named_code_block(src, "plugins").unwrap().unwrap();
    assert_eq!(block.start, src.find('{').unwrap());
    assert_eq!(block.end, src.len() - 1);

    let out = append_contents_inside_named_block(src, "plugins", "  id 'org.example.plugin'\n")
        .unwrap();
    assert_eq!(
        out,
        "plugins {\n  id 'com.android.application'\n  id 'org.example.plugin'\n}"
    );
}

#[test]
fn java_import_follows_package_line() {
    let out = add_imports(
        "package com.example;\n\nclass Foo {}",
        &["java.util.List"],
        ImportStyle::Semicolon,
    );
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[0], "package com.example;");
    assert_eq!(lines[1], "import java.util.List;");
}

#[test]
fn add_imports_is_identity_when_present() {
    let src = load_fixture("MainApplication.java");
    let out = add_imports(
        &src,
        &["java.util.List", "android.app.Application"],
        ImportStyle::Semicolon,
    );
    assert_eq!(out, src);
}

#[test]
fn relocated_block_contains_appended_text() {
    let src = load_fixture("MainApplication.java");
    let decl = r"public void onCreate\(\)";
    let out = append_contents_inside_declaration_block(&src, decl, "  extra();\n  ").unwrap();

    let block = find_declaration_code_block(&out, decl).unwrap();
    assert!(block.code.contains("extra();"));
    assert_eq!(&out[block.start..=block.end], block.code);
}

#[test]
fn java_fixture_anonymous_host() {
    let src = load_fixture("MainApplication.java");
    let block = find_new_instance_code_block(&src, "ReactNativeHost", Language::Java)
        .unwrap()
        .unwrap();

    assert!(block.code.starts_with("new ReactNativeHost(this) {"));
    assert!(block.code.contains("getUseDeveloperSupport"));
    assert!(block.code.contains("return packages;"));
    // ends at the brace right before `;`
    assert_eq!(&src[block.end + 1..block.end + 2], ";");
}

#[test]
fn java_fixture_class_body_survives_comment_and_string_braces() {
    let src = load_fixture("MainApplication.java");
    let block = find_declaration_code_block(&src, "public class MainApplication").unwrap();
    assert_eq!(block.end, src.trim_end().len() - 1);
}

#[test]
fn kotlin_fixture_object_expression() {
    let src = load_fixture("MainApplication.kt");
    let block = find_new_instance_code_block(&src, "DefaultReactNativeHost", Language::Kotlin)
        .unwrap()
        .unwrap();

    assert!(block.code.starts_with("object : DefaultReactNativeHost(this) {"));
    assert!(block.code.contains("getJSMainModuleName"));
    assert!(block.code.ends_with("= \"index\"\n      }"));
}

#[test]
fn kotlin_fixture_method_with_template_string() {
    let src = load_fixture("MainApplication.kt");
    let out = append_contents_inside_declaration_block(
        &src,
        r"override fun onCreate\(\)",
        "  MyPackage.init()\n  ",
    )
    .unwrap();
    assert!(out.contains("val label = \"${'$'}{name} }\"\n    MyPackage.init()\n  }\n}"));
}

#[test]
fn gradle_settings_first_match_wins() {
    let src = load_fixture("settings.gradle");

    let nested = find_named_code_block(&src, "plugins").unwrap().unwrap();
    assert!(nested.code.contains("com.facebook.react.settings' // }"));
    assert!(!nested.code.contains("\"com.facebook.react.settings\""));

    let management = find_named_code_block(&src, "pluginManagement").unwrap().unwrap();
    assert!(management.code.contains("gradlePluginPortal()"));
    assert!(management.code.ends_with("  }\n}"));
    assert!(management.end < src.find("rootProject").unwrap());
}

#[test]
fn missing_blocks() {
    let src = load_fixture("settings.gradle");
    assert!(find_named_code_block(&src, "android").unwrap().is_none());

    let err = append_contents_inside_named_block(&src, "android", "x").unwrap_err();
    assert!(matches!(err, LocateError::BlockNotFound { .. }));

    assert!(
        find_new_instance_code_block(&src, "Foo", Language::Groovy)
            .unwrap()
            .is_none()
    );
}

#[test]
fn stale_offsets_are_not_reused() {
    let src = "plugins {\n}\nandroid {\n}\n";
    let first = find_named_code_block(src, "android").unwrap().unwrap();
    let patched = append_contents_inside_named_block(src, "plugins", "  id 'a'\n").unwrap();
    let second = find_named_code_block(&patched, "android").unwrap().unwrap();

    assert_eq!(second.start, first.start + "  id 'a'\n".len());
    assert_eq!(first.code, second.code);
}
