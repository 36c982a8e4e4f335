/// Splicing and idempotent-regeneration tests over real target files
use std::fs;
use tempfile::TempDir;

use holster::generator::{self, ExistingMembers, GenerationRequest, DEFAULT_PREFIX};
use holster::inject::Target;
use holster::layout;

const MENU_LAYOUT: &str = r#"<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android">
    <TextView android:id="@+id/menu_title" />
    <Button android:id="@+id/go_btn" />
</LinearLayout>
"#;

const ACTIVITY: &str = r#"package com.example.app;

public class MenuActivity {
    private int attempts;

    public void reset() {
        attempts = 0;
    }
}
"#;

fn menu_request() -> GenerationRequest {
    GenerationRequest {
        base_name: "Menu".to_string(),
        layout_name: "menu.xml".to_string(),
        prefix: DEFAULT_PREFIX.to_string(),
        elements: layout::scan(MENU_LAYOUT).unwrap(),
        auto_implements: true,
        strict_hints: false,
        existing: ExistingMembers::default(),
    }
}

/// One full regeneration pass against a target source
fn regenerate(target_source: &str, request: &mut GenerationRequest) -> String {
    let target = Target::parse(target_source).unwrap();
    let holder_name = request.holder_name();
    let model_name = request.model_name();

    let (existing, preserved) = target.existing_methods(&holder_name);
    request.existing = existing;

    let source = generator::generate(request).unwrap();
    let holder = generator::assemble_holder(&source, &preserved);
    target
        .splice(&holder_name, &model_name, &holder, &source.model.source)
        .unwrap()
}

#[test]
fn test_splice_into_fresh_target() {
    let out = regenerate(ACTIVITY, &mut menu_request());

    assert!(out.contains("private class MenuViewHolder"));
    assert!(out.contains("public class MenuViewModel"));
    assert!(out.contains("this.goBtn = (android.widget.Button) view.findViewById(R.id.go_btn);"));
    // user code is untouched
    assert!(out.contains("private int attempts;"));
    assert!(out.contains("public void reset() {"));
    // still one well-formed file
    assert!(out.ends_with("}\n"));
}

#[test]
fn test_regeneration_is_byte_stable() {
    let once = regenerate(ACTIVITY, &mut menu_request());
    let twice = regenerate(&once, &mut menu_request());
    let thrice = regenerate(&twice, &mut menu_request());

    assert_eq!(once, twice);
    assert_eq!(twice, thrice);
}

#[test]
fn test_filled_in_on_click_survives_regeneration() {
    let once = regenerate(ACTIVITY, &mut menu_request());

    // the user fills in the generated dispatch stub
    let edited = once.replace(
        "                case R.id.go_btn:\n\n                    break;",
        "                case R.id.go_btn:\n                    go();\n                    break;",
    );
    assert_ne!(once, edited, "fixture edit did not apply");

    let again = regenerate(&edited, &mut menu_request());

    assert_eq!(again.matches("public void onClick").count(), 1);
    assert!(again.contains("go();"));
}

#[test]
fn test_new_elements_appear_while_filled_methods_survive() {
    let once = regenerate(ACTIVITY, &mut menu_request());
    let edited = once.replace(
        "                case R.id.go_btn:\n\n                    break;",
        "                case R.id.go_btn:\n                    go();\n                    break;",
    );

    // the layout grows a second view
    let grown_layout = MENU_LAYOUT.replace(
        "</LinearLayout>",
        "    <TextView android:id=\"@+id/subtitle\" />\n</LinearLayout>",
    );
    let mut request = menu_request();
    request.elements = layout::scan(&grown_layout).unwrap();

    let again = regenerate(&edited, &mut request);

    // the holder picked up the new field, the user's dispatch logic stayed
    assert!(again.contains("public android.widget.TextView subtitle;"));
    assert!(again.contains("go();"));
}

#[test]
fn test_regeneration_drops_removed_elements() {
    let once = regenerate(ACTIVITY, &mut menu_request());
    assert!(once.contains("menuTitle"));

    let mut request = menu_request();
    request.elements.retain(|e| e.id != "menu_title");

    let again = regenerate(&once, &mut request);
    assert!(!again.contains("menuTitle"));
    assert!(again.contains("goBtn"));
}

#[test]
fn test_generate_command_writes_target_file() {
    let dir = TempDir::new().unwrap();
    let layout_path = dir.path().join("menu.xml");
    let target_path = dir.path().join("MenuActivity.java");
    fs::write(&layout_path, MENU_LAYOUT).unwrap();
    fs::write(&target_path, ACTIVITY).unwrap();

    holster::commands::generate::execute(
        layout_path.to_str().unwrap(),
        None,
        Some(target_path.to_str().unwrap()),
        Some("Menu"),
    )
    .unwrap();

    let out = fs::read_to_string(&target_path).unwrap();
    assert!(out.contains("private class MenuViewHolder"));
    assert!(out.contains("public class MenuViewModel"));
    // no session: listener wiring defaults off
    assert!(!out.contains("setOnClickListener"));
}

#[test]
fn test_target_without_class_is_rejected() {
    let err = Target::parse("// not a java file\n").unwrap_err();
    assert!(err.contains("no class declaration"));
}
