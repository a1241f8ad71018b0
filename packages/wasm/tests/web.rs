//! Browser smoke test, run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use liveedit_wasm::LiveEditor;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"[{
    "type": "Element",
    "tag": "p",
    "attributes": { "data-edit-key": "intro", "data-page-key": "home" },
    "children": [ { "type": "Text", "content": "Hello" } ]
}]"#;

#[wasm_bindgen_test]
fn cancel_round_trip_in_browser() {
    let mut editor = LiveEditor::new(PAGE, None).unwrap();
    let before = editor.tree().unwrap();

    editor.trigger(0, "doubleClick").unwrap();
    editor.apply("Hi").unwrap();
    editor.dismiss("backdrop").unwrap();

    assert_eq!(editor.tree().unwrap(), before);
}
