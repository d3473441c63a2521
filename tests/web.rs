// Browser smoke tests; run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_builds_the_table() {
    karuta::start_game().expect("mount succeeds");
    let doc = web_sys::window().unwrap().document().unwrap();
    let root = doc.get_element_by_id("karuta-root").expect("root element");
    assert_eq!(root.query_selector_all("main button").unwrap().length(), 4);
}

#[wasm_bindgen_test]
fn controls_are_safe_after_restart() {
    karuta::start_table_game().expect("mount succeeds");
    karuta::toggle_playback();
    karuta::new_session();
    let doc = web_sys::window().unwrap().document().unwrap();
    let buttons = doc.query_selector_all("#karuta-root main button").unwrap();
    assert_eq!(buttons.length() as usize, karuta::DEMO_POEMS.len());
}
