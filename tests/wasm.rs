// Browser-side tests for the runtime config chain.
// Run with `wasm-pack test --headless --firefox` (or --chrome).

#![cfg(target_arch = "wasm32")]

use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn set_global(name: &str, value: &JsValue) {
    let win = web_sys::window().unwrap();
    Reflect::set(win.as_ref(), &JsValue::from_str(name), value).unwrap();
}

fn clear_globals() {
    for name in ["SUPABASE_CONFIG", "GAME_CONFIG", "ENV"] {
        set_global(name, &JsValue::UNDEFINED);
    }
}

fn obj(entries: &[(&str, &str)]) -> JsValue {
    let o = Object::new();
    for (k, v) in entries {
        Reflect::set(&o, &JsValue::from_str(k), &JsValue::from_str(v)).unwrap();
    }
    o.into()
}

#[wasm_bindgen_test]
fn unconfigured_page_resolves_to_empty() {
    clear_globals();
    let cfg = memory_match::config::resolve();
    assert!(!cfg.is_configured());
}

#[wasm_bindgen_test]
fn the_first_complete_source_wins() {
    clear_globals();
    set_global(
        "SUPABASE_CONFIG",
        &obj(&[("url", "https://a.supabase.co"), ("anonKey", "key-a")]),
    );
    set_global(
        "ENV",
        &obj(&[
            ("SUPABASE_URL", "https://b.supabase.co"),
            ("SUPABASE_ANON_KEY", "key-b"),
        ]),
    );
    let cfg = memory_match::config::resolve();
    assert_eq!(cfg.url, "https://a.supabase.co");
    assert_eq!(cfg.key, "key-a");
    clear_globals();
}

#[wasm_bindgen_test]
fn incomplete_sources_fall_through() {
    clear_globals();
    set_global("SUPABASE_CONFIG", &obj(&[("url", "https://half.supabase.co")]));
    set_global(
        "GAME_CONFIG",
        &obj(&[
            ("supabaseUrl", "https://g.supabase.co"),
            ("supabaseAnonKey", "key-g"),
        ]),
    );
    let cfg = memory_match::config::resolve();
    assert_eq!(cfg.url, "https://g.supabase.co");
    assert_eq!(cfg.key, "key-g");
    clear_globals();
}
