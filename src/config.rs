//! Runtime configuration for the score service.
//!
//! Credentials are read from globals the hosting page may define, checked in
//! order: `SUPABASE_CONFIG { url, anonKey }`, then
//! `GAME_CONFIG { supabaseUrl, supabaseAnonKey }`, then
//! `ENV { SUPABASE_URL, SUPABASE_ANON_KEY }`. The first object that yields
//! both values wins. Resolution happens per request, so a page may inject
//! the globals after the game has started.

use js_sys::Reflect;
use wasm_bindgen::JsValue;

/// Endpoint and key for the remote score table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub url: String,
    pub key: String,
}

impl ApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.key.is_empty()
    }
}

const SOURCES: [(&str, &str, &str); 3] = [
    ("SUPABASE_CONFIG", "url", "anonKey"),
    ("GAME_CONFIG", "supabaseUrl", "supabaseAnonKey"),
    ("ENV", "SUPABASE_URL", "SUPABASE_ANON_KEY"),
];

/// Walk the global config sources and return the first complete pair.
/// Returns a default (unconfigured) value when nothing usable is defined.
pub fn resolve() -> ApiConfig {
    let Some(window) = web_sys::window() else {
        return ApiConfig::default();
    };
    let global = JsValue::from(window);
    for (holder, url_key, anon_key) in SOURCES {
        let Some(obj) = obj_prop(&global, holder) else {
            continue;
        };
        if let (Some(url), Some(key)) = (str_prop(&obj, url_key), str_prop(&obj, anon_key)) {
            return ApiConfig { url, key };
        }
    }
    ApiConfig::default()
}

fn obj_prop(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn str_prop(target: &JsValue, name: &str) -> Option<String> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_string())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_do_not_count_as_configured() {
        assert!(!ApiConfig::default().is_configured());
        let half = ApiConfig {
            url: "https://x.supabase.co".to_string(),
            key: String::new(),
        };
        assert!(!half.is_configured());
        let full = ApiConfig {
            url: "https://x.supabase.co".to_string(),
            key: "anon".to_string(),
        };
        assert!(full.is_configured());
    }
}
