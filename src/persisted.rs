use serde::{Deserialize, Serialize};

pub(crate) const MAP_TOKEN_KEY: &str = "city_explorer.map_token.v1";
pub(crate) const MAP_TOKEN_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapTokenRecord {
    pub(crate) version: u32,
    pub(crate) access_token: String,
}

impl MapTokenRecord {
    pub(crate) fn new(access_token: &str) -> Self {
        Self {
            version: MAP_TOKEN_VERSION,
            access_token: access_token.trim().to_string(),
        }
    }
}

pub(crate) fn encode_token_record(access_token: &str) -> Option<String> {
    let record = MapTokenRecord::new(access_token);
    if record.access_token.is_empty() {
        return None;
    }
    serde_json::to_string(&record).ok()
}

/// Wrong versions and blank tokens read as absent.
pub(crate) fn decode_token_record(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let record: MapTokenRecord = serde_json::from_str(raw).ok()?;
    if record.version != MAP_TOKEN_VERSION {
        return None;
    }
    let token = record.access_token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

pub(crate) fn load_map_token() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;
        let raw = storage.get_item(MAP_TOKEN_KEY).ok()??;
        let token = decode_token_record(&raw);
        if token.is_none() {
            gloo::console::warn!("map token: stored record ignored");
        }
        token
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

pub(crate) fn save_map_token(access_token: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(raw) = encode_token_record(access_token) else {
            clear_map_token();
            return;
        };
        let Some(storage) = web_sys::window().and_then(|window| window.local_storage().ok().flatten())
        else {
            gloo::console::warn!("map token: storage unavailable");
            return;
        };
        if storage.set_item(MAP_TOKEN_KEY, &raw).is_err() {
            gloo::console::warn!("map token: storage set failed");
        } else {
            gloo::console::log!("map token: saved");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = access_token;
    }
}

pub(crate) fn clear_map_token() {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(storage) = web_sys::window().and_then(|window| window.local_storage().ok().flatten())
        else {
            return;
        };
        let _ = storage.remove_item(MAP_TOKEN_KEY);
        gloo::console::log!("map token: cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn record_trims_and_versions() {
        let raw = encode_token_record("  pk.test  ").expect("token encodes");
        assert_eq!(decode_token_record(&raw).as_deref(), Some("pk.test"));
        assert!(encode_token_record("   ").is_none());
    }

    #[wasm_bindgen_test]
    fn stale_versions_are_ignored() {
        let raw = r#"{"version":0,"access_token":"pk.old"}"#;
        assert_eq!(decode_token_record(raw), None);
        assert_eq!(decode_token_record("not json"), None);
        assert_eq!(decode_token_record(""), None);
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn token_survives_storage() {
        save_map_token("pk.browser");
        assert_eq!(load_map_token().as_deref(), Some("pk.browser"));
        clear_map_token();
        assert_eq!(load_map_token(), None);
    }
}
