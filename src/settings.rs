//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; plain defaults on native.

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| (*k).to_string()).collect()
}

/// Logical key identifiers bound to each action (any of them triggers it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub attack: Vec<String>,
    pub special: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: keys(&["ArrowLeft", "a"]),
            right: keys(&["ArrowRight", "d"]),
            jump: keys(&["ArrowUp", "w", " "]),
            attack: keys(&["z", "j"]),
            special: keys(&["x", "k"]),
        }
    }
}

/// Overlay title / message / button texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub title: String,
    pub message: String,
    pub action: String,
}

impl Screen {
    fn new(title: &str, message: &str, action: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            action: action.to_string(),
        }
    }
}

/// Texts for each overlay screen. `{score}` in the win message is replaced
/// with the session score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub start: Screen,
    pub win: Screen,
    pub lose: Screen,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            start: Screen::new(
                "⚔️ SHINOBI FIGHTER ⚔️",
                "Affronte ton ennemi ninja !",
                "Commencer",
            ),
            win: Screen::new("VICTOIRE ! 🏆", "Tu as gagné ! Score : {score}", "Rejouer"),
            lose: Screen::new("DÉFAITE 💀", "Tu as été vaincu…", "Réessayer"),
        }
    }
}

impl Messages {
    /// Win screen with the score filled in
    pub fn win_screen(&self, score: u32) -> Screen {
        Screen {
            message: self.win.message.replace("{score}", &score.to_string()),
            ..self.win.clone()
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub messages: Messages,
    /// Fixed seed for the opponent's jump rolls; `None` seeds from the clock
    pub ai_seed: Option<u64>,
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shinobi_fighter_settings";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
