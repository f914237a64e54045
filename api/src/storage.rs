//! Durable client-side key/value storage and the preferences kept in it.

use std::{cell::RefCell, collections::HashMap, fmt, str::FromStr};

pub mod keys {
    pub const WALLET_CONNECTED: &str = "walletConnected";
    pub const WALLET_ADDRESS: &str = "walletAddress";
    pub const THEME: &str = "theme";
    pub const MUSIC_ENABLED: &str = "musicEnabled";
    pub const SOUND_ENABLED: &str = "soundEnabled";
    pub const ANIMATION_INTENSITY: &str = "animationIntensity";
}

/// String-keyed, string-valued synchronous storage (browser `localStorage`).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationIntensity {
    Off,
    Low,
    #[default]
    Medium,
    High,
}

macro_rules! string_enum {
    ($ty:ty { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self { $(Self::$variant => $s),+ })
            }
        }

        impl FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

string_enum!(Theme { Dark => "dark", Light => "light" });
string_enum!(AnimationIntensity { Off => "off", Low => "low", Medium => "medium", High => "high" });

/// UI preferences. Missing or unreadable values fall back to defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub music_enabled: bool,
    pub sound_enabled: bool,
    pub animation_intensity: AnimationIntensity,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            music_enabled: false,
            sound_enabled: true,
            animation_intensity: AnimationIntensity::Medium,
        }
    }
}

impl Preferences {
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            theme: read(store, keys::THEME).unwrap_or(defaults.theme),
            music_enabled: read(store, keys::MUSIC_ENABLED).unwrap_or(defaults.music_enabled),
            sound_enabled: read(store, keys::SOUND_ENABLED).unwrap_or(defaults.sound_enabled),
            animation_intensity: read(store, keys::ANIMATION_INTENSITY)
                .unwrap_or(defaults.animation_intensity),
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) {
        store.set(keys::THEME, &self.theme.to_string());
        store.set(keys::MUSIC_ENABLED, &self.music_enabled.to_string());
        store.set(keys::SOUND_ENABLED, &self.sound_enabled.to_string());
        store.set(keys::ANIMATION_INTENSITY, &self.animation_intensity.to_string());
    }
}

fn read<T: FromStr>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    store.get(key).and_then(|v| v.parse().ok())
}
