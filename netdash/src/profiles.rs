//! Named server profiles, kept as JSON in
//! `$XDG_CONFIG_HOME/netdash/profiles.json` (fallback: the platform config dir).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileStore {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("netdash"),
        _ => dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("netdash"),
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

impl ProfileStore {
    /// A missing or unreadable file is an empty store.
    pub fn load() -> Self {
        fs::read_to_string(profiles_path())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> io::Result<()> {
        let path = profiles_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self).map_err(io::Error::other)?;
        fs::write(path, data)
    }

    /// Insert or replace `name`. Returns true when the stored entry changed.
    pub fn upsert(&mut self, name: &str, profile: Profile) -> bool {
        if self.profiles.get(name) == Some(&profile) {
            return false;
        }
        self.profiles.insert(name.to_string(), profile);
        true
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// A URL was given on the command line (url, tls_ca).
    Direct(String, Option<String>),
    /// Taken from an existing profile (url, tls_ca).
    Loaded(String, Option<String>),
    /// No URL and no profile name, but profiles exist to choose from.
    PromptSelect(Vec<String>),
    /// A profile name that is not stored yet and no URL to fill it with.
    PromptCreate(String),
    /// Nothing to connect to.
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, store: &ProfileStore) -> Resolved {
        match (self.url, self.profile_name) {
            (Some(url), _) => Resolved::Direct(url, self.tls_ca),
            (None, Some(name)) => match store.profiles.get(&name) {
                Some(p) => Resolved::Loaded(p.url.clone(), p.tls_ca.clone()),
                None => Resolved::PromptCreate(name),
            },
            (None, None) if store.profiles.is_empty() => Resolved::None,
            (None, None) => Resolved::PromptSelect(store.profiles.keys().cloned().collect()),
        }
    }
}
