use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use thiserror::Error;

use crate::profile::{builtin_defs, Profile, ProfileDef, GENERIC_PROFILE_ID};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid {field} pattern in profile '{profile}': {source}")]
    InvalidPattern {
        profile: String,
        field: &'static str,
        source: regex::Error,
    },
    #[error("{field} pattern in profile '{profile}' needs {expected} capture group(s), found {found}")]
    MissingCaptureGroup {
        profile: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Profile id '{0}' is reserved for the fallback profile")]
    ReservedId(String),
    #[error("Failed to parse profile TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shape of a profiles file:
///
/// ```toml
/// [[profiles]]
/// id = "axis"
/// label = "Axis Bank"
/// signature = '\bAxis\s+Bank\b'
/// ```
#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: Vec<ProfileDef>,
}

/// Read-only set of bank profiles, kept in identification order, plus the
/// generic fallback. Built once at startup and shared.
#[derive(Debug)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
    fallback: Profile,
}

impl ProfileRegistry {
    /// Compile `defs` into a registry. A later definition with the same id
    /// replaces an earlier one.
    pub fn new(defs: Vec<ProfileDef>) -> Result<Self, RegistryError> {
        let mut merged: Vec<ProfileDef> = Vec::with_capacity(defs.len());
        for def in defs {
            match merged.iter_mut().find(|d| d.id == def.id) {
                Some(slot) => *slot = def,
                None => merged.push(def),
            }
        }

        let mut profiles = merged
            .iter()
            .map(Profile::compile)
            .collect::<Result<Vec<_>, _>>()?;

        // Higher priority first, then the longer (more specific) label, so that
        // "Bank of India" is only tried after "State Bank of India".
        profiles.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| b.label().chars().count().cmp(&a.label().chars().count()))
                .then_with(|| a.id().cmp(b.id()))
        });

        Ok(Self {
            profiles,
            fallback: Profile::generic()?,
        })
    }

    /// The process-wide registry of built-in profiles.
    pub fn builtin() -> Arc<ProfileRegistry> {
        static REGISTRY: OnceLock<Arc<ProfileRegistry>> = OnceLock::new();
        REGISTRY
            .get_or_init(|| {
                Arc::new(ProfileRegistry::new(builtin_defs()).expect("invalid built-in profile"))
            })
            .clone()
    }

    /// Built-in profiles extended (or overridden by id) with those in `toml_content`.
    pub fn from_toml(toml_content: &str) -> Result<Self, RegistryError> {
        let file: ProfileFile = toml::from_str(toml_content)?;
        let mut defs = builtin_defs();
        defs.extend(file.profiles);
        Self::new(defs)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Look up a profile by id. `generic` resolves to the fallback.
    pub fn lookup(&self, id: &str) -> Option<&Profile> {
        if id == GENERIC_PROFILE_ID {
            return Some(&self.fallback);
        }
        self.profiles.iter().find(|p| p.id() == id)
    }

    /// Bank profiles in the order identification tries them. The fallback is
    /// not included.
    pub fn all(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|p| (p.id(), p))
    }

    pub fn fallback(&self) -> &Profile {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
