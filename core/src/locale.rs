//! Locale selection and message bundles.
//!
//! # Design
//! Bundles are JSON files named after the lowercased locale
//! (`en.json`, `es.json`) in one directory. The default locale is loaded up
//! front; others are read the first time they are asked for and kept.
//! Lookups use dotted keys (`profile.followers`) and fall back to the
//! default locale when the active bundle lacks a key.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::error::LocaleError;
use crate::session::SessionProvider;

pub const DEFAULT_LOCALE: &str = "EN";
pub const SUPPORTED_LOCALES: [&str; 2] = ["EN", "ES"];

/// Canonical (uppercase) form of `locale` if it is supported.
pub fn normalize(locale: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|supported| supported.eq_ignore_ascii_case(locale.trim()))
}

/// The session user's language, or the default when signed out, unset,
/// or unsupported.
pub fn resolve_locale(session: &impl SessionProvider) -> &'static str {
    session
        .current()
        .and_then(|user| user.language)
        .and_then(|language| normalize(&language))
        .unwrap_or(DEFAULT_LOCALE)
}

pub struct LocaleCatalog {
    dir: PathBuf,
    bundles: HashMap<&'static str, Value>,
    active: &'static str,
}

impl LocaleCatalog {
    /// Open the bundle directory and load the default locale.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LocaleError> {
        let mut catalog = Self {
            dir: dir.into(),
            bundles: HashMap::new(),
            active: DEFAULT_LOCALE,
        };
        catalog.ensure_loaded(DEFAULT_LOCALE)?;
        Ok(catalog)
    }

    pub fn active(&self) -> &'static str {
        self.active
    }

    /// Value for an HTML `lang` attribute.
    pub fn html_lang(&self) -> String {
        self.active.to_lowercase()
    }

    pub fn is_loaded(&self, locale: &str) -> bool {
        normalize(locale).is_some_and(|l| self.bundles.contains_key(l))
    }

    pub fn available_locales(&self) -> Vec<&'static str> {
        let mut locales: Vec<_> = self.bundles.keys().copied().collect();
        locales.sort_unstable();
        locales
    }

    /// Read the bundle for `locale` unless it is already loaded.
    pub fn ensure_loaded(&mut self, locale: &str) -> Result<&'static str, LocaleError> {
        let locale = normalize(locale).ok_or_else(|| LocaleError::Unsupported(locale.to_string()))?;
        if self.bundles.contains_key(locale) {
            return Ok(locale);
        }

        let path = self.dir.join(format!("{}.json", locale.to_lowercase()));
        let raw = fs::read_to_string(&path).map_err(|source| LocaleError::Io {
            locale: locale.to_string(),
            source,
        })?;
        let messages = serde_json::from_str(&raw).map_err(|source| LocaleError::Malformed {
            locale: locale.to_string(),
            source,
        })?;
        debug!(locale, path = %path.display(), "loaded locale bundle");
        self.bundles.insert(locale, messages);
        Ok(locale)
    }

    /// Load `locale` if needed and make it the active one.
    pub fn activate(&mut self, locale: &str) -> Result<(), LocaleError> {
        self.active = self.ensure_loaded(locale)?;
        Ok(())
    }

    /// Message for a dotted `key` in the active locale, then the default.
    pub fn translate(&self, key: &str) -> Option<&str> {
        lookup(self.bundles.get(self.active), key)
            .or_else(|| lookup(self.bundles.get(DEFAULT_LOCALE), key))
    }

    /// Like `translate`, but echoes the key when no bundle has it.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translate(key).unwrap_or(key)
    }
}

fn lookup<'a>(bundle: Option<&'a Value>, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(bundle?, |node, part| node.get(part))?
        .as_str()
}
