//! Persistent, section-delimited configuration store.
//!
//! The on-disk format is TOML tables: one section per managed setting, each
//! holding a single key. Parsing and rendering are pure boundary functions
//! over `BTreeMap<section, BTreeMap<key, value>>`; every mutation is flushed
//! to disk synchronously before returning.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{error::StoreError, settings::Setting};

/// Canonical template embedded in the binary, used when no template file
/// exists beside the tool.
pub const EMBEDDED_TEMPLATE: &str = include_str!("../.env.template");

type Sections = BTreeMap<String, BTreeMap<String, String>>;

fn parse_sections(raw: &str, path: &Path) -> Result<Sections, StoreError> {
    toml::from_str(raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn render_sections(sections: &Sections) -> Result<String, StoreError> {
    Ok(toml::to_string(sections)?)
}

/// Typed view over the configuration file.
///
/// Invariant: after [`ConfigStore::ensure_template_applied`], the live file's
/// section-name set equals the template's. Divergence triggers a destructive
/// reset to the template, discarding prior values.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    template_path: PathBuf,
    template: String,
    sections: Sections,
}

impl ConfigStore {
    /// Open a store over `path`. Template text comes from `template_path`
    /// when that file exists, otherwise from the embedded copy.
    pub fn open(path: &Path, template_path: &Path) -> Result<Self, StoreError> {
        let template = if template_path.exists() {
            fs::read_to_string(template_path).map_err(|source| {
                StoreError::Read {
                    path: template_path.to_path_buf(),
                    source,
                }
            })?
        } else {
            debug!(
                path = %template_path.display(),
                "template file not found; using embedded template"
            );
            EMBEDDED_TEMPLATE.to_string()
        };

        Ok(Self {
            path: path.to_path_buf(),
            template_path: template_path.to_path_buf(),
            template,
            sections: Sections::new(),
        })
    }

    /// Reconcile the live file against the template and load it into memory.
    ///
    /// Missing file: the template is copied verbatim. Existing file whose
    /// section-name set differs from the template's: the file is wholly
    /// replaced by the template and prior values are lost. Matching file:
    /// left byte-identical, so repeated calls are idempotent.
    pub fn ensure_template_applied(&mut self) -> Result<(), StoreError> {
        let template_sections =
            parse_sections(&self.template, &self.template_path)?;

        if !self.path.exists() {
            info!(path = %self.path.display(), "creating configuration file from template");
            let template = self.template.clone();
            self.write_raw(&template)?;
            self.sections = template_sections;
            return Ok(());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| {
            StoreError::Read {
                path: self.path.clone(),
                source,
            }
        })?;
        let live = parse_sections(&raw, &self.path)?;

        // BTreeMap keys iterate sorted, so this compares the sorted name sets.
        if live.keys().ne(template_sections.keys()) {
            warn!(
                path = %self.path.display(),
                "configuration sections do not match the template; replacing the file and discarding prior values"
            );
            let template = self.template.clone();
            self.write_raw(&template)?;
            self.sections = template_sections;
        } else {
            self.sections = live;
        }

        Ok(())
    }

    /// Current value for a setting. Missing and empty both read as unset.
    pub fn get(&self, setting: Setting) -> Option<&str> {
        self.sections
            .get(setting.section())?
            .get(setting.key())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Commit one value: update the section map and flush the whole document
    /// to disk before returning. Other sections' values are preserved.
    pub fn set(&mut self, setting: Setting, value: &str) -> Result<(), StoreError> {
        self.sections
            .entry(setting.section().to_string())
            .or_default()
            .insert(setting.key().to_string(), value.to_string());
        let rendered = render_sections(&self.sections)?;
        self.write_raw(&rendered)?;
        debug!(key = setting.key(), "committed setting");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_raw(&self, contents: &str) -> Result<(), StoreError> {
        fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &Path) -> ConfigStore {
        ConfigStore::open(&dir.join(".env"), &dir.join(".env.template"))
            .expect("open store")
    }

    #[test]
    fn missing_file_is_created_from_template_verbatim() {
        let dir = tempdir().expect("tempdir");
        let mut store = open_store(dir.path());
        store.ensure_template_applied().expect("apply template");

        let written =
            fs::read_to_string(dir.path().join(".env")).expect("read env");
        assert_eq!(written, EMBEDDED_TEMPLATE);
    }

    #[test]
    fn ensure_template_applied_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let mut store = open_store(dir.path());

        store.ensure_template_applied().expect("first apply");
        let first = fs::read_to_string(dir.path().join(".env")).expect("read");
        store.ensure_template_applied().expect("second apply");
        let second = fs::read_to_string(dir.path().join(".env")).expect("read");

        assert_eq!(first, second);
    }

    #[test]
    fn diverging_section_set_resets_to_template() {
        let dir = tempdir().expect("tempdir");
        let env_path = dir.path().join(".env");
        // Live file missing the MailPassword section and carrying a value
        // that must not survive the reset.
        fs::write(
            &env_path,
            "[AccessTokenSecret]\nACCESS_TOKEN_SECRET = \"stale\"\n",
        )
        .expect("seed env");

        let mut store = open_store(dir.path());
        store.ensure_template_applied().expect("apply template");

        let written = fs::read_to_string(&env_path).expect("read env");
        assert_eq!(written, EMBEDDED_TEMPLATE);
        assert_eq!(store.get(Setting::AccessSecret), None);
    }

    #[test]
    fn matching_section_set_preserves_values() {
        let dir = tempdir().expect("tempdir");
        let mut store = open_store(dir.path());
        store.ensure_template_applied().expect("apply template");
        store.set(Setting::AccessSecret, "keepme").expect("set");

        let mut reopened = open_store(dir.path());
        reopened.ensure_template_applied().expect("reapply");
        assert_eq!(reopened.get(Setting::AccessSecret), Some("keepme"));
    }

    #[test]
    fn set_preserves_other_sections() {
        let dir = tempdir().expect("tempdir");
        let mut store = open_store(dir.path());
        store.ensure_template_applied().expect("apply template");

        store.set(Setting::AccessSecret, "first").expect("set access");
        store.set(Setting::MailUsername, "a@b.co").expect("set mail");

        let raw = fs::read_to_string(dir.path().join(".env")).expect("read");
        let parsed: BTreeMap<String, BTreeMap<String, String>> =
            toml::from_str(&raw).expect("parse env");
        assert_eq!(
            parsed["AccessTokenSecret"]["ACCESS_TOKEN_SECRET"],
            "first"
        );
        assert_eq!(parsed["MailUsername"]["MAIL_USERNAME"], "a@b.co");
    }

    #[test]
    fn empty_values_read_as_unset() {
        let dir = tempdir().expect("tempdir");
        let mut store = open_store(dir.path());
        store.ensure_template_applied().expect("apply template");

        assert_eq!(store.get(Setting::VerificationKey), None);
        store
            .set(Setting::VerificationKey, &"a".repeat(40))
            .expect("set key");
        assert!(store.get(Setting::VerificationKey).is_some());
    }
}
