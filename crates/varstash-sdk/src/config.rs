use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use varstash_store::layout::{DEFAULT_BLOB_EXTENSION, DEFAULT_METADATA_FILE, DEFAULT_TRASH_DIR};
use varstash_store::StoreLayout;
use varstash_types::RESERVED_PATH_CHARS;

use crate::error::{SdkError, SdkResult};

/// Default store directory name under `base_dir`.
pub const DEFAULT_STORE_NAME: &str = "varstash";

/// Where a stash lives and what its files are called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StashConfig {
    /// Directory the store directory is created in.
    pub base_dir: PathBuf,
    /// Store directory name. A single path component.
    pub store_name: String,
    pub blob_extension: String,
    pub metadata_file: String,
    pub trash_dir: String,
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            store_name: DEFAULT_STORE_NAME.to_string(),
            blob_extension: DEFAULT_BLOB_EXTENSION.to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            trash_dir: DEFAULT_TRASH_DIR.to_string(),
        }
    }
}

fn check_component(what: &str, value: &str) -> SdkResult<()> {
    let invalid = |reason: String| SdkError::InvalidPath {
        path: value.to_string(),
        reason: format!("{what} {reason}"),
    };
    if value.is_empty() {
        return Err(invalid("must not be empty".into()));
    }
    if let Some(ch) = value.chars().find(|ch| RESERVED_PATH_CHARS.contains(ch)) {
        return Err(invalid(format!("contains reserved character {ch:?}")));
    }
    if value == "." || value == ".." {
        return Err(invalid("must not be '.' or '..'".into()));
    }
    Ok(())
}

impl StashConfig {
    /// Defaults with a different store directory name.
    pub fn named(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            ..Self::default()
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Check that every configured name is a single, portable path component.
    pub fn validate(&self) -> SdkResult<()> {
        check_component("store name", &self.store_name)?;
        check_component("metadata file", &self.metadata_file)?;
        check_component("trash directory", &self.trash_dir)?;
        check_component("blob extension", &self.blob_extension)?;
        if self.blob_extension.contains('.') {
            return Err(SdkError::InvalidPath {
                path: self.blob_extension.clone(),
                reason: "blob extension must not contain '.'".into(),
            });
        }
        Ok(())
    }

    /// `<base_dir>/<store_name>`
    pub fn store_root(&self) -> PathBuf {
        self.base_dir.join(&self.store_name)
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(self.store_root())
            .with_blob_extension(&self.blob_extension)
            .with_metadata_file(&self.metadata_file)
            .with_trash_dir(&self.trash_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StashConfig::default();
        assert_eq!(c.store_root(), PathBuf::from("./varstash"));
        assert_eq!(c.blob_extension, "bin");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn reserved_characters_rejected() {
        for bad in ["a/b", "a\\b", "a*b", "a:b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            let err = StashConfig::named(bad).validate().unwrap_err();
            assert!(matches!(err, SdkError::InvalidPath { .. }), "{bad}");
        }
    }

    #[test]
    fn empty_and_dot_names_rejected() {
        assert!(StashConfig::named("").validate().is_err());
        assert!(StashConfig::named("..").validate().is_err());
    }

    #[test]
    fn ordinary_names_accepted() {
        assert!(StashConfig::named("my cache-2").validate().is_ok());
    }

    #[test]
    fn extension_with_dot_rejected() {
        let c = StashConfig {
            blob_extension: "tar.gz".into(),
            ..StashConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: StashConfig = toml::from_str("store_name = \"runs\"\n").unwrap();
        assert_eq!(c.store_name, "runs");
        assert_eq!(c.metadata_file, DEFAULT_METADATA_FILE);
    }

    #[test]
    fn layout_follows_config() {
        let c = StashConfig::named("s").with_base_dir("/tmp/base");
        let layout = c.layout();
        assert_eq!(layout.blob_path("v"), PathBuf::from("/tmp/base/s/v.bin"));
    }
}
