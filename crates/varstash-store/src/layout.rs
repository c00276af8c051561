use std::path::{Path, PathBuf};

/// Default blob file extension.
pub const DEFAULT_BLOB_EXTENSION: &str = "bin";

/// Default metadata record file name.
pub const DEFAULT_METADATA_FILE: &str = "_varstash_meta.json";

/// Default soft-delete directory, relative to the store root.
pub const DEFAULT_TRASH_DIR: &str = ".trash";

/// Where a store keeps its files.
///
/// ```text
/// <root>/
///     _varstash_meta.json
///     <name>.bin
///     .trash/<unix-ms>-<name>.bin
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
    blob_extension: String,
    metadata_file: String,
    trash_dir: String,
}

impl StoreLayout {
    /// Layout with default file names under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            blob_extension: DEFAULT_BLOB_EXTENSION.to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            trash_dir: DEFAULT_TRASH_DIR.to_string(),
        }
    }

    pub fn with_blob_extension(mut self, ext: impl Into<String>) -> Self {
        self.blob_extension = ext.into();
        self
    }

    pub fn with_metadata_file(mut self, file: impl Into<String>) -> Self {
        self.metadata_file = file.into();
        self
    }

    pub fn with_trash_dir(mut self, dir: impl Into<String>) -> Self {
        self.trash_dir = dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn blob_extension(&self) -> &str {
        &self.blob_extension
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(&self.metadata_file)
    }

    pub fn trash_path(&self) -> PathBuf {
        self.root.join(&self.trash_dir)
    }

    /// `<name>.<ext>`
    pub fn blob_file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.blob_extension)
    }

    pub fn blob_path(&self, name: &str) -> PathBuf {
        self.root.join(self.blob_file_name(name))
    }

    /// Entry name for a file name in the store root, if it is a blob.
    pub fn blob_name_of(&self, file_name: &str) -> Option<String> {
        if file_name == self.metadata_file {
            return None;
        }
        file_name
            .strip_suffix(&self.blob_extension)
            .and_then(|stem| stem.strip_suffix('.'))
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    }

    /// `true` if a blob for `name` would occupy a path reserved for the
    /// metadata record or the trash directory.
    pub fn is_reserved_blob(&self, name: &str) -> bool {
        let file = self.blob_file_name(name);
        file == self.metadata_file || file == self.trash_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let layout = StoreLayout::new("/data/cache");
        assert_eq!(layout.metadata_path(), PathBuf::from("/data/cache/_varstash_meta.json"));
        assert_eq!(layout.blob_path("a"), PathBuf::from("/data/cache/a.bin"));
        assert_eq!(layout.trash_path(), PathBuf::from("/data/cache/.trash"));
    }

    #[test]
    fn blob_name_of_strips_extension() {
        let layout = StoreLayout::new("s");
        assert_eq!(layout.blob_name_of("vel.bin"), Some("vel".into()));
        assert_eq!(layout.blob_name_of("a.b.bin"), Some("a.b".into()));
        assert_eq!(layout.blob_name_of(".bin"), None);
        assert_eq!(layout.blob_name_of("notes.txt"), None);
        assert_eq!(layout.blob_name_of("_varstash_meta.json"), None);
    }

    #[test]
    fn reserved_names_detected() {
        let layout = StoreLayout::new("s").with_blob_extension("json");
        assert!(layout.is_reserved_blob("_varstash_meta"));
        assert!(!layout.is_reserved_blob("other"));
    }
}
