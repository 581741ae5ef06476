//! Saving the edited text into the chosen folder

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};

/// Where the text should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub base_folder: PathBuf,
    /// Created inside `base_folder` when non-empty
    pub subfolder: String,
    pub file_name: String,
    /// Appended (with a dot) when `file_name` does not already end with it
    pub extension: String,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// The written file
    pub path: PathBuf,
    /// Folder containing it
    pub folder: PathBuf,
}

impl SaveRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_folder: config.base_folder.clone(),
            subfolder: config.subfolder.clone(),
            file_name: config.file_name.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Folder the file will be written into; surrounding whitespace is
    /// ignored on both parts
    pub fn target_folder(&self) -> Result<PathBuf> {
        let base = match self.base_folder.to_str() {
            Some(s) => PathBuf::from(s.trim()),
            None => self.base_folder.clone(),
        };
        if base.as_os_str().is_empty() {
            return Err(Error::MissingFolder);
        }
        let subfolder = self.subfolder.trim();
        if subfolder.is_empty() {
            Ok(base)
        } else {
            Ok(base.join(subfolder))
        }
    }

    /// File name with the extension appended when missing
    pub fn normalized_file_name(&self) -> Result<String> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(Error::MissingFileName);
        }
        let ext = self.extension.trim().trim_start_matches('.');
        if ext.is_empty() {
            return Ok(name.to_string());
        }
        let suffix = format!(".{ext}");
        if name.ends_with(&suffix) {
            Ok(name.to_string())
        } else {
            Ok(format!("{name}{suffix}"))
        }
    }

    /// Full path of the file to write
    pub fn target_path(&self) -> Result<PathBuf> {
        Ok(self.target_folder()?.join(self.normalized_file_name()?))
    }
}

/// Create the target folder and write `text` verbatim as UTF-8.
///
/// An existing file is overwritten.
pub fn save(request: &SaveRequest, text: &str) -> Result<SavedFile> {
    let folder = request.target_folder()?;
    let path = folder.join(request.normalized_file_name()?);

    fs::create_dir_all(&folder)?;
    fs::write(&path, text.as_bytes())?;

    info!(path = %path.display(), bytes = text.len(), "saved file");
    Ok(SavedFile { path, folder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn request(base: &Path, subfolder: &str, name: &str) -> SaveRequest {
        SaveRequest {
            base_folder: base.to_path_buf(),
            subfolder: subfolder.to_string(),
            file_name: name.to_string(),
            extension: "py".to_string(),
        }
    }

    #[test]
    fn test_appends_extension() {
        let r = request(Path::new("/x"), "", "main");
        assert_eq!(r.normalized_file_name().unwrap(), "main.py");
        let r = request(Path::new("/x"), "", " tool.py ");
        assert_eq!(r.normalized_file_name().unwrap(), "tool.py");
        let r = request(Path::new("/x"), "", "notes.txt");
        assert_eq!(r.normalized_file_name().unwrap(), "notes.txt.py");
    }

    #[test]
    fn test_missing_inputs() {
        assert!(matches!(
            request(Path::new(""), "", "main").target_path(),
            Err(Error::MissingFolder)
        ));
        assert!(matches!(
            request(Path::new("/x"), "", "   ").target_path(),
            Err(Error::MissingFileName)
        ));
    }

    #[test]
    fn test_blank_base_folder_is_missing() {
        assert!(matches!(
            request(Path::new("   "), "proj", "main").target_path(),
            Err(Error::MissingFolder)
        ));
        assert!(matches!(
            save(&request(Path::new(" \t"), "", "main"), "x = 1"),
            Err(Error::MissingFolder)
        ));
        let r = request(Path::new("  /base "), "", "a");
        assert_eq!(r.target_path().unwrap(), PathBuf::from("/base/a.py"));
    }

    #[test]
    fn test_subfolder_is_optional() {
        let r = request(Path::new("/base"), "  ", "a");
        assert_eq!(r.target_path().unwrap(), PathBuf::from("/base/a.py"));
        let r = request(Path::new("/base"), "proj", "a");
        assert_eq!(r.target_path().unwrap(), PathBuf::from("/base/proj/a.py"));
    }

    #[test]
    fn test_save_creates_folders_and_writes_utf8() {
        let dir = TempDir::new().unwrap();
        let text = "print(\"héllo\")\n# комментарий\n";
        let saved = save(&request(dir.path(), "nested/deeper", "main"), text).unwrap();

        assert_eq!(saved.folder, dir.path().join("nested/deeper"));
        assert_eq!(saved.path, saved.folder.join("main.py"));
        assert_eq!(fs::read_to_string(&saved.path).unwrap(), text);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let r = request(dir.path(), "", "main.py");
        save(&r, "old = 1").unwrap();
        let saved = save(&r, "new = 2").unwrap();
        assert_eq!(fs::read_to_string(saved.path).unwrap(), "new = 2");
    }

    #[test]
    fn test_save_into_file_path_fails_with_io() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let result = save(&request(dir.path(), "blocker", "main"), "x = 1");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
