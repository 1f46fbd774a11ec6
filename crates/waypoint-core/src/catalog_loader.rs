//! Loads catalogs from JSON files.
//!
//! A catalog file is either a bare array of items or an object with a
//! `subject` and an `items` array. A directory of catalog files yields one
//! catalog per `*.json` file, named after the file stem unless the file
//! declares its own subject.
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Catalog, CatalogItem, Opportunity};

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Tagged {
        #[serde(default)]
        subject: Option<String>,
        items: Vec<CatalogItem>,
    },
    Bare(Vec<CatalogItem>),
}

#[derive(Default)]
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn new() -> Self { Self }

    /// Load one catalog file. `fallback_subject` names the catalog when the
    /// file does not.
    pub fn load_catalog(&self, path: &Path, fallback_subject: &str) -> Result<Catalog> {
        let content = self.read_file_content(path)?;
        let (subject, items) = match serde_json::from_str::<CatalogFile>(&content)? {
            CatalogFile::Tagged { subject, items } => {
                (subject.unwrap_or_else(|| fallback_subject.to_string()), items)
            }
            CatalogFile::Bare(items) => (fallback_subject.to_string(), items),
        };
        debug!(path = %path.display(), subject = %subject, items = items.len(), "loaded catalog");
        Ok(Catalog::new(subject, items))
    }

    /// Load every `*.json` file under `dir` as a subject catalog, in path order.
    pub fn load_subjects_dir(&self, dir: &Path) -> Result<Vec<Catalog>> {
        if !dir.is_dir() {
            return Err(Error::NotFound(format!("subjects directory {}", dir.display())));
        }
        let files = self.list_json_files(dir);
        let mut catalogs = Vec::with_capacity(files.len());
        for file_path in &files {
            let subject = self.extract_subject_id(file_path);
            catalogs.push(self.load_catalog(file_path, &subject)?);
        }
        info!(dir = %dir.display(), catalogs = catalogs.len(), "loaded subject catalogs");
        Ok(catalogs)
    }

    pub fn load_opportunities(&self, path: &Path) -> Result<Vec<Opportunity>> {
        let content = self.read_file_content(path)?;
        let listings: Vec<Opportunity> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), listings = listings.len(), "loaded opportunities");
        Ok(listings)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("catalog file {}", file_path.display())))
            }
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn extract_subject_id(&self, file_path: &Path) -> String {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "misc".to_string())
    }

    fn list_json_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut json_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        json_files.sort();
        json_files
    }
}
