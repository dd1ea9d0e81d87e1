use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::session::result::PracticeResult;
use crate::store::library::{LibraryStore, ResultSink};
use crate::store::schema::{LibraryData, ResultHistoryData, SourceText};

const LIBRARY_FILE: &str = "library.json";
const RESULTS_FILE: &str = "results.json";

/// Library and result history as JSON files in one directory.
pub struct JsonStore {
    base_dir: PathBuf,
    keep_results: usize,
}

impl JsonStore {
    pub fn new(keep_results: usize) -> Result<Self> {
        Self::with_base_dir(Self::default_dir(), keep_results)
    }

    pub fn with_base_dir(base_dir: PathBuf, keep_results: usize) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            keep_results,
        })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typen")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "unreadable store file, starting empty");
                T::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read store file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), bytes = json.len(), "store file written");
        Ok(())
    }

    pub fn load_results(&self) -> Vec<PracticeResult> {
        self.load::<ResultHistoryData>(RESULTS_FILE).results
    }

    pub fn save_results(&self, results: &[PracticeResult]) -> Result<()> {
        self.save(
            RESULTS_FILE,
            &ResultHistoryData {
                results: results.to_vec(),
                ..ResultHistoryData::default()
            },
        )
    }
}

impl LibraryStore for JsonStore {
    fn load_library(&self) -> Vec<SourceText> {
        self.load::<LibraryData>(LIBRARY_FILE).texts
    }

    fn save_library(&self, texts: &[SourceText]) -> Result<()> {
        self.save(
            LIBRARY_FILE,
            &LibraryData {
                texts: texts.to_vec(),
                ..LibraryData::default()
            },
        )
    }
}

impl ResultSink for JsonStore {
    fn record(&self, result: &PracticeResult) -> Result<()> {
        let mut results = self.load_results();
        results.push(result.clone());
        if results.len() > self.keep_results {
            let excess = results.len() - self.keep_results;
            results.drain(..excess);
        }
        self.save_results(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::library::Library;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_test_store(keep: usize) -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf(), keep).unwrap();
        (dir, store)
    }

    fn result(wpm: u32) -> PracticeResult {
        PracticeResult {
            id: format!("r{wpm}"),
            text_id: "t".to_string(),
            wpm,
            accuracy: 90,
            duration: 30,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let (_dir, store) = make_test_store(10);
        assert!(store.load_library().is_empty());
        assert!(store.load_results().is_empty());
    }

    #[test]
    fn test_library_round_trip() {
        let (_dir, store) = make_test_store(10);
        let mut lib = Library::default();
        lib.append(SourceText::new("Essay", "first paragraph\nsecond paragraph"));
        lib.save(&store).unwrap();

        let loaded = Library::load(&store);
        assert_eq!(loaded.len(), 1);
        let text = loaded.iter().next().unwrap();
        assert_eq!(text.title, "Essay");
        assert_eq!(text.content, "first paragraph\nsecond paragraph");
        assert!(!store.file_path("library.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let (_dir, store) = make_test_store(10);
        fs::write(store.file_path(LIBRARY_FILE), "{ not json").unwrap();
        assert!(store.load_library().is_empty());
    }

    #[test]
    fn test_record_caps_history() {
        let (_dir, store) = make_test_store(2);
        store.record(&result(10)).unwrap();
        store.record(&result(20)).unwrap();
        store.record(&result(30)).unwrap();
        let wpms: Vec<u32> = store.load_results().iter().map(|r| r.wpm).collect();
        assert_eq!(wpms, vec![20, 30]);
    }
}
