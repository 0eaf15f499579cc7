use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::HistoryData;

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    // Write through a temp file and rename so a crash mid-write never leaves
    // a truncated history behind.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_history(&self) -> HistoryData {
        self.load("quiz_history.json")
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save("quiz_history.json", data)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::session::result::QuizResult;
    use crate::store::schema::SCHEMA_VERSION;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn sample_result() -> QuizResult {
        QuizResult {
            total: 5,
            correct: 4,
            incorrect: 1,
            score_percent: 80.0,
            elapsed_secs: 42.0,
            timestamp: Utc::now(),
            mode: "end".to_string(),
            by_difficulty: Vec::new(),
        }
    }

    #[test]
    fn empty_store_loads_default_history() {
        let (_dir, store) = make_test_store();
        let history = store.load_history();
        assert!(history.quizzes.is_empty());
    }

    #[test]
    fn history_round_trip() {
        let (_dir, store) = make_test_store();
        let data = HistoryData {
            schema_version: SCHEMA_VERSION,
            quizzes: vec![sample_result()],
        };
        store.save_history(&data).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
        assert_eq!(loaded.quizzes.len(), 1);
        assert_eq!(loaded.quizzes[0].total, 5);
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path("quiz_history.json"), "{not json").unwrap();
        let history = store.load_history();
        assert!(history.quizzes.is_empty());
    }

    #[test]
    fn save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_history(&HistoryData::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
