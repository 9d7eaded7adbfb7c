//! Persistence of genomes and training statistics as JSON records.
use crate::errors::StoreError;

use legendary::records::{
    best_genome_file_name, evolution_data_file_name, EvolutionData, GenomeData,
};

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A named-record storage backend.
///
/// Implementors only supply raw reads and writes;
/// record encoding is shared.
pub trait RecordStore {
    /// Returns the contents of the record `name`,
    /// or `None` if no such record exists.
    fn read(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Creates or replaces the record `name`.
    fn write(&mut self, name: &str, contents: &str) -> Result<(), StoreError>;

    /// Loads the best genome stored for `generation`
    /// of a structure with `total_weights` weights.
    fn load_genome(
        &self,
        total_weights: usize,
        generation: usize,
    ) -> Result<Option<GenomeData>, StoreError> {
        match self.read(&best_genome_file_name(total_weights, generation))? {
            Some(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            None => Ok(None),
        }
    }

    /// Stores `data` as the best genome of `generation`.
    fn save_genome(&mut self, data: &GenomeData, generation: usize) -> Result<(), StoreError> {
        let name = best_genome_file_name(data.weights.len(), generation);
        self.write(&name, &serde_json::to_string_pretty(data)?)
    }

    /// Stores the summary of the `run`-th training run.
    fn save_evolution_data(&mut self, data: &EvolutionData, run: usize) -> Result<(), StoreError> {
        self.write(
            &evolution_data_file_name(run),
            &serde_json::to_string_pretty(data)?,
        )
    }
}

/// Stores records as JSON files in a directory.
#[derive(Clone, Debug)]
pub struct JsonStore {
    directory: PathBuf,
}

impl JsonStore {
    /// Returns a store rooted at `directory`, which
    /// is created on the first write if missing.
    pub fn new<P: AsRef<Path>>(directory: P) -> JsonStore {
        JsonStore {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl RecordStore for JsonStore {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.directory.join(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, name: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(name);
        fs::write(&path, contents)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Keeps records in memory, for dry runs and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.records.get(name).map(String::as_str)
    }

    /// Iterates over the names of all stored records, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(name).cloned())
    }

    fn write(&mut self, name: &str, contents: &str) -> Result<(), StoreError> {
        self.records.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legendary::records::ImprovementData;
    use tempfile::tempdir;

    #[test]
    fn json_store_genome() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::new(dir.path().join("records"));
        assert!(store.load_genome(3, 1).unwrap().is_none());

        let data = GenomeData::new(vec![0.5, -0.25, 1.0]);
        store.save_genome(&data, 4).unwrap();

        assert!(store
            .directory()
            .join("BestGenomeWeights-3_Generation-4.json")
            .exists());
        assert_eq!(store.load_genome(3, 4).unwrap(), Some(data));
        assert!(store.load_genome(3, 5).unwrap().is_none());
    }

    #[test]
    fn json_store_malformed_record() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::new(dir.path());
        store
            .write("BestGenomeWeights-3_Generation-1.json", "{\"weights\": [1.0,")
            .unwrap();
        assert!(matches!(store.load_genome(3, 1), Err(StoreError::Json(_))));
    }

    #[test]
    fn memory_store_evolution_data() {
        let mut store = MemoryStore::new();
        let data = EvolutionData {
            genomes_left_alive: 2,
            times_legend_spawned: 1,
            data_tracked: vec![ImprovementData {
                fitness: 3.0,
                generation: 5,
                generations_since_improvement: 3,
            }],
        };
        store.save_evolution_data(&data, 0).unwrap();

        let stored: EvolutionData =
            serde_json::from_str(store.get("EvolutionData0.json").unwrap()).unwrap();
        assert_eq!(stored, data);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["EvolutionData0.json"]);
    }

    #[test]
    fn missing_weights_field_loads_empty() {
        let mut store = MemoryStore::new();
        store
            .write("BestGenomeWeights-16_Generation-0.json", "{}")
            .unwrap();
        assert!(store.load_genome(16, 0).unwrap().unwrap().is_empty());
    }
}
