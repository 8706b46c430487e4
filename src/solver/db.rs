use std::collections::HashMap;
use std::sync::RwLock;

/// Tuning-record store consulted on resolution fallback. Holds the serialized
/// tuning configuration a prior search settled on for a (signature, solver)
/// pair. In-process boundary for the persistent selection database.
#[derive(Default)]
pub struct SolverDb {
    records: RwLock<HashMap<(String, String), String>>,
}

impl SolverDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, signature: &str, solver: &str) -> Option<String> {
        let records = self.records.read().expect("solver db lock poisoned");
        records
            .get(&(signature.to_string(), solver.to_string()))
            .cloned()
    }

    pub fn store(&self, signature: &str, solver: &str, tuning: String) {
        let mut records = self.records.write().expect("solver db lock poisoned");
        records.insert((signature.to_string(), solver.to_string()), tuning);
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("solver db lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
