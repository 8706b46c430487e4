use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cheap-clone shared handle to f32 storage. This is the crate's stand-in for
/// a device allocation: invokers read and write through it, callers keep their
/// own clone to inspect results.
#[derive(Clone, Debug)]
pub struct Buffer {
    data: Arc<RwLock<Vec<f32>>>,
}

impl Buffer {
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(vec![0.0; len])),
        }
    }

    pub fn from_vec(data: Vec<f32>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<f32>> {
        self.data.read().expect("buffer lock poisoned")
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<f32>> {
        self.data.write().expect("buffer lock poisoned")
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.read().clone()
    }
}
