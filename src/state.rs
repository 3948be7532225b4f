use std::fs;
use std::path::PathBuf;

use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PythiaError, Result};

/// The persistable arrays of an RBF layer: the cached distance matrix, the
/// per-unit spreads, and the centre matrix. Matrices are absent until a
/// forward call (or a state import) materializes them.
///
/// Pythia mandates no on-disk schema; a [`StateStore`] collaborator decides
/// the encoding.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RbfState<F> {
    pub distances: Option<Array2<F>>,
    pub spreads: Array1<F>,
    pub centres: Option<Array2<F>>,
}

/// Injected persistence collaborator. The layer hands its state to a store
/// and never touches a file or socket itself.
pub trait StateStore<F> {
    /// Persist a state snapshot
    fn save(&mut self, state: &RbfState<F>) -> Result<()>;

    /// Read back the most recently saved snapshot
    fn load(&self) -> Result<RbfState<F>>;
}

/// File-backed store encoding state as JSON
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStateStore { path: path.into() }
    }
}

impl<F> StateStore<F> for JsonStateStore
where
    F: Serialize + DeserializeOwned,
{
    fn save(&mut self, state: &RbfState<F>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(state)
            .map_err(|err| PythiaError::SerializationError(err.to_string()))?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn load(&self) -> Result<RbfState<F>> {
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| PythiaError::SerializationError(err.to_string()))
    }
}

/// File-backed store encoding state with bincode
pub struct BincodeStateStore {
    path: PathBuf,
}

impl BincodeStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BincodeStateStore { path: path.into() }
    }
}

impl<F> StateStore<F> for BincodeStateStore
where
    F: Serialize + DeserializeOwned,
{
    fn save(&mut self, state: &RbfState<F>) -> Result<()> {
        let serialized = bincode::serialize(state)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn load(&self) -> Result<RbfState<F>> {
        let buffer = fs::read(&self.path)?;
        let deserialized = bincode::deserialize(&buffer)?;
        Ok(deserialized)
    }
}
