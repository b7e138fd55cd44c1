//! In-memory registrar.

use parking_lot::Mutex;

use super::{
    PublishRecord, RecordHandle, Registrar, RegistrarError, ReviewVersion, StoredRecord,
    StoredReviewVersion, STATUS_ACTIVE,
};
use crate::context::PipelineContext;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    records: Vec<StoredRecord>,
    versions: Vec<StoredReviewVersion>,
    failure: Option<String>,
}

/// Registrar holding records in memory.
///
/// [`InMemoryRegistrar::fail_with`] makes every later registration fail,
/// which stands in for an unreachable service.
#[derive(Debug, Default)]
pub struct InMemoryRegistrar {
    state: Mutex<State>,
}

impl InMemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().failure = Some(message.into());
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Registrar for InMemoryRegistrar {
    fn register(&self, record: &PublishRecord) -> Result<RecordHandle, RegistrarError> {
        let mut state = self.state.lock();
        if let Some(message) = &state.failure {
            return Err(RegistrarError::Unavailable(message.clone()));
        }

        state.next_id += 1;
        let stored = StoredRecord {
            id: state.next_id,
            status: Some(STATUS_ACTIVE.to_string()),
            record: record.clone(),
        };
        let handle = stored.handle();
        state.records.push(stored);
        Ok(handle)
    }

    fn find_conflicting(
        &self,
        name: &str,
        context: &PipelineContext,
        exclude_id: u64,
    ) -> Result<Vec<StoredRecord>, RegistrarError> {
        Ok(self
            .state
            .lock()
            .records
            .iter()
            .filter(|r| r.conflicts_with(name, context, exclude_id))
            .cloned()
            .collect())
    }

    fn clear_status(&self, ids: &[u64]) -> Result<usize, RegistrarError> {
        let mut state = self.state.lock();
        let mut changed = 0;
        for record in state.records.iter_mut().filter(|r| ids.contains(&r.id)) {
            if record.status.take().is_some() {
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn records(&self) -> Result<Vec<StoredRecord>, RegistrarError> {
        Ok(self.state.lock().records.clone())
    }

    fn create_version(&self, version: &ReviewVersion) -> Result<u64, RegistrarError> {
        let mut state = self.state.lock();
        if let Some(message) = &state.failure {
            return Err(RegistrarError::Unavailable(message.clone()));
        }

        state.next_id += 1;
        let id = state.next_id;
        state.versions.push(StoredReviewVersion {
            id,
            version: version.clone(),
        });
        Ok(id)
    }

    fn review_versions(&self) -> Result<Vec<StoredReviewVersion>, RegistrarError> {
        Ok(self.state.lock().versions.clone())
    }
}
