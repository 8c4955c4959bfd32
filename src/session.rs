//! Shared application state: one process session at a time, with
//! per-artifact-kind latest results.
//!
//! Uses `RwLock` for concurrent read access; uploading a new document
//! replaces the whole session, discarding the previous task list and all
//! stored results. Generating one kind never reads or mutates another
//! kind's slot, so concurrent triggering of different kinds needs no
//! locking beyond the per-kind overwrite.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::pipeline::{extract_tasks, has_diagram_info, ArtifactKind, ArtifactResult, Task};
use crate::pipeline::PipelineError;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("State lock poisoned")]
    LockPoisoned,

    #[error("No process loaded")]
    NoProcess,
}

/// Failures while loading a new process document: the XML itself can be
/// rejected, or the session lock can be unusable.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// One uploaded process definition and its derived session data.
///
/// The canonical task list is computed once here and is immutable for the
/// session's lifetime; it is the single source of truth for valid
/// identifiers in every generated artifact.
#[derive(Debug)]
pub struct ProcessSession {
    pub session_id: Uuid,
    pub bpmn_xml: String,
    pub tasks: Vec<Task>,
    /// Whether the document carries layout info (renderer auto-layout hint).
    pub has_diagram: bool,
    pub uploaded_at: DateTime<Utc>,
    results: HashMap<ArtifactKind, ArtifactResult>,
}

impl ProcessSession {
    /// Extract tasks from `bpmn_xml` and start a fresh session around them.
    pub fn new(bpmn_xml: String) -> Result<Self, PipelineError> {
        let tasks = extract_tasks(&bpmn_xml)?;
        let has_diagram = has_diagram_info(&bpmn_xml);
        Ok(Self {
            session_id: Uuid::new_v4(),
            tasks,
            has_diagram,
            bpmn_xml,
            uploaded_at: Utc::now(),
            results: HashMap::new(),
        })
    }

    /// Overwrite the latest result for one kind. Atomic per kind; results
    /// are never merged across kinds.
    pub fn store_result(&mut self, result: ArtifactResult) {
        self.results.insert(result.kind, result);
    }

    pub fn result(&self, kind: ArtifactKind) -> Option<&ArtifactResult> {
        self.results.get(&kind)
    }

    /// Summary shape returned to the upload caller.
    pub fn summary(&self) -> ProcessSummary {
        ProcessSummary {
            session_id: self.session_id,
            task_count: self.tasks.len(),
            tasks: self.tasks.clone(),
            has_diagram: self.has_diagram,
            uploaded_at: self.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessSummary {
    pub session_id: Uuid,
    pub task_count: usize,
    pub tasks: Vec<Task>,
    pub has_diagram: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// Application state shared by all request handlers.
pub struct AppState {
    pub config: AppConfig,
    session: RwLock<Option<ProcessSession>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            session: RwLock::new(None),
        }
    }

    /// Extract tasks from an uploaded document and replace the session.
    ///
    /// Succeeds only once the new session is actually stored; extraction
    /// failures and a poisoned lock both surface as errors.
    pub fn load_process(&self, bpmn_xml: String) -> Result<ProcessSummary, LoadError> {
        let session = ProcessSession::new(bpmn_xml)?;
        let summary = session.summary();
        {
            let mut guard = self.write_session()?;
            *guard = Some(session);
        }
        tracing::info!(
            session_id = %summary.session_id,
            task_count = summary.task_count,
            has_diagram = summary.has_diagram,
            "Process loaded"
        );
        Ok(summary)
    }

    pub fn read_session(
        &self,
    ) -> Result<RwLockReadGuard<'_, Option<ProcessSession>>, StateError> {
        self.session.read().map_err(|_| StateError::LockPoisoned)
    }

    pub fn write_session(
        &self,
    ) -> Result<RwLockWriteGuard<'_, Option<ProcessSession>>, StateError> {
        self.session.write().map_err(|_| StateError::LockPoisoned)
    }

    /// Canonical task list for the current session (owned copy).
    pub fn tasks(&self) -> Result<Vec<Task>, StateError> {
        let guard = self.read_session()?;
        let session = guard.as_ref().ok_or(StateError::NoProcess)?;
        Ok(session.tasks.clone())
    }

    /// Raw XML plus the auto-layout hint, for the external renderer.
    pub fn diagram(&self) -> Result<(String, bool), StateError> {
        let guard = self.read_session()?;
        let session = guard.as_ref().ok_or(StateError::NoProcess)?;
        Ok((session.bpmn_xml.clone(), session.has_diagram))
    }

    /// Store one kind's result (overwriting the previous one).
    pub fn store_result(&self, result: ArtifactResult) -> Result<(), StateError> {
        let mut guard = self.write_session()?;
        let session = guard.as_mut().ok_or(StateError::NoProcess)?;
        session.store_result(result);
        Ok(())
    }

    /// Latest stored result for one kind (owned copy).
    pub fn result(&self, kind: ArtifactKind) -> Result<Option<ArtifactResult>, StateError> {
        let guard = self.read_session()?;
        let session = guard.as_ref().ok_or(StateError::NoProcess)?;
        Ok(session.result(kind).cloned())
    }

    pub fn process_loaded(&self) -> bool {
        self.session
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}
