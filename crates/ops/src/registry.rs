//! In-flight pipeline bookkeeping and the single-flight guard

use crate::types::ActivePipeline;
use arcade_types::{PipelineId, PipelinePhase, SingleFlight, TitleId, Uuid};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Transient state of one running pipeline
pub(crate) struct PipelineState {
    pub id: PipelineId,
    pub phase: PipelinePhase,
    pub cancel: CancellationToken,
    pub handle: JoinHandle<()>,
}

/// Pipelines keyed by title; locks are held only for short synchronous sections
#[derive(Default)]
pub(crate) struct Registry {
    pipelines: Mutex<HashMap<TitleId, PipelineState>>,
    /// Pipeline that last opened the progress display
    progress_owner: Mutex<Option<PipelineId>>,
}

impl Registry {
    fn pipelines(&self) -> MutexGuard<'_, HashMap<TitleId, PipelineState>> {
        self.pipelines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Title whose pipeline would block a new one for `title`, if any
    fn blocker(
        pipelines: &HashMap<TitleId, PipelineState>,
        title: Option<&TitleId>,
        policy: SingleFlight,
    ) -> Option<TitleId> {
        match (policy, title) {
            (SingleFlight::PerTitle, Some(title)) => {
                pipelines.contains_key(title).then(|| title.clone())
            }
            (SingleFlight::PerTitle, None) => None,
            (SingleFlight::Global, _) => pipelines.keys().min().cloned(),
        }
    }

    /// Active title that rejects any new request under `policy`, before the
    /// requested title is even known
    pub fn any_blocker(&self, policy: SingleFlight) -> Option<TitleId> {
        Self::blocker(&self.pipelines(), None, policy)
    }

    /// Register a pipeline for `title` and start it with `spawn`
    ///
    /// The check and the insert happen under one lock, so two concurrent
    /// requests can never both pass the guard. On rejection the blocking
    /// title is returned and `spawn` is not called.
    pub fn try_register(
        &self,
        title: &TitleId,
        policy: SingleFlight,
        spawn: impl FnOnce(PipelineId, CancellationToken) -> JoinHandle<()>,
    ) -> Result<PipelineId, TitleId> {
        let mut pipelines = self.pipelines();
        if let Some(active) = Self::blocker(&pipelines, Some(title), policy) {
            return Err(active);
        }

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let handle = spawn(id, cancel.clone());
        pipelines.insert(
            title.clone(),
            PipelineState {
                id,
                phase: PipelinePhase::Idle,
                cancel,
                handle,
            },
        );
        Ok(id)
    }

    /// Record a phase change; ignored once the pipeline was drained
    pub fn set_phase(&self, title: &TitleId, id: PipelineId, phase: PipelinePhase) {
        if let Some(state) = self.pipelines().get_mut(title) {
            if state.id == id {
                state.phase = phase;
            }
        }
    }

    /// Drop the entry for `title` if it still belongs to pipeline `id`
    pub fn finish(&self, title: &TitleId, id: PipelineId) -> bool {
        let mut pipelines = self.pipelines();
        if pipelines.get(title).is_some_and(|state| state.id == id) {
            pipelines.remove(title);
            true
        } else {
            false
        }
    }

    /// Remove every entry, leaving the registry idle
    pub fn drain(&self) -> Vec<PipelineState> {
        self.pipelines().drain().map(|(_, state)| state).collect()
    }

    pub fn contains(&self, title: &TitleId) -> bool {
        self.pipelines().contains_key(title)
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines().is_empty()
    }

    /// Snapshot of the running pipelines, ordered by title
    pub fn active(&self) -> Vec<ActivePipeline> {
        let mut active: Vec<_> = self
            .pipelines()
            .iter()
            .map(|(title, state)| ActivePipeline {
                pipeline_id: state.id,
                title: title.clone(),
                phase: state.phase,
            })
            .collect();
        active.sort_by(|a, b| a.title.cmp(&b.title));
        active
    }

    pub fn claim_progress(&self, id: PipelineId) {
        *self
            .progress_owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    pub fn owns_progress(&self, id: PipelineId) -> bool {
        *self
            .progress_owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_task() -> JoinHandle<()> {
        tokio::spawn(async {})
    }

    #[tokio::test]
    async fn test_global_policy_blocks_other_titles() {
        let registry = Registry::default();
        let g1 = TitleId::from("g1");
        let g2 = TitleId::from("g2");

        registry
            .try_register(&g1, SingleFlight::Global, |_, _| idle_task())
            .unwrap();
        let rejected = registry.try_register(&g2, SingleFlight::Global, |_, _| {
            panic!("spawned despite an active pipeline")
        });
        assert_eq!(rejected, Err(g1.clone()));
        assert_eq!(registry.any_blocker(SingleFlight::Global), Some(g1));
    }

    #[tokio::test]
    async fn test_per_title_policy_allows_other_titles() {
        let registry = Registry::default();
        let g1 = TitleId::from("g1");
        let g2 = TitleId::from("g2");

        registry
            .try_register(&g1, SingleFlight::PerTitle, |_, _| idle_task())
            .unwrap();
        assert!(registry
            .try_register(&g2, SingleFlight::PerTitle, |_, _| idle_task())
            .is_ok());
        assert_eq!(
            registry.try_register(&g1, SingleFlight::PerTitle, |_, _| idle_task()),
            Err(g1)
        );
        assert_eq!(registry.any_blocker(SingleFlight::PerTitle), None);
    }

    #[tokio::test]
    async fn test_stale_finish_keeps_newer_entry() {
        let registry = Registry::default();
        let g1 = TitleId::from("g1");

        let old = registry
            .try_register(&g1, SingleFlight::Global, |_, _| idle_task())
            .unwrap();
        assert_eq!(registry.drain().len(), 1);
        let new = registry
            .try_register(&g1, SingleFlight::Global, |_, _| idle_task())
            .unwrap();

        assert!(!registry.finish(&g1, old));
        assert!(registry.contains(&g1));
        assert!(registry.finish(&g1, new));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_phase_tracking() {
        let registry = Registry::default();
        let g1 = TitleId::from("g1");
        let id = registry
            .try_register(&g1, SingleFlight::Global, |_, _| idle_task())
            .unwrap();

        registry.set_phase(&g1, id, PipelinePhase::Downloading);
        registry.set_phase(&g1, Uuid::new_v4(), PipelinePhase::Running);

        let active = registry.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].phase, PipelinePhase::Downloading);
        assert_eq!(active[0].pipeline_id, id);
    }
}
