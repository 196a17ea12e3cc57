// src/explorer/session.rs
// =============================================================================
// Supersession of repository loads.
//
// Every load started through a Session gets a Generation. When a load
// finishes, its result is applied only if no newer load has been requested
// since; otherwise it is discarded. The last *requested* load wins, not the
// last one to complete, and in-flight work never has to be cancelled.
// =============================================================================

use tracing::debug;

use super::RepositorySnapshot;
use crate::error::{ExploreError, ExploreResult};

/// Identifies one load request; later requests compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

#[derive(Debug)]
pub enum LoadOutcome {
    /// The result became the current repository
    Applied,
    /// The newest load failed; the current repository was cleared
    Failed(ExploreError),
    /// A newer load was requested meanwhile; the result was dropped
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    latest: u64,
    current: Option<RepositorySnapshot>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new load request and returns its generation
    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }

    pub fn complete(&mut self, generation: Generation, result: ExploreResult<RepositorySnapshot>) -> LoadOutcome {
        if !self.is_current(generation) {
            debug!(?generation, latest = self.latest, "discarding superseded load");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(snapshot) => {
                self.current = Some(snapshot);
                LoadOutcome::Applied
            }
            Err(err) => {
                self.current = None;
                LoadOutcome::Failed(err)
            }
        }
    }

    pub fn current(&self) -> Option<&RepositorySnapshot> {
        self.current.as_ref()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a counter instead of cancelling the older load?
//    - A load is a tree of futures spread over many spawned requests
//    - Dropping the result at the end is enough: the old load finishes on
//      its own and its answer is compared against `latest` here
//
// 2. Why does only the newest failure clear the current repository?
//    - An old load failing says nothing about what the user asked for last
//    - The newest load failing means the screen would otherwise show a
//      repository the user has already moved away from
//
// 3. Why is Session not shared behind a Mutex?
//    - Results come back over a channel and are applied by the one task
//      that owns the Session, so completion is already serialized
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::explorer::load_repository;
    use crate::github::{EntryKind, RepoRef};
    use crate::testing::MemorySource;

    async fn snapshot(name: &str) -> RepositorySnapshot {
        let source = MemorySource::new().dir("", &[("README.md", EntryKind::File)]);
        load_repository(&source, &RepoRef::new("octo", name)).await.unwrap()
    }

    #[test]
    fn test_generations_increase() {
        let mut session = Session::new();
        let first = session.begin();
        let second = session.begin();
        assert!(second > first);
        assert!(session.is_current(second));
        assert!(!session.is_current(first));
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let mut session = Session::new();
        let old = session.begin();
        let new = session.begin();

        assert!(matches!(session.complete(new, Ok(snapshot("new").await)), LoadOutcome::Applied));
        assert!(matches!(session.complete(old, Ok(snapshot("old").await)), LoadOutcome::Stale));
        assert_eq!(session.current().unwrap().repo.name, "new");
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_clear() {
        let mut session = Session::new();
        let old = session.begin();
        let new = session.begin();
        session.complete(new, Ok(snapshot("new").await));

        let outcome = session.complete(old, Err(ExploreError::NotFound { status: 404, message: "gone".into(), path: None }));
        assert!(matches!(outcome, LoadOutcome::Stale));
        assert!(session.current().is_some());
    }

    #[tokio::test]
    async fn test_current_failure_clears() {
        let mut session = Session::new();
        let first = session.begin();
        session.complete(first, Ok(snapshot("first").await));

        let second = session.begin();
        let outcome = session.complete(second, Err(ExploreError::NotFound { status: 404, message: "gone".into(), path: None }));
        assert!(matches!(outcome, LoadOutcome::Failed(ExploreError::NotFound { .. })));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_last_requested_wins_over_last_completed() {
        let slow = Arc::new(
            MemorySource::new()
                .dir("", &[("slow.txt", EntryKind::File)])
                .with_latency(Duration::from_millis(60)),
        );
        let fast = Arc::new(MemorySource::new().dir("", &[("fast.txt", EntryKind::File)]));

        let mut session = Session::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        for (name, source) in [("slow", slow), ("fast", fast)] {
            let generation = session.begin();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = load_repository(&*source, &RepoRef::new("octo", name)).await;
                let _ = tx.send((generation, result));
            });
        }
        drop(tx);

        let mut outcomes = Vec::new();
        while let Some((generation, result)) = rx.recv().await {
            outcomes.push(session.complete(generation, result));
        }

        // The fast (newer) load lands first, the slow (older) one is dropped
        assert!(matches!(outcomes[0], LoadOutcome::Applied));
        assert!(matches!(outcomes[1], LoadOutcome::Stale));
        assert_eq!(session.current().unwrap().repo.name, "fast");
    }
}
