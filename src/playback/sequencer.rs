use std::sync::Arc;
use std::time::Duration;
use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use crate::domain::loadout::Loadout;
use crate::playback::event::MatchEvent;
use crate::playback::source::EventSource;
use crate::state::session::SessionState;

/// How a playback task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Finished { revealed: usize },
    Cancelled { revealed: usize },
    /// The session moved on to another match (or dropped this one)
    Superseded,
}

/// Handle to a running playback task
pub struct PlaybackHandle {
    pub match_id: u64,
    pub cancel: CancellationToken,
    pub task: JoinHandle<PlaybackEnd>,
}

impl PlaybackHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Requests the match narrative and reveals it on a fixed cadence
pub struct MatchSequencer {
    source: Arc<dyn EventSource>,
    cadence: Duration,
}

impl MatchSequencer {
    pub fn new(source: Arc<dyn EventSource>, cadence: Duration) -> Self {
        Self { source, cadence }
    }

    /// Fetch the event list. Failures become the single deployment-aborted event.
    pub async fn request_events(&self, loadout: &Loadout) -> Vec<MatchEvent> {
        match self.source.generate(loadout).await {
            Ok(events) => {
                debug!("Event source returned {} events", events.len());
                events
            }
            Err(e) => {
                warn!("Match simulation failed: {:#}", e);
                vec![MatchEvent::deployment_aborted()]
            }
        }
    }

    /// Run one playback to completion or cancellation.
    /// Each event waits a full cadence before it is revealed.
    pub async fn play(
        &self,
        session: Arc<RwLock<SessionState>>,
        match_id: u64,
        loadout: Loadout,
        cancel: CancellationToken,
    ) -> PlaybackEnd {
        let events = tokio::select! {
            biased;
            _ = cancel.cancelled() => return abort(&session, match_id, 0).await,
            events = self.request_events(&loadout) => events,
        };

        let total = events.len();
        for (revealed, event) in events.into_iter().enumerate() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return abort(&session, match_id, revealed).await,
                _ = sleep(self.cadence) => {}
            }

            let mut guard = session.write().await;
            debug!(
                "Session {} match {} reveal [{}] {}: {}",
                guard.id, match_id, event.time, event.kind.as_str(), event.message
            );
            if !guard.playback.reveal(match_id, event) {
                return PlaybackEnd::Superseded;
            }
            // Last reveal and the finished flip land under the same guard
            if revealed + 1 == total {
                guard.playback.finish(match_id);
                info!("Session {} match {} finished with {} events", guard.id, match_id, total);
                return PlaybackEnd::Finished { revealed: total };
            }
        }

        // Empty narrative
        let mut guard = session.write().await;
        if guard.playback.finish(match_id) {
            info!("Session {} match {} finished with {} events", guard.id, match_id, total);
            PlaybackEnd::Finished { revealed: total }
        } else {
            PlaybackEnd::Superseded
        }
    }

    /// Spawn `play` as a cancellable task
    pub fn spawn(
        self: &Arc<Self>,
        session: Arc<RwLock<SessionState>>,
        match_id: u64,
        loadout: Loadout,
    ) -> PlaybackHandle {
        let cancel = CancellationToken::new();
        let sequencer = self.clone();
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            sequencer.play(session, match_id, loadout, task_cancel).await
        });

        PlaybackHandle { match_id, cancel, task }
    }
}

async fn abort(session: &Arc<RwLock<SessionState>>, match_id: u64, revealed: usize) -> PlaybackEnd {
    let mut guard = session.write().await;
    if guard.playback.abort(match_id) {
        info!("Session {} match {} cancelled after {} events", guard.id, match_id, revealed);
        PlaybackEnd::Cancelled { revealed }
    } else {
        PlaybackEnd::Superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::event::EventKind;
    use crate::playback::source::SourceFuture;
    use crate::state::session::PlaybackStatus;
    use crate::utils::catalog::Catalog;
    use anyhow::anyhow;
    use uuid::Uuid;

    const CADENCE: Duration = Duration::from_millis(1500);

    struct Scripted(Vec<MatchEvent>);

    impl EventSource for Scripted {
        fn generate<'a>(&'a self, _loadout: &'a Loadout) -> SourceFuture<'a> {
            let events = self.0.clone();
            Box::pin(async move { Ok::<_, anyhow::Error>(events) })
        }
    }

    struct Failing;

    impl EventSource for Failing {
        fn generate<'a>(&'a self, _loadout: &'a Loadout) -> SourceFuture<'a> {
            Box::pin(async { Err::<Vec<MatchEvent>, _>(anyhow!("connection refused")) })
        }
    }

    /// Never answers
    struct Hanging;

    impl EventSource for Hanging {
        fn generate<'a>(&'a self, _loadout: &'a Loadout) -> SourceFuture<'a> {
            Box::pin(std::future::pending::<anyhow::Result<Vec<MatchEvent>>>())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn two_events() -> Vec<MatchEvent> {
        vec![
            MatchEvent::new("0:10", "Drop secured", EventKind::Info),
            MatchEvent::new("1:02", "Eliminated by zone", EventKind::Zone),
        ]
    }

    fn setup(source: impl EventSource + 'static) -> (Arc<MatchSequencer>, Arc<RwLock<SessionState>>, u64, Loadout) {
        let catalog = Catalog::load();
        let mut session = SessionState::new(Uuid::new_v4(), 2500);
        let loadout = Loadout::resolve(&session, &catalog).unwrap();
        let match_id = session.playback.begin();
        let sequencer = Arc::new(MatchSequencer::new(Arc::new(source), CADENCE));
        (sequencer, Arc::new(RwLock::new(session)), match_id, loadout)
    }

    async fn snapshot(session: &Arc<RwLock<SessionState>>) -> (usize, PlaybackStatus) {
        let guard = session.read().await;
        (guard.playback.revealed.len(), guard.playback.status)
    }

    #[tokio::test]
    async fn test_failure_becomes_single_danger_event() {
        let (sequencer, _, _, loadout) = setup(Failing);
        let events = sequencer.request_events(&loadout).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Danger);
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let (sequencer, _, _, loadout) = setup(Scripted(two_events()));
        assert_eq!(sequencer.request_events(&loadout).await, two_events());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_on_cadence() {
        let (sequencer, session, match_id, loadout) = setup(Scripted(two_events()));
        let handle = sequencer.spawn(session.clone(), match_id, loadout);

        sleep(ms(1499)).await;
        assert_eq!(snapshot(&session).await, (0, PlaybackStatus::Simulating));

        sleep(ms(2)).await;
        assert_eq!(snapshot(&session).await, (1, PlaybackStatus::Simulating));

        sleep(ms(1498)).await;
        assert_eq!(snapshot(&session).await, (1, PlaybackStatus::Simulating));

        sleep(ms(2)).await;
        assert_eq!(snapshot(&session).await, (2, PlaybackStatus::Finished));

        assert_eq!(handle.task.await.unwrap(), PlaybackEnd::Finished { revealed: 2 });
        assert_eq!(session.read().await.playback.revealed, two_events());
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved() {
        let events: Vec<MatchEvent> = (0..10)
            .map(|i| MatchEvent::new(format!("{}:00", i), format!("event {}", 9 - i), EventKind::Kill))
            .collect();
        let (sequencer, session, match_id, loadout) = setup(Scripted(events.clone()));

        let end = sequencer.play(session.clone(), match_id, loadout, CancellationToken::new()).await;
        assert_eq!(end, PlaybackEnd::Finished { revealed: 10 });
        assert_eq!(session.read().await.playback.revealed, events);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_list_finishes_immediately() {
        let (sequencer, session, match_id, loadout) = setup(Scripted(Vec::new()));
        let start = tokio::time::Instant::now();

        let end = sequencer.play(session.clone(), match_id, loadout, CancellationToken::new()).await;
        assert_eq!(end, PlaybackEnd::Finished { revealed: 0 });
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(snapshot(&session).await, (0, PlaybackStatus::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_still_reveals_on_cadence() {
        let (sequencer, session, match_id, loadout) = setup(Failing);
        let handle = sequencer.spawn(session.clone(), match_id, loadout);

        sleep(ms(1501)).await;
        let guard = session.read().await;
        assert_eq!(guard.playback.status, PlaybackStatus::Finished);
        assert_eq!(guard.playback.revealed, vec![MatchEvent::deployment_aborted()]);
        drop(guard);
        assert_eq!(handle.task.await.unwrap(), PlaybackEnd::Finished { revealed: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_reveal() {
        let (sequencer, session, match_id, loadout) = setup(Scripted(two_events()));
        let handle = sequencer.spawn(session.clone(), match_id, loadout);

        sleep(ms(2000)).await;
        handle.cancel();
        assert_eq!(handle.task.await.unwrap(), PlaybackEnd::Cancelled { revealed: 1 });

        sleep(ms(5000)).await;
        assert_eq!(snapshot(&session).await, (1, PlaybackStatus::Aborted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting_on_source() {
        let (sequencer, session, match_id, loadout) = setup(Hanging);
        let handle = sequencer.spawn(session.clone(), match_id, loadout);

        sleep(ms(60_000)).await;
        assert_eq!(snapshot(&session).await, (0, PlaybackStatus::Simulating));

        handle.cancel();
        assert_eq!(handle.task.await.unwrap(), PlaybackEnd::Cancelled { revealed: 0 });
        assert_eq!(snapshot(&session).await, (0, PlaybackStatus::Aborted));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_last_reveal_and_finish_are_atomic() {
        let event = MatchEvent::new("0:01", "Landed", EventKind::Info);

        for _ in 0..200 {
            let catalog = Catalog::load();
            let mut state = SessionState::new(Uuid::new_v4(), 2500);
            let loadout = Loadout::resolve(&state, &catalog).unwrap();
            let match_id = state.playback.begin();
            let session = Arc::new(RwLock::new(state));
            let sequencer = Arc::new(MatchSequencer::new(
                Arc::new(Scripted(vec![event.clone()])),
                Duration::ZERO,
            ));
            let handle = sequencer.spawn(session.clone(), match_id, loadout);

            loop {
                let (revealed, status) = snapshot(&session).await;
                assert!(
                    !(revealed == 1 && status == PlaybackStatus::Simulating),
                    "all events revealed while still simulating"
                );
                if status != PlaybackStatus::Simulating {
                    break;
                }
                tokio::task::yield_now().await;
            }
            assert_eq!(handle.task.await.unwrap(), PlaybackEnd::Finished { revealed: 1 });
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_match_stops() {
        let (sequencer, session, match_id, loadout) = setup(Scripted(two_events()));
        let handle = sequencer.spawn(session.clone(), match_id, loadout);

        sleep(ms(100)).await;
        {
            let mut guard = session.write().await;
            guard.playback.abort(match_id);
            guard.playback.begin();
        }

        assert_eq!(handle.task.await.unwrap(), PlaybackEnd::Superseded);
        assert_eq!(snapshot(&session).await, (0, PlaybackStatus::Simulating));
    }
}
