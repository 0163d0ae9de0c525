//! Command dispatch
//!
//! Turns render commands into surface calls without making the caller wait.
//! A single worker task drains every cycle in emission order, so calls from
//! a later cycle never overtake an earlier one.

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use vgrid_protocol::RenderCommand;

use super::surface::{RenderSurface, SurfaceError};

pub struct CommandDispatcher<S: RenderSurface + ?Sized + 'static> {
    surface: Arc<S>,
    tx: mpsc::UnboundedSender<Vec<RenderCommand>>,
    worker: JoinHandle<usize>,
}

impl<S: RenderSurface + ?Sized + 'static> CommandDispatcher<S> {
    /// Spawn the worker on `runtime`
    pub fn new(surface: Arc<S>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = runtime.spawn(drain(surface.clone(), rx));
        Self { surface, tx, worker }
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Queue one cycle's commands behind every earlier cycle.
    ///
    /// Never blocks. Returns false when nothing was queued: either the cycle
    /// was empty or the worker is gone.
    pub fn dispatch(&self, commands: Vec<RenderCommand>) -> bool {
        if commands.is_empty() {
            return false;
        }

        match self.tx.send(commands) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Render worker stopped, dropping {} commands", e.0.len());
                false
            }
        }
    }

    /// Wait for every queued command to be issued.
    ///
    /// Resolves to the number of calls that failed over the dispatcher's life.
    pub async fn finish(self) -> usize {
        drop(self.tx);
        match self.worker.await {
            Ok(failed) => failed,
            Err(e) => {
                tracing::error!("Render worker did not finish: {}", e);
                0
            }
        }
    }
}

async fn drain<S: RenderSurface + ?Sized>(
    surface: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<Vec<RenderCommand>>,
) -> usize {
    let mut failed = 0;
    while let Some(commands) = rx.recv().await {
        for command in &commands {
            // Failed calls are logged and never retried
            if let Err(e) = issue(surface.as_ref(), command).await {
                tracing::warn!("Render command {:?} failed: {}", command, e);
                failed += 1;
            }
        }
    }
    failed
}

/// Translate a single command into its surface call
pub async fn issue<S: RenderSurface + ?Sized>(
    surface: &S,
    command: &RenderCommand,
) -> Result<(), SurfaceError> {
    match command {
        RenderCommand::Stop { user_id } => surface.stop(*user_id).await,
        // Quality changes need a fresh start; it also moves the feed
        RenderCommand::Start { user_id, rect } | RenderCommand::Requalify { user_id, rect } => {
            surface
                .start(*user_id, rect.width, rect.height, rect.x, rect.y, rect.quality)
                .await
        }
        RenderCommand::Reposition { user_id, rect } => {
            surface
                .reposition(*user_id, rect.width, rect.height, rect.x, rect.y)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::surface::{RecordingSurface, SurfaceCall};
    use std::time::Duration;
    use vgrid_protocol::{QualityTier, TileRect, UserId};

    fn rect(x: u32) -> TileRect {
        TileRect { width: 320, height: 180, x, y: 0, quality: QualityTier::Video180p }
    }

    #[test]
    fn requalify_is_issued_as_start() {
        let surface = RecordingSurface::new();
        let command = RenderCommand::Requalify { user_id: UserId(4), rect: rect(10) };
        tokio_test::block_on(issue(&surface, &command)).unwrap();
        let calls = tokio_test::block_on(surface.calls());
        assert_eq!(calls, vec![SurfaceCall::Start { user_id: UserId(4), rect: rect(10) }]);
    }

    #[tokio::test]
    async fn dispatch_preserves_emission_order() {
        let surface = Arc::new(RecordingSurface::new());
        let dispatcher = CommandDispatcher::new(surface.clone(), Handle::current());
        assert!(dispatcher.dispatch(vec![
            RenderCommand::Stop { user_id: UserId(1) },
            RenderCommand::Start { user_id: UserId(2), rect: rect(0) },
            RenderCommand::Reposition { user_id: UserId(3), rect: rect(330) },
        ]));
        assert_eq!(dispatcher.finish().await, 0);

        let calls = surface.calls().await;
        assert_eq!(
            calls,
            vec![
                SurfaceCall::Stop { user_id: UserId(1) },
                SurfaceCall::Start { user_id: UserId(2), rect: rect(0) },
                SurfaceCall::Reposition { user_id: UserId(3), width: 320, height: 180, x: 330, y: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn slow_call_holds_back_later_cycles() {
        let surface = Arc::new(RecordingSurface::slow_stop(UserId(2), Duration::from_millis(50)));
        let dispatcher = CommandDispatcher::new(surface.clone(), Handle::current());
        dispatcher.dispatch(vec![
            RenderCommand::Stop { user_id: UserId(2) },
            RenderCommand::Start { user_id: UserId(1), rect: rect(0) },
        ]);
        dispatcher.dispatch(vec![RenderCommand::Stop { user_id: UserId(1) }]);
        assert_eq!(dispatcher.finish().await, 0);

        assert_eq!(
            surface.calls().await,
            vec![
                SurfaceCall::Stop { user_id: UserId(2) },
                SurfaceCall::Start { user_id: UserId(1), rect: rect(0) },
                SurfaceCall::Stop { user_id: UserId(1) },
            ]
        );
    }

    #[tokio::test]
    async fn failures_are_counted_not_retried() {
        let surface = Arc::new(RecordingSurface::failing_starts(vec![UserId(2)]));
        let dispatcher = CommandDispatcher::new(surface.clone(), Handle::current());
        dispatcher.dispatch(vec![
            RenderCommand::Start { user_id: UserId(2), rect: rect(0) },
            RenderCommand::Start { user_id: UserId(3), rect: rect(330) },
        ]);
        dispatcher.dispatch(vec![RenderCommand::Start { user_id: UserId(2), rect: rect(660) }]);
        assert_eq!(dispatcher.finish().await, 2);
        assert_eq!(surface.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn empty_cycle_is_not_queued() {
        let surface = Arc::new(RecordingSurface::new());
        let dispatcher = CommandDispatcher::new(surface.clone(), Handle::current());
        assert!(!dispatcher.dispatch(Vec::new()));
        assert_eq!(dispatcher.finish().await, 0);
        assert!(surface.calls().await.is_empty());
    }
}
