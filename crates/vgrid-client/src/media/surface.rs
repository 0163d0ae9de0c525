//! Rendering surface
//!
//! The opaque video surface that actually decodes and draws feeds. Calls are
//! asynchronous; a stop for a feed that is not active must be harmless.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use vgrid_protocol::{QualityTier, TileRect, UserId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Render call for user {user_id} failed: {reason}")]
    Failed { user_id: UserId, reason: String },
}

#[async_trait]
pub trait RenderSurface: Send + Sync {
    async fn start(
        &self,
        user_id: UserId,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
        quality: QualityTier,
    ) -> Result<(), SurfaceError>;

    async fn stop(&self, user_id: UserId) -> Result<(), SurfaceError>;

    async fn reposition(
        &self,
        user_id: UserId,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    ) -> Result<(), SurfaceError>;
}

/// Surface that only logs what it is asked to do
#[derive(Debug, Default)]
pub struct LoggingSurface;

#[async_trait]
impl RenderSurface for LoggingSurface {
    async fn start(
        &self,
        user_id: UserId,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
        quality: QualityTier,
    ) -> Result<(), SurfaceError> {
        tracing::info!("start {} {}x{} at ({}, {}) {}", user_id, width, height, x, y, quality);
        Ok(())
    }

    async fn stop(&self, user_id: UserId) -> Result<(), SurfaceError> {
        tracing::info!("stop {}", user_id);
        Ok(())
    }

    async fn reposition(
        &self,
        user_id: UserId,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    ) -> Result<(), SurfaceError> {
        tracing::info!("reposition {} {}x{} at ({}, {})", user_id, width, height, x, y);
        Ok(())
    }
}

/// A call received by a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Start { user_id: UserId, rect: TileRect },
    Stop { user_id: UserId },
    Reposition { user_id: UserId, width: u32, height: u32, x: u32, y: u32 },
}

/// Surface that records every call, optionally failing starts for some users
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    failing: Vec<UserId>,
    slow_stop: Option<(UserId, Duration)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every start issued for the given users
    pub fn failing_starts(failing: Vec<UserId>) -> Self {
        Self {
            failing,
            ..Self::default()
        }
    }

    /// Stops for `user_id` take `delay` before they are recorded
    pub fn slow_stop(user_id: UserId, delay: Duration) -> Self {
        Self {
            slow_stop: Some((user_id, delay)),
            ..Self::default()
        }
    }

    pub async fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl RenderSurface for RecordingSurface {
    async fn start(
        &self,
        user_id: UserId,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
        quality: QualityTier,
    ) -> Result<(), SurfaceError> {
        let rect = TileRect { width, height, x, y, quality };
        self.calls.lock().await.push(SurfaceCall::Start { user_id, rect });
        if self.failing.contains(&user_id) {
            return Err(SurfaceError::Failed {
                user_id,
                reason: "decoder rejected stream".to_string(),
            });
        }
        Ok(())
    }

    async fn stop(&self, user_id: UserId) -> Result<(), SurfaceError> {
        if let Some((slow, delay)) = self.slow_stop {
            if slow == user_id {
                tokio::time::sleep(delay).await;
            }
        }
        self.calls.lock().await.push(SurfaceCall::Stop { user_id });
        Ok(())
    }

    async fn reposition(
        &self,
        user_id: UserId,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    ) -> Result<(), SurfaceError> {
        self.calls.lock().await.push(SurfaceCall::Reposition { user_id, width, height, x, y });
        Ok(())
    }
}
