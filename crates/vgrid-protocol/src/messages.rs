use serde::{Deserialize, Serialize};

use crate::types::{TileRect, UserId};

/// Instructions issued to the rendering surface by the reconcile engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Stop rendering a participant's feed
    Stop { user_id: UserId },

    /// Start rendering a feed into a tile
    Start { user_id: UserId, rect: TileRect },

    /// Move an active feed without renegotiating quality
    Reposition { user_id: UserId, rect: TileRect },

    /// Restart an active feed at a new quality tier; also repositions it
    Requalify { user_id: UserId, rect: TileRect },
}

impl RenderCommand {
    pub fn user_id(&self) -> UserId {
        match self {
            RenderCommand::Stop { user_id }
            | RenderCommand::Start { user_id, .. }
            | RenderCommand::Reposition { user_id, .. }
            | RenderCommand::Requalify { user_id, .. } => *user_id,
        }
    }

    pub fn rect(&self) -> Option<&TileRect> {
        match self {
            RenderCommand::Stop { .. } => None,
            RenderCommand::Start { rect, .. }
            | RenderCommand::Reposition { rect, .. }
            | RenderCommand::Requalify { rect, .. } => Some(rect),
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, RenderCommand::Stop { .. })
    }
}
