//! Scripted call scenarios
//!
//! A scenario is a JSON file describing the local user and a sequence of
//! roster, viewport, pagination and decoder events.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use vgrid_protocol::{Participant, RenderCommand, UserId, Viewport};

use crate::state::{GallerySession, SessionFeed};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub current_user: UserId,
    /// Overrides the configured starting viewport
    #[serde(default)]
    pub viewport: Option<Viewport>,
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Roster { participants: Vec<Participant> },
    Join { participant: Participant },
    Leave { user_id: UserId },
    Update { participant: Participant },
    Resize { width: u32, height: u32 },
    Page { page: usize },
    NextPage,
    PrevPage,
    DecodeReady { ready: bool },
    Teardown,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scenario")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {:?}", path))?;
        Self::from_json(&contents)
    }
}

impl ScenarioEvent {
    /// Feed this event to the session and return the resulting commands.
    ///
    /// Roster snapshots, resizes and decoder changes are published on `feed`
    /// and reach the session through [`GallerySession::pump`].
    pub fn apply(self, session: &mut GallerySession, feed: &mut SessionFeed) -> Vec<RenderCommand> {
        match self {
            ScenarioEvent::Roster { participants } => {
                feed.publish_roster(participants);
                session.pump(feed)
            }
            ScenarioEvent::Join { participant } => session.on_participant_joined(participant),
            ScenarioEvent::Leave { user_id } => session.on_participant_left(user_id),
            ScenarioEvent::Update { participant } => session.on_participant_updated(participant),
            ScenarioEvent::Resize { width, height } => {
                feed.publish_viewport(Viewport::new(width, height));
                session.pump(feed)
            }
            ScenarioEvent::Page { page } => session.set_page(page),
            ScenarioEvent::NextPage => session.next_page(),
            ScenarioEvent::PrevPage => session.prev_page(),
            ScenarioEvent::DecodeReady { ready } => {
                feed.publish_decode_ready(ready);
                session.pump(feed)
            }
            ScenarioEvent::Teardown => session.teardown(),
        }
    }
}
