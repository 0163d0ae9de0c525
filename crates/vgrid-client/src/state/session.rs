//! Gallery session
//!
//! Owns the roster snapshot and the three layout components, and runs one
//! recompute-and-diff pass per external event.

use vgrid_layout::{GridLayout, GridSolver, Pagination, RenderEngine, visible_order};
use vgrid_protocol::{Participant, RenderCommand, UserId, Viewport};

use super::feed::{FeedEvent, SessionFeed};
use super::settings::Settings;

#[derive(Debug)]
pub struct GallerySession {
    current_user: UserId,
    roster: Vec<Participant>,
    viewport: Viewport,
    decode_ready: bool,
    solver: GridSolver,
    pagination: Pagination,
    engine: RenderEngine,
    /// Participants on the current page, in tile order
    visible: Vec<Participant>,
    layout: GridLayout,
}

impl GallerySession {
    /// New session; rendering stays off until the decoder reports ready
    pub fn new(settings: &Settings, current_user: UserId) -> vgrid_layout::Result<Self> {
        let solver = GridSolver::new(settings.layout.clone())?;
        let pagination = Pagination::new(settings.layout.clone(), settings.viewport)?;
        tracing::info!(
            "Gallery session for user {} at {} ({} tiles per page)",
            current_user,
            settings.viewport,
            pagination.page_size()
        );

        Ok(Self {
            current_user,
            roster: Vec::new(),
            viewport: settings.viewport,
            decode_ready: false,
            solver,
            pagination,
            engine: RenderEngine::disabled(),
            visible: Vec::new(),
            layout: GridLayout::empty(),
        })
    }

    pub fn current_user(&self) -> UserId {
        self.current_user
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn decode_ready(&self) -> bool {
        self.decode_ready
    }

    pub fn visible(&self) -> &[Participant] {
        &self.visible
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    /// Replace the whole roster with a fresh snapshot
    pub fn on_roster_changed(&mut self, roster: Vec<Participant>) -> Vec<RenderCommand> {
        self.roster = roster;
        self.refresh()
    }

    pub fn on_participant_joined(&mut self, participant: Participant) -> Vec<RenderCommand> {
        match self.position(participant.user_id) {
            Some(index) => {
                tracing::debug!("User {} joined twice, updating", participant.user_id);
                self.roster[index] = participant;
            }
            None => {
                tracing::debug!("User {} joined", participant.user_id);
                self.roster.push(participant);
            }
        }
        self.refresh()
    }

    pub fn on_participant_left(&mut self, user_id: UserId) -> Vec<RenderCommand> {
        match self.position(user_id) {
            Some(index) => {
                tracing::debug!("User {} left", user_id);
                self.roster.remove(index);
                self.refresh()
            }
            None => {
                tracing::debug!("Ignoring leave for unknown user {}", user_id);
                Vec::new()
            }
        }
    }

    pub fn on_participant_updated(&mut self, participant: Participant) -> Vec<RenderCommand> {
        match self.position(participant.user_id) {
            Some(index) => {
                self.roster[index] = participant;
                self.refresh()
            }
            None => {
                tracing::debug!("Ignoring update for unknown user {}", participant.user_id);
                Vec::new()
            }
        }
    }

    pub fn on_viewport_resized(&mut self, viewport: Viewport) -> Vec<RenderCommand> {
        self.viewport = viewport;
        self.pagination.set_viewport(viewport);
        self.refresh()
    }

    pub fn set_page(&mut self, page: usize) -> Vec<RenderCommand> {
        if !self.pagination.set_page(page) {
            tracing::debug!(
                "Page {} out of range ({} pages)",
                page,
                self.pagination.total_page()
            );
            return Vec::new();
        }
        self.refresh()
    }

    pub fn next_page(&mut self) -> Vec<RenderCommand> {
        if !self.pagination.next_page() {
            return Vec::new();
        }
        self.refresh()
    }

    pub fn prev_page(&mut self) -> Vec<RenderCommand> {
        if !self.pagination.prev_page() {
            return Vec::new();
        }
        self.refresh()
    }

    pub fn on_decode_ready_changed(&mut self, ready: bool) -> Vec<RenderCommand> {
        self.decode_ready = ready;
        self.engine.set_rendering_enabled(ready)
    }

    /// Apply every snapshot the feed has delivered, re-arming its notifiers
    /// after each one
    pub fn pump(&mut self, feed: &mut SessionFeed) -> Vec<RenderCommand> {
        let mut commands = Vec::new();
        loop {
            feed.arm();
            let Some(event) = feed.next_event() else {
                break;
            };
            commands.extend(match event {
                FeedEvent::Roster(roster) => self.on_roster_changed(roster),
                FeedEvent::Viewport(viewport) => self.on_viewport_resized(viewport),
                FeedEvent::DecodeReady(ready) => self.on_decode_ready_changed(ready),
            });
        }
        commands
    }

    /// Stop every feed; the session can be reused afterwards
    pub fn teardown(&mut self) -> Vec<RenderCommand> {
        self.visible.clear();
        self.layout = GridLayout::empty();
        self.engine.teardown()
    }

    fn position(&self, user_id: UserId) -> Option<usize> {
        self.roster.iter().position(|p| p.user_id == user_id)
    }

    fn refresh(&mut self) -> Vec<RenderCommand> {
        let ordered = visible_order(&self.roster, self.current_user);
        self.pagination.set_total_size(ordered.len());
        self.visible = ordered[self.pagination.page_range()].to_vec();
        self.layout = self
            .solver
            .solve(self.viewport.width, self.viewport.height, self.visible.len());

        tracing::debug!(
            "Page {}/{}: {} visible, {}x{} grid",
            self.pagination.page() + 1,
            self.pagination.total_page().max(1),
            self.visible.len(),
            self.layout.rows,
            self.layout.columns
        );

        self.engine.reconcile(&self.visible, &self.layout)
    }
}
