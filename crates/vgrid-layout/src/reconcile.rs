//! Render reconciliation
//!
//! Diffs the newly visible participants against what was rendered last cycle
//! and emits the commands that move the rendering surface from one to the
//! other. Stops are always emitted before anything else in a cycle.
//!
//! Retained state is updated as soon as the commands are produced, whether
//! or not the surface later succeeds in executing them.

use std::collections::{HashMap, HashSet};

use vgrid_protocol::{Participant, RenderCommand, TileRect, UserId};

use crate::solver::GridLayout;

#[derive(Debug, Clone)]
pub struct RenderEngine {
    /// Whether the surface can currently decode video
    rendering_enabled: bool,
    /// Ids with a feed assigned to a tile last cycle
    subscribed: HashSet<UserId>,
    /// Visible order from last cycle
    visible: Vec<UserId>,
    /// Layout from last cycle
    layout: GridLayout,
    /// Feeds the surface was last told to show, in visible order. Lags
    /// `subscribed` while rendering is disabled.
    rendered: Vec<UserId>,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self {
            rendering_enabled: true,
            subscribed: HashSet::new(),
            visible: Vec::new(),
            layout: GridLayout::empty(),
            rendered: Vec::new(),
        }
    }

    /// Engine for a surface that is not ready to decode yet
    pub fn disabled() -> Self {
        Self {
            rendering_enabled: false,
            ..Self::new()
        }
    }

    pub fn rendering_enabled(&self) -> bool {
        self.rendering_enabled
    }

    pub fn subscribed(&self) -> &HashSet<UserId> {
        &self.subscribed
    }

    pub fn is_subscribed(&self, user_id: UserId) -> bool {
        self.subscribed.contains(&user_id)
    }

    /// Run one reconcile cycle against the new visible order and layout
    pub fn reconcile(&mut self, visible: &[Participant], layout: &GridLayout) -> Vec<RenderCommand> {
        let mut next_subscribed = HashSet::new();
        for (index, participant) in visible.iter().enumerate() {
            if !participant.has_video_on {
                continue;
            }
            if layout.tile(index).is_some() {
                next_subscribed.insert(participant.user_id);
            } else {
                tracing::debug!(
                    "No tile for {} at slot {} ({} tiles), retrying next cycle",
                    participant.user_id,
                    index,
                    layout.len()
                );
            }
        }

        let commands = if self.rendering_enabled {
            self.diff(visible, layout, &next_subscribed)
        } else {
            Vec::new()
        };

        self.subscribed = next_subscribed;
        self.visible = visible.iter().map(|p| p.user_id).collect();
        self.layout = layout.clone();
        if self.rendering_enabled {
            self.rendered = self.subscribed_in_order();
        }

        if !commands.is_empty() {
            tracing::debug!(
                "Reconciled {} visible, {} subscribed: {} commands",
                self.visible.len(),
                self.subscribed.len(),
                commands.len()
            );
        }
        commands
    }

    /// Toggle decode readiness. Becoming ready stops feeds that went away
    /// while disabled, then replays a start for every retained subscription
    /// using the latest layout.
    pub fn set_rendering_enabled(&mut self, enabled: bool) -> Vec<RenderCommand> {
        let was_enabled = std::mem::replace(&mut self.rendering_enabled, enabled);
        if !enabled || was_enabled {
            return Vec::new();
        }

        let mut commands: Vec<_> = self
            .stale()
            .map(|user_id| RenderCommand::Stop { user_id })
            .collect();
        let stale = commands.len();
        commands.extend(
            self.placements()
                .map(|(user_id, _, rect)| RenderCommand::Start { user_id, rect }),
        );
        self.rendered = self.subscribed_in_order();

        tracing::info!(
            "Rendering enabled, resyncing {} feeds ({} stale)",
            commands.len() - stale,
            stale
        );
        commands
    }

    /// Stop every feed the surface may still show and forget all state
    pub fn teardown(&mut self) -> Vec<RenderCommand> {
        let mut commands: Vec<_> = self
            .subscribed_in_order()
            .into_iter()
            .map(|user_id| RenderCommand::Stop { user_id })
            .collect();
        commands.extend(self.stale().map(|user_id| RenderCommand::Stop { user_id }));

        self.subscribed.clear();
        self.visible.clear();
        self.layout = GridLayout::empty();
        self.rendered.clear();

        tracing::info!("Render engine torn down, stopped {} feeds", commands.len());
        commands
    }

    fn diff(
        &self,
        visible: &[Participant],
        layout: &GridLayout,
        next_subscribed: &HashSet<UserId>,
    ) -> Vec<RenderCommand> {
        let mut commands = Vec::new();

        for &user_id in &self.visible {
            if self.subscribed.contains(&user_id) && !next_subscribed.contains(&user_id) {
                commands.push(RenderCommand::Stop { user_id });
            }
        }

        let slots: Vec<(UserId, usize, TileRect)> = visible
            .iter()
            .enumerate()
            .filter_map(|(index, p)| {
                let rect = layout.tile(index)?;
                next_subscribed
                    .contains(&p.user_id)
                    .then_some((p.user_id, index, *rect))
            })
            .collect();

        for &(user_id, _, rect) in &slots {
            if !self.subscribed.contains(&user_id) {
                commands.push(RenderCommand::Start { user_id, rect });
            }
        }

        let previous: HashMap<UserId, (usize, TileRect)> = self
            .placements()
            .map(|(user_id, index, rect)| (user_id, (index, rect)))
            .collect();
        let shape_changed = !self.layout.same_shape(layout);

        for &(user_id, index, rect) in &slots {
            if !self.subscribed.contains(&user_id) {
                continue;
            }
            match previous.get(&user_id) {
                Some((_, prev)) if shape_changed && prev.quality != rect.quality => {
                    commands.push(RenderCommand::Requalify { user_id, rect });
                }
                Some((prev_index, prev))
                    if *prev_index == index && prev.same_placement(&rect) => {}
                _ => commands.push(RenderCommand::Reposition { user_id, rect }),
            }
        }

        commands
    }

    fn subscribed_in_order(&self) -> Vec<UserId> {
        self.visible
            .iter()
            .copied()
            .filter(|id| self.subscribed.contains(id))
            .collect()
    }

    /// Feeds on the surface that are no longer subscribed
    fn stale(&self) -> impl Iterator<Item = UserId> + '_ {
        self.rendered
            .iter()
            .copied()
            .filter(|id| !self.subscribed.contains(id))
    }

    /// Retained subscriptions with their slot and tile, in visible order
    fn placements(&self) -> impl Iterator<Item = (UserId, usize, TileRect)> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, id)| self.subscribed.contains(*id))
            .filter_map(|(index, &id)| self.layout.tile(index).map(|rect| (id, index, *rect)))
    }
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new()
    }
}
