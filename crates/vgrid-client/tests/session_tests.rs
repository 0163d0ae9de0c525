//! Session-level tests: whole event sequences through ordering, pagination,
//! layout and reconciliation, plus dispatch to a recording surface.
//!
//! Run with: cargo test -p vgrid-client --test session_tests

use std::sync::Arc;

use vgrid_client::media::{CommandDispatcher, RecordingSurface, SurfaceCall};
use vgrid_client::scenario::Scenario;
use vgrid_client::state::{GallerySession, SessionFeed, Settings};
use vgrid_protocol::{Participant, QualityTier, RenderCommand, UserId, Viewport};

fn settings(width: u32, height: u32) -> Settings {
    Settings {
        viewport: Viewport::new(width, height),
        ..Default::default()
    }
}

fn ready_session(width: u32, height: u32, me: u32) -> GallerySession {
    let mut session = GallerySession::new(&settings(width, height), UserId(me)).unwrap();
    assert!(session.on_decode_ready_changed(true).is_empty());
    session
}

fn participants(ids: impl IntoIterator<Item = u32>) -> Vec<Participant> {
    ids.into_iter()
        .map(|id| Participant::new(id, format!("user-{id}"), true))
        .collect()
}

fn started(commands: &[RenderCommand]) -> Vec<u32> {
    commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::Start { .. }))
        .map(|c| c.user_id().0)
        .collect()
}

fn stopped(commands: &[RenderCommand]) -> Vec<u32> {
    commands
        .iter()
        .filter(|c| c.is_stop())
        .map(|c| c.user_id().0)
        .collect()
}

#[test]
fn five_participants_in_800x600() {
    let mut session = ready_session(800, 600, 1);
    let commands = session.on_roster_changed(participants(1..=5));

    assert_eq!(started(&commands), vec![2, 1, 3, 4, 5]);
    let layout = session.layout();
    assert_eq!((layout.rows, layout.columns), (3, 2));
    for command in &commands {
        assert_eq!(command.rect().unwrap().quality, QualityTier::Video180p);
    }
}

#[test]
fn current_user_is_always_second() {
    for size in 2..=9u32 {
        for me in 1..=size {
            let mut session = ready_session(1920, 1080, me);
            session.on_roster_changed(participants(1..=size));
            assert_eq!(session.visible()[1].user_id, UserId(me), "roster {size}, user {me}");
        }
    }
}

#[test]
fn paging_swaps_the_rendered_set() {
    let mut session = ready_session(1280, 720, 1);
    let first = session.on_roster_changed(participants(1..=12));
    assert_eq!(session.pagination().page_size(), 9);
    assert_eq!(session.pagination().total_page(), 2);
    assert_eq!(started(&first), vec![2, 1, 3, 4, 5, 6, 7, 8, 9]);

    let commands = session.next_page();
    assert_eq!(stopped(&commands), vec![2, 1, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(started(&commands), vec![10, 11, 12]);
    assert!(commands[..9].iter().all(RenderCommand::is_stop));
    assert_eq!(session.layout().tiles[0].quality, QualityTier::Video360p);

    // Two leave: still on the last page, now alone and bigger
    let commands = session.on_roster_changed(participants(1..=10));
    assert_eq!(session.pagination().page(), 1);
    assert_eq!(stopped(&commands), vec![11, 12]);
    assert_eq!(
        commands.last(),
        Some(&RenderCommand::Requalify {
            user_id: UserId(10),
            rect: session.layout().tiles[0]
        })
    );

    // The last page disappears: clamp back to the first
    let commands = session.on_participant_left(UserId(10));
    assert_eq!(session.pagination().page(), 0);
    assert_eq!(stopped(&commands), vec![10]);
    assert_eq!(started(&commands).len(), 9);
}

#[test]
fn resize_repositions_without_restarting() {
    let mut session = ready_session(800, 600, 1);
    session.on_roster_changed(participants(1..=5));

    let commands = session.on_viewport_resized(Viewport::new(1920, 1080));
    assert_eq!((session.layout().rows, session.layout().columns), (2, 3));
    assert_eq!(commands.len(), 5);
    assert!(
        commands
            .iter()
            .all(|c| matches!(c, RenderCommand::Reposition { .. }))
    );
}

#[test]
fn decoder_ready_replays_latest_layout() {
    let mut session = GallerySession::new(&settings(1280, 720), UserId(1)).unwrap();
    assert!(session.on_roster_changed(participants(1..=2)).is_empty());
    assert!(session.on_participant_joined(Participant::new(3, "carol", true)).is_empty());

    let commands = session.on_decode_ready_changed(true);
    assert_eq!(started(&commands), vec![2, 1, 3]);
    for (command, tile) in commands.iter().zip(&session.layout().tiles) {
        assert_eq!(command.rect(), Some(tile));
    }
}

#[test]
fn video_toggle_and_teardown() {
    let mut session = ready_session(1280, 720, 1);
    session.on_roster_changed(participants(1..=3));

    let commands = session.on_participant_updated(Participant::new(3, "user-3", false));
    // Video-off participants sort last; 3 was already last
    assert_eq!(commands, vec![RenderCommand::Stop { user_id: UserId(3) }]);

    let commands = session.teardown();
    assert_eq!(stopped(&commands), vec![2, 1]);
    assert!(session.engine().subscribed().is_empty());
}

#[tokio::test]
async fn failed_start_is_still_treated_as_subscribed() {
    let surface = Arc::new(RecordingSurface::failing_starts(vec![UserId(2)]));
    let dispatcher = CommandDispatcher::new(surface.clone(), tokio::runtime::Handle::current());
    let mut session = ready_session(1280, 720, 1);

    assert!(dispatcher.dispatch(session.on_roster_changed(participants(1..=2))));
    assert!(session.engine().is_subscribed(UserId(2)));
    assert!(!dispatcher.dispatch(session.on_roster_changed(participants(1..=2))));
    assert_eq!(dispatcher.finish().await, 1);

    let calls = surface.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], SurfaceCall::Start { user_id: UserId(2), .. }));
}

#[test]
fn demo_scenario_replays() {
    let json = include_str!("../../../demos/five_party_call.json");
    let scenario = Scenario::from_json(json).unwrap();
    let mut session = GallerySession::new(&Settings::default(), scenario.current_user).unwrap();
    let mut feed = SessionFeed::new();
    if let Some(viewport) = scenario.viewport {
        session.on_viewport_resized(viewport);
    }

    let mut all = Vec::new();
    for event in scenario.events {
        all.extend(event.apply(&mut session, &mut feed));
    }
    assert!(!all.is_empty());
    assert_eq!(session.visible()[1].user_id, UserId(3));
    assert_eq!(session.viewport(), Viewport::new(800, 300));
}

#[tokio::test]
async fn feed_snapshots_drive_an_ordered_dispatch() {
    let surface = Arc::new(RecordingSurface::new());
    let dispatcher = CommandDispatcher::new(surface.clone(), tokio::runtime::Handle::current());
    let mut session = GallerySession::new(&settings(1280, 720), UserId(1)).unwrap();
    let mut feed = SessionFeed::new();

    feed.publish_roster(participants(1..=3));
    feed.publish_decode_ready(true);
    dispatcher.dispatch(session.pump(&mut feed));

    feed.publish_roster(participants(1..=2));
    dispatcher.dispatch(session.pump(&mut feed));
    assert_eq!(dispatcher.finish().await, 0);

    let calls = surface.calls().await;
    let starts = calls
        .iter()
        .filter(|c| matches!(c, SurfaceCall::Start { .. }))
        .count();
    assert_eq!(starts, 3);
    assert_eq!(calls[3], SurfaceCall::Stop { user_id: UserId(3) });
}
