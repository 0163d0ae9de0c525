use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vgrid_client::media::{CommandDispatcher, LoggingSurface};
use vgrid_client::scenario::Scenario;
use vgrid_client::state::{GallerySession, SessionFeed, Settings};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vgrid=debug,vgrid_client=debug,vgrid_layout=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_path = args
        .next()
        .context("Usage: vgrid <scenario.json> [settings.json]")?;
    let settings_path = args.next();

    let settings = Settings::load(settings_path.as_deref().map(Path::new))?;
    let scenario = Scenario::from_file(Path::new(&scenario_path))?;

    tracing::info!(
        "Replaying {} events from {} as user {}",
        scenario.events.len(),
        scenario_path,
        scenario.current_user
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let dispatcher = CommandDispatcher::new(Arc::new(LoggingSurface), runtime.handle().clone());
    let mut session = GallerySession::new(&settings, scenario.current_user)?;
    let mut feed = SessionFeed::new();

    if let Some(viewport) = scenario.viewport {
        dispatcher.dispatch(session.on_viewport_resized(viewport));
    }

    for event in scenario.events {
        tracing::debug!("Event: {:?}", event);
        let commands = event.apply(&mut session, &mut feed);
        for command in &commands {
            tracing::info!("{}", serde_json::to_string(command)?);
        }
        dispatcher.dispatch(commands);
    }

    dispatcher.dispatch(session.teardown());

    // Let outstanding surface calls finish before exiting
    let failed = runtime.block_on(dispatcher.finish());
    if failed > 0 {
        tracing::warn!("{} surface calls failed", failed);
    }

    Ok(())
}
