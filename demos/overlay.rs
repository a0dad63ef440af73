//! Drives the debugger the way a host application would.
//!
//! Run with `RUST_LOG=debug cargo run --example overlay`.

use std::time::Duration;

use async_trait::async_trait;
use lantern::prelude::*;
use tracing_subscriber::EnvFilter;

/// Prints what a list view would show.
struct ConsoleSurface;

impl ListSurface for ConsoleSurface {
    fn register_item_template(&mut self, identifier: &str) {
        tracing::info!(identifier, "template registered");
    }

    fn set_estimated_row_height(&mut self, height: f32) {
        tracing::info!(height, "row height set");
    }

    fn update_data_source(&mut self, store: &CategoryStore) {
        println!("── {} ({} items)", store.category(), store.len());
        for item in store.iter() {
            println!("   {}", item.title());
        }
    }

    fn update_delegate(&mut self, _store: &CategoryStore) {}

    fn highlight_filter(&mut self, filter: Category) {
        tracing::info!(filter = %filter, "filter highlighted");
    }
}

/// Accepts every confirmation.
struct AlwaysYes;

#[async_trait]
impl ConfirmationPrompt for AlwaysYes {
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmOption {
        println!("? {} -> Yes", request.title);
        ConfirmOption::Yes
    }
}

fn analytics(name: &str, created_at: &str) -> Payload {
    let mut payload = Payload::new();
    payload.insert("eventName".into(), name.into());
    payload.insert("createdAt".into(), created_at.into());
    payload.insert("screenName".into(), "demo".into());
    payload
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dir = std::env::temp_dir().join("lantern-overlay-demo");
    let config = LanternConfig::new()
        .with_storage_dir(&dir)
        .with_flags_file(dir.join("flags.toml"))
        .with_refresh_delay(Duration::from_millis(200));

    let debugger = Debugger::new(config)?.with_host(HostMetadata::new("1.0.0", "1", "demo-host"));
    debugger.set_enabled(true);

    let mut events = debugger.subscribe();
    let mut presenter = debugger.presenter(ConsoleSurface);
    presenter.on_load();

    debugger.emit("analytics-received", &analytics("open", "2018-04-10T10:00:00+0200"));
    debugger.emit("analytics-received", &analytics("close", "2018-04-10T10:05:00+0200"));
    debugger.emit("analytics-received", &analytics("tap", "2018-04-10T10:02:00+0200"));

    // Let the debounced refresh fire.
    tokio::time::sleep(Duration::from_millis(300)).await;
    while let Ok(event) = events.try_recv() {
        presenter.handle_event(&event);
        if let Some(counts) = event.counts() {
            for count in counts {
                println!("   {}: {}", count.category, count.count);
            }
        }
    }

    let settings = debugger.settings();
    for section in 0..settings.number_of_sections() {
        for item in 0..settings.number_of_items(section) {
            let entry = settings.entry(section, item)?;
            println!("[{section}.{item}] {} on={}", entry.title, entry.is_on);
        }
    }

    debugger.on_app_backgrounded();
    println!("{}", debugger.data().export_json()?);

    // Remove analytics (section 3, item 2) after confirming.
    settings.select(3, 2, &AlwaysYes).await?;
    presenter.set_filter(Category::Analytics);

    debugger.on_app_terminating();
    Ok(())
}
