// Terminal event loop: crossterm events, core worker events, and a fixed
// tick, multiplexed with select. Draws once per iteration.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;

use parrot_core::events::CoreEvent;

use crate::input;
use crate::render::render;
use crate::ui::{App, Tui};

const TICK_MS: u64 = 50;

pub async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    mut data_rx: UnboundedReceiver<CoreEvent>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(TICK_MS));

    loop {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        input::handle_key(app, key);
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        input::handle_mouse(app, mouse);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("terminal event error: {}", e);
                    }
                    None => break,
                }
            }
            Some(event) = data_rx.recv() => {
                app.handle_core_event(event);
            }
            _ = tick.tick() => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
