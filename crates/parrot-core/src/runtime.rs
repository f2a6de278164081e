//! Core worker runtime.
//!
//! The UI thread owns the stores; the worker thread owns time. Accepted
//! submissions are handed over as `CoreCommand::ScheduleReply`; after the
//! configured delay the worker emits `CoreEvent::ReplyReady` carrying the
//! originating conversation id, and the UI applies it to the store. The
//! triggering action returns immediately, preserving the loading-state
//! choreography of a real backend call without one.

use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::config::CoreConfig;
use crate::events::{CoreCommand, CoreEvent};

#[derive(Clone)]
pub struct CoreHandle {
    command_tx: UnboundedSender<CoreCommand>,
}

impl CoreHandle {
    pub fn send(&self, command: CoreCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| anyhow::anyhow!("core worker has shut down"))
    }
}

pub struct CoreRuntime {
    handle: CoreHandle,
    data_rx: Option<UnboundedReceiver<CoreEvent>>,
    worker_handle: Option<JoinHandle<()>>,
}

impl CoreRuntime {
    pub fn new(config: CoreConfig) -> Result<Self> {
        let (command_tx, command_rx) = unbounded_channel::<CoreCommand>();
        let (data_tx, data_rx) = unbounded_channel::<CoreEvent>();

        let delay = config.reply_delay;
        let worker_handle = std::thread::spawn(move || {
            worker_loop(command_rx, data_tx, delay);
        });

        Ok(Self {
            handle: CoreHandle { command_tx },
            data_rx: Some(data_rx),
            worker_handle: Some(worker_handle),
        })
    }

    pub fn handle(&self) -> CoreHandle {
        self.handle.clone()
    }

    pub fn take_data_rx(&mut self) -> Option<UnboundedReceiver<CoreEvent>> {
        self.data_rx.take()
    }

    pub fn shutdown(&mut self) {
        let _ = self.handle.send(CoreCommand::Shutdown);
        if let Some(worker_handle) = self.worker_handle.take() {
            let _ = worker_handle.join();
        }
    }
}

fn worker_loop(
    mut command_rx: UnboundedReceiver<CoreCommand>,
    data_tx: UnboundedSender<CoreEvent>,
    mut delay: Duration,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::warn!("core worker failed to start: {}", e);
            return;
        }
    };

    runtime.block_on(async move {
        while let Some(command) = command_rx.recv().await {
            match command {
                CoreCommand::ScheduleReply(pending) => {
                    tracing::debug!(
                        conversation = %pending.conversation,
                        input_number = pending.input_number,
                        "scheduling reply"
                    );
                    let data_tx = data_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        // Receiver gone means the app is exiting
                        let _ = data_tx.send(CoreEvent::ReplyReady(pending));
                    });
                }
                CoreCommand::SetReplyDelay(new_delay) => {
                    tracing::debug!(delay_ms = new_delay.as_millis() as u64, "reply delay changed");
                    delay = new_delay;
                }
                CoreCommand::Shutdown => break,
            }
        }
    });
}
