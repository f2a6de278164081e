//! In-process broadcast bus.
//!
//! Deeply nested emitters (a text selection inside a message, a floating
//! overlay) reach top-level state owners (notes store, overlay manager)
//! without threading callbacks through every layer. The catalog is a closed,
//! typed enum - no stringly-typed signal names. Delivery is one-to-many in
//! subscriber registration order; that ordering is part of the contract.

use std::sync::mpsc::{channel, Receiver, Sender};

use uuid::Uuid;

/// Transient highlight payload carried by highlight signals. Never persisted;
/// it exists only while a floating highlight card is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPayload {
    pub id: Uuid,
    pub text: String,
}

impl HighlightPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Re-populate the main input with a question and auto-submit it
    AskQuestion { question: String },
    /// A reply submitted from a highlight card. Ignored by the chat thread
    /// when `in_card` is true, so in-overlay answers don't also post there.
    HighlightReply {
        highlight_id: Uuid,
        highlight_text: String,
        reply_text: String,
        in_card: bool,
    },
    /// Append a context-addition message pair to the chat thread
    AddToContext {
        highlight_id: Uuid,
        highlight_text: String,
        add_text: String,
    },
    /// Persist a highlight into the notes store
    StoreHighlight {
        highlight_id: Uuid,
        highlight_text: String,
    },
    /// Spawn a floating highlight card
    CreateHighlight { highlight: HighlightPayload },
    /// Replace the floating highlight card with a branched one
    CreateBranchedHighlight { highlight: HighlightPayload },
    /// Spawn a floating sticky note
    CreateStickyNote { text: String, is_editable: bool },
    /// Persist a sticky note's text into the notes store
    StickyNoteToStorage {
        id: Uuid,
        text: String,
        title: Option<String>,
    },
    CreateQuestionPopup,
    CreateClarificationPopup,
    /// Generic note creation (used by the highlight flow)
    StoreText { text: String, source: String },
}

/// One-to-many fan-out over std mpsc channels. Subscribers that dropped
/// their receiver are pruned on the next publish.
#[derive(Default)]
pub struct SignalBus {
    subscribers: Vec<Sender<Signal>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<Signal> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber in registration order.
    pub fn publish(&mut self, signal: Signal) {
        tracing::debug!(?signal, "publish");
        self.subscribers
            .retain(|tx| tx.send(signal.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_to_all_subscribers() {
        let mut bus = SignalBus::new();
        let rx_a = bus.subscribe();
        let rx_b = bus.subscribe();

        bus.publish(Signal::CreateQuestionPopup);

        assert_eq!(rx_a.try_recv().unwrap(), Signal::CreateQuestionPopup);
        assert_eq!(rx_b.try_recv().unwrap(), Signal::CreateQuestionPopup);
    }

    #[test]
    fn test_delivery_preserves_publish_order() {
        let mut bus = SignalBus::new();
        let rx = bus.subscribe();

        bus.publish(Signal::CreateQuestionPopup);
        bus.publish(Signal::CreateClarificationPopup);

        assert_eq!(rx.try_recv().unwrap(), Signal::CreateQuestionPopup);
        assert_eq!(rx.try_recv().unwrap(), Signal::CreateClarificationPopup);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut bus = SignalBus::new();
        let rx = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(Signal::CreateQuestionPopup);

        assert_eq!(bus.subscriber_count(), 1);
        assert!(rx.try_recv().is_ok());
    }
}
