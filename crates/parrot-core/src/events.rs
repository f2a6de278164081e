use crate::models::ConversationId;

/// A submission accepted by the conversation store, waiting for its
/// simulated reply. Captures the originating conversation id so the reply is
/// attributed to the conversation that asked, never to whichever one happens
/// to be active when the timer fires.
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub conversation: ConversationId,
    pub user_text: String,
    pub input_number: u64,
}

/// Commands sent from the UI to the core worker.
#[derive(Debug)]
pub enum CoreCommand {
    ScheduleReply(PendingReply),
    /// Change the simulated latency for replies scheduled from now on.
    /// Already-scheduled replies keep the delay they were scheduled with.
    SetReplyDelay(std::time::Duration),
    Shutdown,
}

/// Events flowing back from the core worker to the UI.
#[derive(Debug)]
pub enum CoreEvent {
    /// The simulated latency for a submission elapsed; the UI applies the
    /// echoed reply to the originating session.
    ReplyReady(PendingReply),
}
