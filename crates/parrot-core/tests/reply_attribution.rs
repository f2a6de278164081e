//! End-to-end check of the simulated-latency reply path: a reply is applied
//! to the conversation that asked, even when the user navigates away (or
//! deletes the conversation) before the timer fires.

use std::time::Duration;

use parrot_core::config::CoreConfig;
use parrot_core::events::{CoreCommand, CoreEvent};
use parrot_core::models::Role;
use parrot_core::store::ConversationStore;
use parrot_core::CoreRuntime;

#[tokio::test]
async fn reply_is_attributed_to_the_originating_conversation() {
    let mut store = ConversationStore::new();
    let mut runtime = CoreRuntime::new(CoreConfig::new(Duration::from_millis(10))).unwrap();
    let handle = runtime.handle();
    let mut data_rx = runtime.take_data_rx().unwrap();

    let origin = store.active();
    let pending = store.submit("Hello").unwrap();
    handle.send(CoreCommand::ScheduleReply(pending)).unwrap();

    // Navigate away before the timer fires
    let elsewhere = store.create_sub_chat(origin).unwrap();

    let event = tokio::time::timeout(Duration::from_secs(2), data_rx.recv())
        .await
        .expect("reply timer should fire")
        .expect("worker should be alive");
    let CoreEvent::ReplyReady(reply) = event;
    assert_eq!(reply.conversation, origin);

    store.apply_reply(&reply);

    let session = store.session(origin).unwrap();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[1].role, Role::Assistant);
    assert_eq!(session.messages[1].content, "Hello");
    assert!(session.agent_responses[0].contains("Hello"));
    assert!(store.session(elsewhere).unwrap().messages.is_empty());

    runtime.shutdown();
}

#[tokio::test]
async fn reply_for_a_deleted_conversation_is_dropped() {
    let mut store = ConversationStore::new();
    let mut runtime = CoreRuntime::new(CoreConfig::new(Duration::from_millis(10))).unwrap();
    let handle = runtime.handle();
    let mut data_rx = runtime.take_data_rx().unwrap();

    let root = store.active();
    let child = store.create_sub_chat(root).unwrap();
    let pending = store.submit("doomed").unwrap();
    handle.send(CoreCommand::ScheduleReply(pending)).unwrap();

    store.delete(child);

    let event = tokio::time::timeout(Duration::from_secs(2), data_rx.recv())
        .await
        .expect("reply timer should fire")
        .expect("worker should be alive");
    let CoreEvent::ReplyReady(reply) = event;
    store.apply_reply(&reply);

    assert!(store.session(child).is_none());
    assert!(store.session(root).unwrap().messages.is_empty());

    runtime.shutdown();
}

#[tokio::test]
async fn reply_delay_can_be_changed_at_runtime() {
    let mut store = ConversationStore::new();
    // Start with a delay far beyond the receive timeout
    let mut runtime = CoreRuntime::new(CoreConfig::new(Duration::from_secs(60))).unwrap();
    let handle = runtime.handle();
    let mut data_rx = runtime.take_data_rx().unwrap();

    handle
        .send(CoreCommand::SetReplyDelay(Duration::from_millis(10)))
        .unwrap();
    let pending = store.submit("quick now").unwrap();
    handle.send(CoreCommand::ScheduleReply(pending)).unwrap();

    let event = tokio::time::timeout(Duration::from_secs(2), data_rx.recv())
        .await
        .expect("reply should use the updated delay")
        .expect("worker should be alive");
    let CoreEvent::ReplyReady(reply) = event;
    assert_eq!(reply.user_text, "quick now");

    runtime.shutdown();
}
