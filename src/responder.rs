//! Inbound-message filter and auto-reply rule
//!
//! The rule itself knows nothing about grammers: it sees incoming messages
//! through the [`IncomingMessage`] trait and resolves the account's own id
//! through [`SelfIdentity`], so the live client and test doubles plug in
//! the same way.

use std::time::Duration;

use crate::error::Result;

/// Resolves the id of the account the session is authenticated as.
#[allow(async_fn_in_trait)]
pub trait SelfIdentity {
    async fn self_id(&self) -> Result<i64>;
}

/// One received message, with the capability to reply to it.
#[allow(async_fn_in_trait)]
pub trait IncomingMessage {
    /// Id of the account that sent the message.
    fn sender_id(&self) -> i64;

    /// Whether the message arrived in a multi-party chat rather than a
    /// one-to-one conversation.
    fn is_group_context(&self) -> bool;

    /// Send a text response correlated to this message.
    async fn reply(&self, text: &str) -> Result<()>;
}

/// What `handle` did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The reply was sent.
    Replied,
    /// The message did not match the rule.
    Ignored,
    /// The message matched but the send failed; the failure was logged
    /// and swallowed.
    ReplyFailed,
}

/// True when a message should be auto-answered: a direct message from the
/// target sender, and not one of our own.
pub fn eligible(sender_id: i64, is_group_context: bool, self_id: i64, target_user_id: i64) -> bool {
    !is_group_context && sender_id != self_id && sender_id == target_user_id
}

/// Replies with a fixed text to direct messages from one configured sender.
pub struct AutoResponder<I> {
    identity: I,
    target_user_id: i64,
    reply_text: String,
    reply_delay: Duration,
}

impl<I: SelfIdentity> AutoResponder<I> {
    pub fn new(
        identity: I,
        target_user_id: i64,
        reply_text: impl Into<String>,
        reply_delay: Duration,
    ) -> Self {
        Self {
            identity,
            target_user_id,
            reply_text: reply_text.into(),
            reply_delay,
        }
    }

    pub fn target_user_id(&self) -> i64 {
        self.target_user_id
    }

    /// Apply the rule to one message.
    ///
    /// The self id is looked up fresh on every call; a lookup failure
    /// propagates to the caller. A failed reply-send is logged and
    /// swallowed here so one bad send never stops the stream.
    pub async fn handle<M: IncomingMessage>(&self, msg: &M) -> Result<Outcome> {
        let self_id = self.identity.self_id().await?;

        if !eligible(
            msg.sender_id(),
            msg.is_group_context(),
            self_id,
            self.target_user_id,
        ) {
            return Ok(Outcome::Ignored);
        }

        match msg.reply(&self.reply_text).await {
            Ok(()) => {
                println!(
                    "[{}] Reply sent to direct chat with user {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    msg.sender_id()
                );
                tokio::time::sleep(self.reply_delay).await;
                Ok(Outcome::Replied)
            }
            Err(err) => {
                eprintln!(
                    "Failed to send reply to user {}: {}",
                    msg.sender_id(),
                    err
                );
                Ok(Outcome::ReplyFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;

    const TARGET: i64 = 1871247390;
    const SELF_ID: i64 = 42;
    const REPLY: &str = "I am away, answering later.";

    struct FixedIdentity(i64);

    impl SelfIdentity for FixedIdentity {
        async fn self_id(&self) -> Result<i64> {
            Ok(self.0)
        }
    }

    struct FailingIdentity;

    impl SelfIdentity for FailingIdentity {
        async fn self_id(&self) -> Result<i64> {
            Err(Error::TelegramError("AUTH_KEY_UNREGISTERED".into()))
        }
    }

    struct FakeMessage {
        sender_id: i64,
        is_group: bool,
        fail_send: bool,
        sent: Mutex<Vec<String>>,
    }

    impl FakeMessage {
        fn direct(sender_id: i64) -> Self {
            Self {
                sender_id,
                is_group: false,
                fail_send: false,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn group(sender_id: i64) -> Self {
            Self {
                is_group: true,
                ..Self::direct(sender_id)
            }
        }

        fn failing(sender_id: i64) -> Self {
            Self {
                fail_send: true,
                ..Self::direct(sender_id)
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl IncomingMessage for FakeMessage {
        fn sender_id(&self) -> i64 {
            self.sender_id
        }

        fn is_group_context(&self) -> bool {
            self.is_group
        }

        async fn reply(&self, text: &str) -> Result<()> {
            if self.fail_send {
                return Err(Error::TelegramError("CHAT_WRITE_FORBIDDEN".into()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn responder() -> AutoResponder<FixedIdentity> {
        AutoResponder::new(FixedIdentity(SELF_ID), TARGET, REPLY, Duration::ZERO)
    }

    #[test]
    fn eligibility_predicate_truth_table() {
        // direct message from the target
        assert!(eligible(TARGET, false, SELF_ID, TARGET));
        // group context never matches, even from the target
        assert!(!eligible(TARGET, true, SELF_ID, TARGET));
        // own messages never match, even when we are the target
        assert!(!eligible(SELF_ID, false, SELF_ID, SELF_ID));
        // sender mismatch
        assert!(!eligible(999, false, SELF_ID, TARGET));
    }

    #[tokio::test]
    async fn target_direct_message_gets_exactly_one_reply() {
        let msg = FakeMessage::direct(TARGET);
        let outcome = responder().handle(&msg).await.unwrap();

        assert_eq!(outcome, Outcome::Replied);
        assert_eq!(msg.sent(), vec![REPLY.to_string()]);
    }

    #[tokio::test]
    async fn group_message_from_target_is_ignored() {
        let msg = FakeMessage::group(TARGET);
        let outcome = responder().handle(&msg).await.unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert!(msg.sent().is_empty());
    }

    #[tokio::test]
    async fn own_messages_are_ignored() {
        let rule = AutoResponder::new(FixedIdentity(TARGET), TARGET, REPLY, Duration::ZERO);
        let msg = FakeMessage::direct(TARGET);
        let outcome = rule.handle(&msg).await.unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert!(msg.sent().is_empty());
    }

    #[tokio::test]
    async fn other_senders_are_ignored() {
        let msg = FakeMessage::direct(999);
        let outcome = responder().handle(&msg).await.unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert!(msg.sent().is_empty());
    }

    #[tokio::test]
    async fn send_failure_is_swallowed() {
        let msg = FakeMessage::failing(TARGET);
        let outcome = responder().handle(&msg).await.unwrap();

        assert_eq!(outcome, Outcome::ReplyFailed);
        assert!(msg.sent().is_empty());
    }

    #[tokio::test]
    async fn consecutive_eligible_messages_each_trigger_a_reply() {
        let rule = responder();

        let first = FakeMessage::direct(TARGET);
        let second = FakeMessage::direct(TARGET);

        assert_eq!(rule.handle(&first).await.unwrap(), Outcome::Replied);
        assert_eq!(rule.handle(&second).await.unwrap(), Outcome::Replied);

        assert_eq!(first.sent().len(), 1);
        assert_eq!(second.sent().len(), 1);
    }

    #[tokio::test]
    async fn identity_lookup_failure_propagates() {
        let rule = AutoResponder::new(FailingIdentity, TARGET, REPLY, Duration::ZERO);
        let msg = FakeMessage::direct(TARGET);

        let err = rule.handle(&msg).await.unwrap_err();
        assert!(matches!(err, Error::TelegramError(_)));
        assert!(msg.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn successful_reply_suspends_the_handler() {
        let rule = AutoResponder::new(
            FixedIdentity(SELF_ID),
            TARGET,
            REPLY,
            Duration::from_secs(1),
        );
        let msg = FakeMessage::direct(TARGET);

        let start = tokio::time::Instant::now();
        rule.handle(&msg).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn ineligible_message_does_not_suspend() {
        let rule = AutoResponder::new(
            FixedIdentity(SELF_ID),
            TARGET,
            REPLY,
            Duration::from_secs(1),
        );
        let msg = FakeMessage::direct(999);

        let start = tokio::time::Instant::now();
        rule.handle(&msg).await.unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
