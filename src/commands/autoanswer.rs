//! Auto-answer command
//!
//! Watches the live update stream and answers direct messages from the
//! configured sender with the fixed reply text. Runs until Ctrl+C or
//! until the update stream disconnects.

use std::time::Duration;

use grammers_client::client::UpdatesConfiguration;
use grammers_client::types::peer::Peer;
use grammers_client::types::update::Update;
use grammers_client::types::Message;
use grammers_client::Client;
use tokio::signal;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::responder::{AutoResponder, IncomingMessage, SelfIdentity};
use crate::session::{get_client, SessionLock};

/// Self-identity lookup backed by the live client.
///
/// Queried fresh on every message so the rule never compares against a
/// stale account id.
struct ClientIdentity<'a> {
    client: &'a Client,
}

impl SelfIdentity for ClientIdentity<'_> {
    async fn self_id(&self) -> Result<i64> {
        let me = self
            .client
            .get_me()
            .await
            .map_err(|e| Error::TelegramError(e.to_string()))?;
        Ok(me.raw.id())
    }
}

/// A live update message seen through the responder's event interface.
struct LiveMessage<'a> {
    msg: &'a Message,
}

impl IncomingMessage for LiveMessage<'_> {
    fn sender_id(&self) -> i64 {
        extract_sender_id(self.msg)
    }

    fn is_group_context(&self) -> bool {
        // A one-to-one conversation is the one whose peer is the sending
        // user itself; anything else (groups, channels, anonymous senders)
        // counts as a multi-party context.
        match self.msg.sender() {
            Some(sender @ Peer::User(_)) => sender.id() != self.msg.peer_id(),
            _ => true,
        }
    }

    async fn reply(&self, text: &str) -> Result<()> {
        self.msg
            .reply(text)
            .await
            .map_err(|e| Error::TelegramError(e.to_string()))?;
        Ok(())
    }
}

fn extract_sender_id(msg: &Message) -> i64 {
    msg.sender()
        .map(|s| match s {
            Peer::User(u) => u.raw.id(),
            Peer::Group(g) => match &g.raw {
                grammers_tl_types::enums::Chat::Empty(c) => c.id,
                grammers_tl_types::enums::Chat::Chat(c) => c.id,
                grammers_tl_types::enums::Chat::Forbidden(c) => c.id,
                grammers_tl_types::enums::Chat::Channel(c) => c.id,
                grammers_tl_types::enums::Chat::ChannelForbidden(c) => c.id,
            },
            Peer::Channel(c) => c.raw.id,
        })
        .unwrap_or(0)
}

pub async fn run(target_override: Option<i64>, reply_override: Option<String>) -> Result<()> {
    let config = Config::new();

    let target_user_id = target_override.unwrap_or(config.target_user_id);
    if target_user_id == 0 {
        return Err(Error::InvalidArgument(
            "target user id is not configured (set responder.target_user_id or pass --target)"
                .to_string(),
        ));
    }

    let reply_text = reply_override.unwrap_or(config.reply_text);
    if reply_text.is_empty() {
        return Err(Error::InvalidArgument(
            "reply text is not configured (set responder.reply_text or pass --reply)".to_string(),
        ));
    }

    let reply_delay = Duration::from_secs(config.reply_delay_secs);

    // Acquire session lock
    let _lock = SessionLock::acquire()?;

    // Connect to Telegram
    let mut client = get_client().await?;

    let updates_rx = client.take_updates().ok_or_else(|| {
        Error::TelegramError("Updates stream already taken. Restart the command.".into())
    })?;

    let mut updates = client.stream_updates(
        updates_rx,
        UpdatesConfiguration {
            catch_up: false,
            ..Default::default()
        },
    );

    info!(target_user_id, "Connected, watching the update stream");

    let responder = AutoResponder::new(
        ClientIdentity {
            client: &client.client,
        },
        target_user_id,
        reply_text,
        reply_delay,
    );

    println!(
        "Client started. Waiting for direct messages from user {}...",
        target_user_id
    );
    println!("Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                println!("\nStopping auto-responder...");
                break;
            }
            update = updates.next() => {
                match update {
                    Ok(Update::NewMessage(msg)) => {
                        // Only incoming messages feed the rule; our own
                        // outgoing ones never do.
                        if msg.outgoing() {
                            continue;
                        }
                        responder.handle(&LiveMessage { msg: &msg }).await?;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        eprintln!("Update stream error: {}", err);
                        break;
                    }
                }
            }
        }
    }

    updates.sync_update_state();
    Ok(())
}
