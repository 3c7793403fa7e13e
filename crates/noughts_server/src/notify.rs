//! Move notifications for the player who has to respond.
//!
//! The service hands a [`Notification`] to a [`NotificationSink`] after a
//! move has been committed. Sinks never block and never fail the request:
//! [`LogNotifier`] just records it, [`QueueNotifier`] pushes it onto a
//! channel drained by [`deliver`], which renders an email and passes it to a
//! [`Mailer`].

use async_trait::async_trait;
use derive_getters::Getters;
use derive_more::{Display, Error};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};

/// Subject line of every move email.
pub const SUBJECT: &str = "Your move pending in tictactoe !";

/// What happened on the move that triggered a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    /// The game goes on.
    YourTurn,
    /// The move won the game.
    Win {
        /// Name of the winner.
        winner_name: String,
    },
    /// The move drew the game.
    Draw,
}

impl NotificationKind {
    /// Short state tag: `""`, `"win"` or `"draw"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::YourTurn => "",
            Self::Win { .. } => "win",
            Self::Draw => "draw",
        }
    }
}

/// A message for one player.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Notification {
    /// Recipient's name.
    recipient: String,
    /// Recipient's address, if they registered one.
    email: Option<String>,
    /// What happened.
    kind: NotificationKind,
}

impl Notification {
    /// Creates a notification.
    pub fn new(
        recipient: impl Into<String>,
        email: Option<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            email,
            kind,
        }
    }

    /// Shorthand for `self.kind().tag()`.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Email subject.
    pub fn subject(&self) -> &'static str {
        SUBJECT
    }

    /// Email body.
    pub fn body(&self) -> String {
        let mut body = String::from("Your opponent just made their move. Your turn ! ");
        match &self.kind {
            NotificationKind::Win { winner_name } => {
                body.push_str(&format!("Result: Game over ! {winner_name} wins"));
            }
            NotificationKind::Draw => body.push_str("Result: Game drawn"),
            NotificationKind::YourTurn => body.push_str("It is now your turn !"),
        }
        body
    }
}

/// Fire-and-forget destination for notifications.
pub trait NotificationSink: Send + Sync + 'static {
    /// Accepts a notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Sink that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    #[instrument(
        skip(self, notification),
        fields(recipient = %notification.recipient(), tag = notification.tag())
    )]
    fn notify(&self, notification: Notification) {
        info!(subject = notification.subject(), body = %notification.body(), "Notification");
    }
}

/// Sink feeding an unbounded channel.
#[derive(Debug, Clone)]
pub struct QueueNotifier {
    sender: UnboundedSender<Notification>,
}

impl QueueNotifier {
    /// Creates the sink and the receiver to hand to [`deliver`].
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for QueueNotifier {
    #[instrument(skip(self, notification), fields(recipient = %notification.recipient()))]
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            warn!("Notification queue closed; dropping notification");
        }
    }
}

/// Failure to hand an email to the outside world.
#[derive(Debug, Clone, Display, Error)]
#[display("Mail to {to} failed: {reason}")]
pub struct MailError {
    /// Recipient address.
    pub to: String,
    /// What went wrong.
    pub reason: String,
}

/// Sends rendered emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one email.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Mailer that logs instead of sending.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!(to, subject, body, "Email");
        Ok(())
    }
}

/// Drains the queue until every sender is dropped.
///
/// Recipients without an address are skipped. Returns the number of emails
/// handed to the mailer successfully.
#[instrument(skip_all)]
pub async fn deliver<M: Mailer>(mut receiver: UnboundedReceiver<Notification>, mailer: M) -> usize {
    let mut sent = 0;
    while let Some(notification) = receiver.recv().await {
        let Some(to) = notification.email() else {
            debug!(recipient = %notification.recipient(), "No email address; skipping");
            continue;
        };
        match mailer
            .send(to, notification.subject(), &notification.body())
            .await
        {
            Ok(()) => sent += 1,
            Err(e) => warn!(error = %e, "Notification delivery failed"),
        }
    }
    info!(sent, "Notification queue closed");
    sent
}
