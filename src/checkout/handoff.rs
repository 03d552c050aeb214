//! Messaging hand-off
//!
//! Orders leave the storefront as a pre-filled chat message: a `wa.me` deep
//! link carrying the URL-encoded text. Opening the link is someone else's job;
//! a [`HandOff`] only has to get it there.

use std::{fmt, io};

#[cfg(test)]
use mockall::automock;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;
use tracing::info;

/// Base of every deep link.
pub const DEEP_LINK_BASE: &str = "https://wa.me";

/// Characters left alone by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors delivering a hand-off link.
#[derive(Debug, Error)]
pub enum HandOffError {
    /// The channel refused or is unreachable.
    #[error("hand-off channel unavailable: {0}")]
    Unavailable(String),

    /// Writing the link failed.
    #[error("failed to write hand-off link: {0}")]
    Io(#[from] io::Error),
}

/// A deep link opening a chat with `recipient`, pre-filled with `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOffLink {
    recipient: String,
    message: String,
    url: String,
}

impl HandOffLink {
    /// Build a link. Non-digit characters are stripped from the recipient.
    pub fn new(recipient: &str, message: impl Into<String>) -> Self {
        let recipient: String = recipient.chars().filter(char::is_ascii_digit).collect();
        let message = message.into();
        let url = format!(
            "{DEEP_LINK_BASE}/{recipient}?text={}",
            utf8_percent_encode(&message, COMPONENT)
        );

        HandOffLink {
            recipient,
            message,
            url,
        }
    }

    /// Recipient phone number, international format, digits only.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Unencoded message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The full deep link.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for HandOffLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Delivers hand-off links to the messaging channel.
#[cfg_attr(test, automock)]
pub trait HandOff {
    /// Deliver one link.
    ///
    /// # Errors
    ///
    /// Returns a [`HandOffError`] if the link could not be delivered.
    fn deliver(&mut self, link: &HandOffLink) -> Result<(), HandOffError>;
}

impl<H: HandOff + ?Sized> HandOff for &mut H {
    fn deliver(&mut self, link: &HandOffLink) -> Result<(), HandOffError> {
        (**self).deliver(link)
    }
}

/// Writes each link on its own line, e.g. to a terminal for the user to open.
#[derive(Debug)]
pub struct WriterHandOff<W: io::Write> {
    out: W,
}

impl<W: io::Write> WriterHandOff<W> {
    /// Hand off to `out`.
    pub fn new(out: W) -> Self {
        WriterHandOff { out }
    }

    /// Return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> HandOff for WriterHandOff<W> {
    fn deliver(&mut self, link: &HandOffLink) -> Result<(), HandOffError> {
        writeln!(self.out, "{link}")?;
        self.out.flush()?;

        info!(recipient = link.recipient(), "hand-off link written");

        Ok(())
    }
}

/// Keeps every delivered link in memory.
#[derive(Debug, Default)]
pub struct Outbox {
    links: Vec<HandOffLink>,
}

impl Outbox {
    /// An empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links delivered so far, oldest first.
    #[must_use]
    pub fn links(&self) -> &[HandOffLink] {
        &self.links
    }
}

impl HandOff for Outbox {
    fn deliver(&mut self, link: &HandOffLink) -> Result<(), HandOffError> {
        self.links.push(link.clone());

        Ok(())
    }
}
