//! Best-effort notifications.
//!
//! An [`Announcer`] wraps a [`Notifier`] together with the channel resolved
//! once at the start of a run. Every failure here is logged and swallowed:
//! notifications never change the outcome of a run.

use emotesync_core::{ChannelId, WorkspaceId};

use crate::remote::{Channel, Notifier};

pub struct Announcer<'a, N: Notifier + ?Sized> {
    notifier: &'a N,
    channel: Option<Channel>,
}

impl<'a, N: Notifier + ?Sized> Announcer<'a, N> {
    /// Resolve the target channel; on failure the announcer is silent.
    pub fn resolve(notifier: &'a N, workspace: WorkspaceId, explicit: Option<ChannelId>) -> Self {
        let channel = match notifier.resolve_channel(workspace, explicit) {
            Ok(Some(channel)) => {
                tracing::debug!("notifications go to #{} ({})", channel.name, channel.id);
                Some(channel)
            }
            Ok(None) => {
                tracing::warn!("no notification channel found; messages will only be logged");
                None
            }
            Err(err) => {
                tracing::warn!("notification channel lookup failed: {err}");
                None
            }
        };
        Self { notifier, channel }
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    /// Send `text`; returns whether it was delivered.
    pub fn announce(&self, text: &str) -> bool {
        let Some(channel) = &self.channel else {
            tracing::info!("(not sent, no channel) {text}");
            return false;
        };
        match self.notifier.send(channel, text) {
            Ok(()) => {
                tracing::info!("sent to #{}: {text}", channel.name);
                true
            }
            Err(err) => {
                tracing::warn!("error sending to #{}: {err}", channel.name);
                false
            }
        }
    }
}

/// Start-of-run message.
pub fn initiated_text(season: &str) -> String {
    format!("**[OPERATION INITIATED]** Update Emotes for *'{season}'* in progress. Taking control...")
}

/// End-of-run summary message.
pub fn complete_text(created: usize, failed: usize) -> String {
    let mut text = format!(
        "**[OPERATION COMPLETE]** {created} emote asset(s) updated. Returning control to command."
    );
    if failed > 0 {
        text.push_str(&format!(" {failed} failed."));
    }
    text
}

/// Message sent when a run aborts before touching any emote.
pub fn aborted_text(season: &str, reason: &str) -> String {
    format!("**[OPERATION ABORTED]** Update Emotes for *'{season}'*: {reason}")
}
