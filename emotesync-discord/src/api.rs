//! Wire types for the subset of the Discord API this crate uses.

use serde::{Deserialize, Serialize};

use emotesync_core::{ChannelId, EmoteId, RemoteEmote, WorkspaceId};
use emotesync_sync::{remote::DEFAULT_CHANNEL_NAME, Channel, Workspace};

/// Discord channel type for a guild text channel.
pub const GUILD_TEXT: u8 = 0;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGuild {
    pub id: String,
    pub name: String,
}

impl ApiGuild {
    pub fn into_workspace(self, requested: WorkspaceId) -> Workspace {
        Workspace {
            id: self.id.parse().unwrap_or(requested),
            name: self.name,
        }
    }
}

/// Emoji object. `id`/`name` are nullable in the general schema.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEmoji {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ApiEmoji {
    pub fn into_remote(self) -> Option<RemoteEmote> {
        Some(RemoteEmote {
            id: EmoteId(self.id?),
            name: self.name?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiChannel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
}

impl ApiChannel {
    pub fn into_channel(self) -> Option<Channel> {
        Some(Channel {
            id: ChannelId(self.id.parse().ok()?),
            name: self.name.unwrap_or_default(),
        })
    }
}

/// The text channel named `general`, if the guild has one.
pub fn pick_general(channels: Vec<ApiChannel>) -> Option<Channel> {
    channels
        .into_iter()
        .filter(|c| c.kind == GUILD_TEXT)
        .find(|c| c.name.as_deref() == Some(DEFAULT_CHANNEL_NAME))
        .and_then(ApiChannel::into_channel)
}

/// JSON error body returned with 4xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    /// Seconds, present on 429 responses.
    #[serde(default)]
    pub retry_after: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateEmoji<'a> {
    pub name: &'a str,
    /// `data:<mime>;base64,<payload>`
    pub image: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateMessage<'a> {
    pub content: &'a str,
}
