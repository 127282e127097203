//! Blocking Discord REST client.

use std::time::Duration;

use serde::de::DeserializeOwned;

use emotesync_core::{ChannelId, EmoteId, RemoteEmote, WorkspaceId};
use emotesync_sync::{Channel, Notifier, RemoteEmoteStore, RemoteError, Workspace};

use crate::api::{self, ApiChannel, ApiEmoji, ApiGuild, CreateEmoji, CreateMessage};
use crate::error::from_ureq;
use crate::image::data_uri;

/// Discord REST API root.
pub const API_BASE: &str = "https://discord.com/api/v10";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// URL-encoded audit log reason attached to emoji mutations.
const AUDIT_LOG_REASON: &str = "Updating%20emote%20asset";

/// Bot-token client for one Discord application.
///
/// The REST API is stateless; there is no gateway session to open or close.
pub struct DiscordClient {
    agent: ureq::Agent,
    base_url: String,
    auth: String,
}

impl DiscordClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, API_BASE)
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("DiscordBot (emotesync, ", env!("CARGO_PKG_VERSION"), ")"))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: format!("Bot {token}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &self.url(path))
            .set("Authorization", &self.auth)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        tracing::debug!("GET {path}");
        let response = self.request("GET", path).call().map_err(from_ureq)?;
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, RemoteError> {
    response
        .into_json()
        .map_err(|e| RemoteError::Transport(format!("invalid response body: {e}")))
}

// ---------------------------------------------------------------------------
// RemoteEmoteStore
// ---------------------------------------------------------------------------

impl RemoteEmoteStore for DiscordClient {
    fn workspace(&self, workspace: WorkspaceId) -> Result<Workspace, RemoteError> {
        let guild: ApiGuild = self.get(&format!("/guilds/{workspace}"))?;
        Ok(guild.into_workspace(workspace))
    }

    fn list(&self, workspace: WorkspaceId) -> Result<Vec<RemoteEmote>, RemoteError> {
        let emojis: Vec<ApiEmoji> = self.get(&format!("/guilds/{workspace}/emojis"))?;
        Ok(emojis.into_iter().filter_map(ApiEmoji::into_remote).collect())
    }

    fn delete(&self, workspace: WorkspaceId, emote: &EmoteId) -> Result<(), RemoteError> {
        let path = format!("/guilds/{workspace}/emojis/{emote}");
        tracing::debug!("DELETE {path}");
        self.request("DELETE", &path)
            .set("X-Audit-Log-Reason", AUDIT_LOG_REASON)
            .call()
            .map_err(from_ureq)?;
        Ok(())
    }

    fn create(
        &self,
        workspace: WorkspaceId,
        name: &str,
        bytes: &[u8],
    ) -> Result<RemoteEmote, RemoteError> {
        let body = CreateEmoji {
            name,
            image: data_uri(name, bytes)?,
            roles: Vec::new(),
        };
        let path = format!("/guilds/{workspace}/emojis");
        tracing::debug!("POST {path} ({name}, {} bytes)", bytes.len());
        let response = self
            .request("POST", &path)
            .set("X-Audit-Log-Reason", AUDIT_LOG_REASON)
            .send_json(&body)
            .map_err(from_ureq)?;
        let emoji: ApiEmoji = decode(response)?;
        emoji.into_remote().ok_or_else(|| RemoteError::Api {
            status: 200,
            message: format!("created emoji '{name}' came back without id or name"),
        })
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

impl Notifier for DiscordClient {
    fn resolve_channel(
        &self,
        workspace: WorkspaceId,
        explicit: Option<ChannelId>,
    ) -> Result<Option<Channel>, RemoteError> {
        if let Some(id) = explicit {
            match self.get::<ApiChannel>(&format!("/channels/{id}")) {
                Ok(channel) => return Ok(channel.into_channel()),
                Err(err) => {
                    tracing::warn!("configured channel {id} not usable ({err}); trying #general")
                }
            }
        }
        let channels: Vec<ApiChannel> = self.get(&format!("/guilds/{workspace}/channels"))?;
        Ok(api::pick_general(channels))
    }

    fn send(&self, channel: &Channel, text: &str) -> Result<(), RemoteError> {
        let path = format!("/channels/{}/messages", channel.id);
        tracing::debug!("POST {path}");
        self.request("POST", &path)
            .send_json(CreateMessage { content: text })
            .map_err(from_ureq)?;
        Ok(())
    }
}
