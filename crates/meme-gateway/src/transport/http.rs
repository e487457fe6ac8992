//! `ChatTransport` over the platform's REST API

use std::time::Duration;

use async_trait::async_trait;
use meme_common::{AppConfig, AppError, AppResult};
use meme_core::{Attachment, ChatMessage, ChatTransport, DomainError, RepoResult, Snowflake, Vote};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{debug, instrument};

use super::models::{ChannelResponse, CreateMessageRequest, MessageResponse};

/// Path prefix of every REST route
const API_PREFIX: &str = "api/v1";

/// REST client implementing [`ChatTransport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_root: Url,
}

impl HttpTransport {
    /// Create a transport for `base_url` that authenticates with `token`
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> AppResult<Self> {
        let api_root = Url::parse(&format!("{}/{API_PREFIX}", base_url.trim_end_matches('/')))
            .map_err(|e| AppError::Transport(format!("invalid API base URL {base_url:?}: {e}")))?;
        if api_root.cannot_be_a_base() {
            return Err(AppError::Transport(format!(
                "API base URL {base_url:?} cannot carry a path"
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AppError::Transport(format!("invalid bot token: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Transport(e.to_string()))?;

        Ok(Self { client, api_root })
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(
            &config.api.base_url,
            &config.bot.token,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    /// URL of a route below `/api/v1`; segments are percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn create_message(
        &self,
        channel_id: Snowflake,
        body: &CreateMessageRequest,
    ) -> RepoResult<Snowflake> {
        let channel = channel_id.to_string();
        let response = self
            .client
            .post(self.endpoint(&["channels", &channel, "messages"]))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let message: MessageResponse = expect_success(response, "create message")
            .await?
            .json()
            .await
            .map_err(transport_error)?;
        Ok(message.id)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    #[instrument(skip(self, attachment), fields(attachment_id = %attachment.id))]
    async fn post_attachment(
        &self,
        channel_id: Snowflake,
        attachment: &Attachment,
        caption: Option<&str>,
    ) -> RepoResult<Snowflake> {
        let id = self
            .create_message(channel_id, &CreateMessageRequest::repost(attachment, caption))
            .await?;
        debug!(message_id = %id, "Attachment reposted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        vote: Vote,
    ) -> RepoResult<()> {
        let (channel, message) = (channel_id.to_string(), message_id.to_string());
        let url = self.endpoint(&[
            "channels",
            &channel,
            "messages",
            &message,
            "reactions",
            vote.symbol(),
            "@me",
        ]);

        let response = self.client.put(url).send().await.map_err(transport_error)?;
        expect_success(response, "add reaction").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RepoResult<()> {
        let (channel, message) = (channel_id.to_string(), message_id.to_string());
        let response = self
            .client
            .delete(self.endpoint(&["channels", &channel, "messages", &message]))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => Err(DomainError::RetractionFailed {
                post_id: message_id,
                reason: format!("platform answered {}", response.status()),
            }),
            _ => expect_success(response, "delete message").await.map(|_| ()),
        }
    }

    #[instrument(skip(self, content))]
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RepoResult<Snowflake> {
        self.create_message(channel_id, &CreateMessageRequest::text(content))
            .await
    }

    #[instrument(skip(self))]
    async fn previous_message(
        &self,
        channel_id: Snowflake,
        before: Snowflake,
    ) -> RepoResult<Option<ChatMessage>> {
        let channel = channel_id.to_string();
        let mut url = self.endpoint(&["channels", &channel, "messages"]);
        url.query_pairs_mut()
            .append_pair("before", &before.to_string())
            .append_pair("limit", "1");

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let messages: Vec<MessageResponse> = expect_success(response, "fetch messages")
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        Ok(messages.into_iter().next().map(ChatMessage::from))
    }

    #[instrument(skip(self))]
    async fn channel_name(&self, channel_id: Snowflake) -> RepoResult<Option<String>> {
        let channel = channel_id.to_string();
        let response = self
            .client
            .get(self.endpoint(&["channels", &channel]))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let channel: ChannelResponse = expect_success(response, "fetch channel")
            .await?
            .json()
            .await
            .map_err(transport_error)?;
        Ok(channel.name)
    }
}

fn transport_error(e: reqwest::Error) -> DomainError {
    DomainError::TransportError(e.to_string())
}

async fn expect_success(response: Response, action: &str) -> RepoResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DomainError::TransportError(format!(
        "{action} failed with {status}: {body}"
    )))
}
