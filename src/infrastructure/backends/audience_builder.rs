#[cfg(test)]
#[path = "audience_builder_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::models::Backend;
use crate::domain::models::ChatReply;
use crate::domain::models::SendRequest;
use crate::domain::models::SessionStart;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StartResponse {
    conversation_id: Option<String>,
    response: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatRequest {
    message: String,
    conversation_id: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatResponse {
    response: Option<String>,
    conversation_id: Option<String>,
    error: Option<String>,
}

/// HTTP client for the Audience Builder chat API.
pub struct AudienceBuilder {
    client: reqwest::Client,
    url: String,
}

impl AudienceBuilder {
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<AudienceBuilder> {
        let mut builder = reqwest::Client::builder();
        if let Some(duration) = timeout {
            builder = builder.timeout(duration);
        }

        return Ok(AudienceBuilder {
            client: builder.build()?,
            url: url.trim_end_matches('/').to_string(),
        });
    }
}

#[async_trait]
impl Backend for AudienceBuilder {
    #[allow(clippy::implicit_return)]
    async fn start_session(&self) -> Result<SessionStart> {
        let res = self
            .client
            .get(format!("{url}/chat/start", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to start a chat session"
            );
            bail!("Failed to start a chat session");
        }

        let body = res.json::<StartResponse>().await?;
        let conversation_id = body
            .conversation_id
            .ok_or_else(|| return anyhow!("Chat session response is missing conversation_id"))?;
        let greeting = body
            .response
            .ok_or_else(|| return anyhow!("Chat session response is missing response"))?;

        return Ok(SessionStart {
            conversation_id,
            greeting,
        });
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&self, request: &SendRequest) -> Result<ChatReply> {
        let req = ChatRequest {
            message: request.text.to_string(),
            conversation_id: request.conversation_id.clone(),
        };

        let res = self
            .client
            .post(format!("{url}/chat", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                seq = request.seq,
                status = res.status().as_u16(),
                "Failed to make chat request"
            );
            bail!("Failed to make chat request");
        }

        let body = res.json::<ChatResponse>().await?;

        // The API answers unknown conversations with a 200 and an error field.
        if let Some(err) = body.error {
            bail!(format!("Chat API returned an error: {err}"));
        }

        let text = body
            .response
            .ok_or_else(|| return anyhow!("Chat response is missing response"))?;

        return Ok(ChatReply {
            text,
            conversation_id: body.conversation_id,
        });
    }
}
