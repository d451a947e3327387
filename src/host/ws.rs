//! Short-lived WebSocket exchanges: connect, authenticate, send one command,
//! read its result, close.

use anyhow::{Context, Result};
use futures_util::{SinkExt, Stream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

use super::HassClient;
use super::types::WsMessage;

const COMMAND_ID: u64 = 1;

impl HassClient {
    pub(super) async fn ws_command(&self, command: serde_json::Value) -> Result<serde_json::Value> {
        tokio::time::timeout(self.timeout, self.ws_exchange(command))
            .await
            .context("timeout waiting for websocket result")?
    }

    async fn ws_exchange(&self, mut command: serde_json::Value) -> Result<serde_json::Value> {
        let url = self.websocket_url();
        let (stream, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("websocket connect {}", url))?;
        let (mut write, mut read) = stream.split();

        let hello = next_message(&mut read).await?;
        if hello.kind != "auth_required" {
            anyhow::bail!("unexpected websocket greeting {:?}", hello.kind);
        }

        let auth = serde_json::json!({ "type": "auth", "access_token": self.token });
        write
            .send(Message::Text(auth.to_string()))
            .await
            .context("send websocket auth")?;
        let reply = next_message(&mut read).await?;
        match reply.kind.as_str() {
            "auth_ok" => {}
            "auth_invalid" => anyhow::bail!(
                "unauthorized (token invalid/expired: {})",
                reply.message.unwrap_or_default()
            ),
            other => anyhow::bail!("unexpected websocket auth reply {:?}", other),
        }

        command["id"] = serde_json::json!(COMMAND_ID);
        debug!("ws -> {}", command);
        write
            .send(Message::Text(command.to_string()))
            .await
            .context("send websocket command")?;

        let result = loop {
            let msg = next_message(&mut read).await?;
            if msg.id != Some(COMMAND_ID) || msg.kind != "result" {
                continue;
            }
            if msg.success == Some(true) {
                break msg.result.unwrap_or(serde_json::Value::Null);
            }
            let err = msg.error.map(|e| format!("{}: {}", e.code, e.message));
            anyhow::bail!(
                "websocket command failed ({})",
                err.unwrap_or_else(|| "no error detail".to_string())
            );
        };

        let _ = write.send(Message::Close(None)).await;
        Ok(result)
    }
}

async fn next_message<S>(read: &mut S) -> Result<WsMessage>
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg) = read.next().await {
        match msg.context("websocket read")? {
            Message::Text(text) => {
                return serde_json::from_str(&text).context("parse websocket message");
            }
            Message::Close(_) => anyhow::bail!("websocket closed by host"),
            _ => continue,
        }
    }
    anyhow::bail!("websocket ended without a response")
}
