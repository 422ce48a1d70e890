use async_trait::async_trait;
use tracing::warn;

/// Outbound messaging capability. The engine only ever talks to a chat
/// platform through this seam, so tests drive it with an in-memory impl
/// and `run` ships a stdin/stdout demo.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Show a typing indicator; platforms without one just ignore it.
    async fn send_typing(&self, channel_id: &str) -> anyhow::Result<()>;

    /// Post a plain message to a channel.
    async fn send_message(&self, channel_id: &str, content: &str) -> anyhow::Result<()>;

    /// Post a message as a threaded reply to `message_id`.
    async fn reply_to_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> anyhow::Result<()>;

    /// Reply, falling back to a plain send when the reply reference is
    /// gone (deleted message, expired reference).
    async fn reply_with_fallback(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> anyhow::Result<()> {
        match self.reply_to_message(channel_id, message_id, content).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("reply to {message_id} failed ({e}), sending plain message");
                self.send_message(channel_id, content).await
            }
        }
    }
}

/// Demo channel that prints to stdout. Used by the `run` subcommand.
pub struct ConsoleChannel;

#[async_trait]
impl Channel for ConsoleChannel {
    async fn send_typing(&self, _channel_id: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> anyhow::Result<()> {
        println!("[{channel_id}] luana: {content}");
        Ok(())
    }

    async fn reply_to_message(
        &self,
        channel_id: &str,
        _message_id: &str,
        content: &str,
    ) -> anyhow::Result<()> {
        self.send_message(channel_id, content).await
    }
}
