use async_trait::async_trait;
use tokio::sync::Mutex;

/// Fire-and-forget text sink for exports.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: String);
}

/// Keeps the last written text so the page can show it.
#[derive(Debug, Default)]
pub struct SharedClipboard {
    contents: Mutex<Option<String>>,
}

impl SharedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read_text(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl Clipboard for SharedClipboard {
    async fn write_text(&self, text: String) {
        *self.contents.lock().await = Some(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins() {
        let clipboard = SharedClipboard::new();
        assert_eq!(clipboard.read_text().await, None);
        clipboard.write_text("first".into()).await;
        clipboard.write_text("second".into()).await;
        assert_eq!(clipboard.read_text().await.as_deref(), Some("second"));
    }
}
