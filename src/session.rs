use std::{collections::HashMap, sync::Arc};

use teloxide::types::ChatId;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    AwaitingQuery,
}

/// Состояние диалогов: chat_id -> режим. Только в памяти, после рестарта все в Idle.
/// В карте лежат лишь чаты, которые сейчас ждут запрос.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<ChatId, SessionMode>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, chat: ChatId) -> SessionMode {
        let guard = self.inner.read().await;
        guard.get(&chat).copied().unwrap_or_default()
    }

    pub async fn set(&self, chat: ChatId, mode: SessionMode) {
        let mut guard = self.inner.write().await;
        match mode {
            SessionMode::Idle => {
                guard.remove(&chat);
            }
            other => {
                guard.insert(chat, other);
            }
        }
    }

    pub async fn clear(&self, chat: ChatId) {
        self.inner.write().await.remove(&chat);
    }

    /// Прочитать и сбросить под одним локом: два параллельных сообщения
    /// одного чата не запустят два поиска.
    pub async fn take(&self, chat: ChatId) -> SessionMode {
        let mut guard = self.inner.write().await;
        guard.remove(&chat).unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
