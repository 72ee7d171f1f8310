//! Логика бота без транспорта: событие -> список ответов по порядку отправки.
//!
//! Состояния чата: `Idle` и `AwaitingQuery`. «Поиск» включает ожидание
//! запроса, первое текстовое сообщение его снимает при любом исходе поиска.
//! «Афиша» и «В меню» тоже выводят из режима поиска; «Подробнее» и
//! «О разработчике» состояние не трогают.

use teloxide::types::{ChatId, InlineKeyboardMarkup};
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::session::{SessionMode, SessionStore};
use crate::tmdb::TmdbClient;
use crate::ui;

pub const MAX_SEARCH_RESULTS: usize = 3;
/// Больше десяти фото Telegram в один альбом не принимает.
pub const MAX_POSTER_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text {
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Photo {
        url: String,
        caption: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Album(Vec<AlbumItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumItem {
    pub url: String,
    pub caption: String,
}

impl Reply {
    pub fn text(text: impl AsRef<str>, keyboard: Option<InlineKeyboardMarkup>) -> Self {
        Reply::Text { text: ui::clip(text.as_ref(), ui::TEXT_LIMIT), keyboard }
    }

    /// Фото с подписью, а если картинки нет — просто текст с той же клавиатурой.
    pub fn card(photo: Option<String>, caption: &str, keyboard: Option<InlineKeyboardMarkup>) -> Self {
        match photo {
            Some(url) => Reply::Photo { url, caption: ui::clip(caption, ui::CAPTION_LIMIT), keyboard },
            None => Reply::text(caption, keyboard),
        }
    }
}

#[derive(Clone)]
pub struct Flow {
    tmdb: TmdbClient,
    sessions: SessionStore,
}

impl Flow {
    pub fn new(tmdb: TmdbClient, sessions: SessionStore) -> Self {
        Self { tmdb, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// /start и /help
    pub fn start(&self) -> Vec<Reply> {
        vec![Reply::text(ui::GREETING, Some(ui::main_menu()))]
    }

    /// /search <название>; без аргумента работает как кнопка «Поиск».
    pub async fn search_command(&self, chat: ChatId, query: &str) -> Vec<Reply> {
        let query = query.trim();
        if query.is_empty() {
            return self.action(chat, Action::Search).await;
        }
        self.sessions.clear(chat).await;
        self.search(chat, query).await
    }

    /// Свободный текст. Вне режима поиска игнорируется.
    pub async fn text(&self, chat: ChatId, text: Option<&str>) -> Vec<Reply> {
        let query = text.map(str::trim).unwrap_or("");
        if query.is_empty() {
            if self.sessions.get(chat).await == SessionMode::AwaitingQuery {
                return vec![Reply::text(ui::EMPTY_QUERY, Some(ui::back_keyboard()))];
            }
            return vec![];
        }
        if self.sessions.take(chat).await != SessionMode::AwaitingQuery {
            debug!(chat_id = chat.0, "text outside search mode, ignoring");
            return vec![];
        }
        self.search(chat, query).await
    }

    pub async fn action(&self, chat: ChatId, action: Action) -> Vec<Reply> {
        debug!(chat_id = chat.0, action = %action, "button pressed");
        match action {
            Action::Search => {
                self.sessions.set(chat, SessionMode::AwaitingQuery).await;
                vec![Reply::text(ui::ASK_TITLE, Some(ui::back_keyboard()))]
            }
            Action::Poster => {
                self.sessions.clear(chat).await;
                self.poster(chat).await
            }
            Action::BackToMenu => {
                self.sessions.clear(chat).await;
                vec![Reply::text(ui::MAIN_MENU_TITLE, Some(ui::main_menu()))]
            }
            Action::Developer => vec![Reply::text(ui::DEVELOPER_INFO, Some(ui::back_keyboard()))],
            Action::Details(id) => self.details(chat, id).await,
        }
    }

    async fn search(&self, chat: ChatId, query: &str) -> Vec<Reply> {
        let movies = self.tmdb.search_movies(query).await;
        info!(chat_id = chat.0, query = %query, found = movies.len(), "search");
        if movies.is_empty() {
            return vec![Reply::text(ui::NOT_FOUND, Some(ui::back_keyboard()))];
        }
        movies
            .iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|m| {
                let card = ui::search_card(m);
                Reply::card(card.photo, &card.caption, Some(ui::single_button(card.button)))
            })
            .collect()
    }

    async fn poster(&self, chat: ChatId) -> Vec<Reply> {
        let movies = self.tmdb.now_playing().await;
        info!(chat_id = chat.0, found = movies.len(), "now playing");
        if movies.is_empty() {
            return vec![Reply::text(ui::POSTER_FAILED, Some(ui::back_keyboard()))];
        }
        let cards: Vec<ui::Card> = movies.iter().take(MAX_POSTER_ENTRIES).map(ui::poster_entry).collect();
        let album = cards
            .iter()
            .filter_map(|c| {
                c.photo.clone().map(|url| AlbumItem {
                    url,
                    caption: ui::clip(&c.caption, ui::CAPTION_LIMIT),
                })
            })
            .collect();
        vec![
            Reply::Album(album),
            Reply::text(ui::POSTER_PICK, Some(ui::poster_keyboard(&cards))),
        ]
    }

    async fn details(&self, chat: ChatId, id: u64) -> Vec<Reply> {
        match self.tmdb.movie_details(id).await {
            Ok(m) => {
                let view = ui::details_view(&m);
                vec![Reply::card(view.photo, &view.caption, Some(ui::back_keyboard()))]
            }
            Err(e) => {
                warn!(chat_id = chat.0, movie_id = id, error = %e, "details failed");
                vec![Reply::text(ui::DETAILS_FAILED, None)]
            }
        }
    }
}
