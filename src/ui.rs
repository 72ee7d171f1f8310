//! Тексты, подписи и клавиатуры. Чистые функции без I/O.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use unicode_segmentation::UnicodeSegmentation;

use crate::action::Action;
use crate::tmdb::Movie;

pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Лимиты Telegram: подпись к фото и обычный текст.
pub const CAPTION_LIMIT: usize = 1024;
pub const TEXT_LIMIT: usize = 4096;

pub const GREETING: &str = "👋 Привет! Я — Кинотеатр.\nВыбери действие ниже:";
pub const MAIN_MENU_TITLE: &str = "📌 Главное меню";
pub const ASK_TITLE: &str = "Напишите название фильма:";
pub const EMPTY_QUERY: &str = "Напиши: /search <название фильма>";
pub const NOT_FOUND: &str = "Ничего не найдено.";
pub const POSTER_FAILED: &str = "Не удалось загрузить афишу 😔";
pub const POSTER_PICK: &str = "Выберите фильм для подробностей: ";
pub const DETAILS_FAILED: &str = "Ошибка при получении деталей фильма.";
pub const UNKNOWN_ACTION: &str = "Неизвестная команда";
pub const DEVELOPER_INFO: &str = "Разработчик: Zebra_Developer.\n\
Моя визитка:\n\
https://my-business-card-4qs2.onrender.com\n\
Связь со мной:\n\
mail - parkerpitergoy@gmail.com";

/// Одна карточка фильма: подпись, картинка (если есть) и кнопка «подробнее».
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub caption: String,
    pub photo: Option<String>,
    pub button: InlineKeyboardButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    pub caption: String,
    pub photo: Option<String>,
}

/* ====== Кнопки ====== */

fn button(label: impl Into<String>, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.to_string())
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("🔍 Поиск фильма", Action::Search),
            button("🎬 Афиша", Action::Poster),
        ],
        vec![button("О разработчике", Action::Developer)],
    ])
}

fn back_row() -> Vec<InlineKeyboardButton> {
    vec![button("⬅️ В меню", Action::BackToMenu)]
}

pub fn back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_row()])
}

pub fn single_button(btn: InlineKeyboardButton) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![btn]])
}

/// По кнопке на фильм в строке, в конце — «в меню».
pub fn poster_keyboard(cards: &[Card]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> =
        cards.iter().map(|c| vec![c.button.clone()]).collect();
    rows.push(back_row());
    InlineKeyboardMarkup::new(rows)
}

/* ====== Карточки ====== */

fn title_line(icon: &str, m: &Movie) -> String {
    format!("{} {} ({})", icon, m.title, m.release_year())
}

pub fn search_card(m: &Movie) -> Card {
    Card {
        caption: title_line("💠", m),
        photo: m.poster_url(),
        button: button("Подробнее", Action::Details(m.id)),
    }
}

/// В альбоме картинка нужна всегда, поэтому без постера — заглушка.
pub fn poster_entry(m: &Movie) -> Card {
    Card {
        caption: title_line("🎬", m),
        photo: Some(m.poster_url().unwrap_or_else(|| PLACEHOLDER_POSTER.to_string())),
        button: button(format!("ℹ {}", m.title), Action::Details(m.id)),
    }
}

pub fn details_view(m: &Movie) -> DetailsView {
    DetailsView {
        caption: format!("{}\n\n{}", title_line("💠", m), m.overview_text()),
        photo: m.poster_url(),
    }
}

/* ====== Вспомогательные ====== */

/// Обрезка по графемам, чтобы не разрезать эмодзи и составные символы.
pub fn clip(s: &str, max: usize) -> String {
    if s.graphemes(true).count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.graphemes(true).take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn movie(id: u64, poster: Option<&str>) -> Movie {
        Movie {
            id,
            title: "The Matrix".into(),
            overview: None,
            poster_path: poster.map(Into::into),
            release_date: Some("1999-03-30".into()),
        }
    }

    fn data(b: &InlineKeyboardButton) -> &str {
        match &b.kind {
            InlineKeyboardButtonKind::CallbackData(d) => d.as_str(),
            other => panic!("not a callback button: {other:?}"),
        }
    }

    fn layout(kb: &InlineKeyboardMarkup) -> Vec<Vec<(String, String)>> {
        kb.inline_keyboard
            .iter()
            .map(|row| row.iter().map(|b| (b.text.clone(), data(b).to_string())).collect())
            .collect()
    }

    #[test]
    fn main_menu_has_two_rows() {
        let rows = layout(&main_menu());
        assert_eq!(
            rows,
            vec![
                vec![
                    ("🔍 Поиск фильма".to_string(), "menu_search".to_string()),
                    ("🎬 Афиша".to_string(), "menu_poster".to_string()),
                ],
                vec![("О разработчике".to_string(), "developer".to_string())],
            ]
        );
    }

    #[test]
    fn main_menu_is_stable() {
        assert_eq!(main_menu(), main_menu());
    }

    #[test]
    fn back_keyboard_single_button() {
        assert_eq!(
            layout(&back_keyboard()),
            vec![vec![("⬅️ В меню".to_string(), "back_to_menu".to_string())]]
        );
    }

    #[test]
    fn search_card_with_poster() {
        let card = search_card(&movie(603, Some("/x.jpg")));
        assert_eq!(card.caption, "💠 The Matrix (1999)");
        assert_eq!(card.photo.as_deref(), Some("https://image.tmdb.org/t/p/w500/x.jpg"));
        assert_eq!(card.button.text, "Подробнее");
        assert_eq!(data(&card.button), "details_603");
    }

    #[test]
    fn search_card_without_poster_has_no_photo() {
        let card = search_card(&movie(1, None));
        assert_eq!(card.photo, None);
    }

    #[test]
    fn poster_entry_uses_placeholder() {
        let card = poster_entry(&movie(2, None));
        assert_eq!(card.caption, "🎬 The Matrix (1999)");
        assert_eq!(card.photo.as_deref(), Some(PLACEHOLDER_POSTER));
        assert_eq!(card.button.text, "ℹ The Matrix");
        assert_eq!(data(&card.button), "details_2");
    }

    #[test]
    fn empty_year_keeps_brackets() {
        let mut m = movie(3, None);
        m.release_date = None;
        assert_eq!(search_card(&m).caption, "💠 The Matrix ()");
    }

    #[test]
    fn details_include_overview_or_fallback() {
        let mut m = movie(4, Some("/p.jpg"));
        assert_eq!(details_view(&m).caption, "💠 The Matrix (1999)\n\nОписание отсутствует.");
        m.overview = Some("Хакер Нео.".into());
        let view = details_view(&m);
        assert_eq!(view.caption, "💠 The Matrix (1999)\n\nХакер Нео.");
        assert_eq!(view.photo.as_deref(), Some("https://image.tmdb.org/t/p/w500/p.jpg"));
    }

    #[test]
    fn poster_keyboard_ends_with_back() {
        let cards: Vec<Card> = (1..=3).map(|i| poster_entry(&movie(i, None))).collect();
        let rows = layout(&poster_keyboard(&cards));
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0].1, "details_1");
        assert_eq!(rows[2][0].1, "details_3");
        assert_eq!(rows[3][0].1, "back_to_menu");
    }

    #[test]
    fn clip_respects_graphemes() {
        assert_eq!(clip("короткий", 20), "короткий");
        let long = "💠".repeat(10);
        let clipped = clip(&long, 5);
        assert_eq!(clipped.graphemes(true).count(), 5);
        assert!(clipped.ends_with('…'));
        assert!(clipped.starts_with("💠💠💠💠"));
    }
}
