use crate::action::Action;
use crate::flow::{AlbumItem, Flow, Reply};
use crate::ui;
use reqwest::Url;
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    prelude::*,
    types::{
        CallbackQuery, ChatId, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto,
    },
    utils::command::BotCommands,
};
use tracing::{info, warn};

/* ====== Команды ====== */
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Команды:")]
pub enum Command {
    #[command(description = "главное меню")]
    Start,
    #[command(description = "помощь")]
    Help,
    #[command(description = "найти фильм: /search <название>")]
    Search(String),
}

pub async fn run(bot: Bot, flow: Flow) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "cannot register bot commands");
    }

    // команды раньше свободного текста: /start в режиме поиска — это команда, не запрос
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint({
                            let flow = flow.clone();
                            move |bot: Bot, msg: Message, cmd: Command| {
                                let flow = flow.clone();
                                async move { on_command(bot, msg, cmd, &flow).await }
                            }
                        }),
                )
                .branch({
                    let flow = flow.clone();
                    dptree::endpoint(move |bot: Bot, msg: Message| {
                        let flow = flow.clone();
                        async move { on_text(bot, msg, &flow).await }
                    })
                }),
        )
        .branch(Update::filter_callback_query().endpoint({
            let flow = flow.clone();
            move |bot: Bot, q: CallbackQuery| {
                let flow = flow.clone();
                async move { on_callback(bot, q, &flow).await }
            }
        }));

    info!("dispatcher started");
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("dispatcher stopped");
}

async fn on_command(bot: Bot, msg: Message, cmd: Command, flow: &Flow) -> ResponseResult<()> {
    let replies = match cmd {
        Command::Start | Command::Help => flow.start(),
        Command::Search(query) => flow.search_command(msg.chat.id, &query).await,
    };
    deliver(&bot, msg.chat.id, replies).await
}

async fn on_text(bot: Bot, msg: Message, flow: &Flow) -> ResponseResult<()> {
    let text = msg.text().or_else(|| msg.caption());
    let replies = flow.text(msg.chat.id, text).await;
    deliver(&bot, msg.chat.id, replies).await
}

/* ====== Callback-кнопки ====== */
async fn on_callback(bot: Bot, q: CallbackQuery, flow: &Flow) -> ResponseResult<()> {
    let chat = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(q.from.id.0 as i64));
    let data = q.data.as_deref().unwrap_or("");

    match data.parse::<Action>() {
        Ok(action) => {
            // снимаем «часики» на кнопке до похода в TMDb
            answer_cb(&bot, &q, None).await;
            let replies = flow.action(chat, action).await;
            deliver(&bot, chat, replies).await
        }
        Err(e) => {
            warn!(chat_id = chat.0, error = %e, "unrecognized callback");
            answer_cb(&bot, &q, Some(ui::UNKNOWN_ACTION)).await;
            Ok(())
        }
    }
}

async fn answer_cb(bot: &Bot, q: &CallbackQuery, text: Option<&str>) {
    let mut req = bot.answer_callback_query(q.id.clone());
    if let Some(t) = text {
        req = req.text(t).show_alert(false);
    }
    if let Err(e) = req.await {
        warn!(error = %e, "answer_callback_query failed");
    }
}

/* ====== Отправка ответов по порядку ====== */
pub async fn deliver(bot: &Bot, chat: ChatId, replies: Vec<Reply>) -> ResponseResult<()> {
    for reply in replies {
        match reply {
            Reply::Text { text, keyboard } => send_text(bot, chat, text, keyboard).await?,
            Reply::Photo { url, caption, keyboard } => match Url::parse(&url) {
                Ok(u) => {
                    let req = bot.send_photo(chat, InputFile::url(u)).caption(caption);
                    match keyboard {
                        Some(kb) => req.reply_markup(kb).await?,
                        None => req.await?,
                    };
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "bad photo url, sending text instead");
                    send_text(bot, chat, caption, keyboard).await?;
                }
            },
            Reply::Album(items) => send_album(bot, chat, items).await?,
        }
    }
    Ok(())
}

async fn send_text(
    bot: &Bot,
    chat: ChatId,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<()> {
    let req = bot.send_message(chat, text);
    match keyboard {
        Some(kb) => req.reply_markup(kb).await?,
        None => req.await?,
    };
    Ok(())
}

// альбом принимает 2..=10 фото; одиночное отправляем обычным фото
async fn send_album(bot: &Bot, chat: ChatId, items: Vec<AlbumItem>) -> ResponseResult<()> {
    let mut media: Vec<InputMedia> = Vec::new();
    for item in items.into_iter().take(10) {
        let Ok(url) = Url::parse(&item.url) else {
            warn!(url = %item.url, "bad poster url, skipped");
            continue;
        };
        let mut photo = InputMediaPhoto::new(InputFile::url(url));
        photo.caption = Some(item.caption);
        media.push(InputMedia::Photo(photo));
    }
    match media.len() {
        0 => {}
        1 => {
            if let Some(InputMedia::Photo(p)) = media.pop() {
                let req = bot.send_photo(chat, p.media);
                match p.caption {
                    Some(c) => req.caption(c).await?,
                    None => req.await?,
                };
            }
        }
        _ => {
            bot.send_media_group(chat, media).await?;
        }
    }
    Ok(())
}
