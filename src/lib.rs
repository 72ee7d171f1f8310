//! Telegram-бот «Кинотеатр»: поиск фильмов и афиша через TMDb.

pub mod action;
pub mod config;
pub mod flow;
pub mod session;
pub mod tg;
pub mod tmdb;
pub mod ui;
