use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static DETAILS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^details_(\d+)$").expect("valid details regex"));

/* ====== Callback-кнопки ======
   menu_search   — войти в режим поиска
   menu_poster   — афиша
   back_to_menu  — главное меню
   developer     — о разработчике
   details_<id>  — подробности по фильму
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Search,
    Poster,
    BackToMenu,
    Developer,
    Details(u64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("unknown action tag: {0:?}")]
    Unknown(String),
    #[error("bad movie id in tag: {0:?}")]
    BadMovieId(String),
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu_search" => return Ok(Action::Search),
            "menu_poster" => return Ok(Action::Poster),
            "back_to_menu" => return Ok(Action::BackToMenu),
            "developer" => return Ok(Action::Developer),
            _ => {}
        }
        if let Some(caps) = DETAILS_RE.captures(s) {
            return caps[1]
                .parse::<u64>()
                .map(Action::Details)
                .map_err(|_| ActionParseError::BadMovieId(s.to_string()));
        }
        if s.starts_with("details_") {
            return Err(ActionParseError::BadMovieId(s.to_string()));
        }
        Err(ActionParseError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("menu_search"),
            Action::Poster => f.write_str("menu_poster"),
            Action::BackToMenu => f.write_str("back_to_menu"),
            Action::Developer => f.write_str("developer"),
            Action::Details(id) => write!(f, "details_{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_tags() {
        assert_eq!("menu_search".parse(), Ok(Action::Search));
        assert_eq!("menu_poster".parse(), Ok(Action::Poster));
        assert_eq!("back_to_menu".parse(), Ok(Action::BackToMenu));
        assert_eq!("developer".parse(), Ok(Action::Developer));
    }

    #[test]
    fn parses_details_id() {
        assert_eq!("details_42".parse(), Ok(Action::Details(42)));
        assert_eq!("details_603".parse::<Action>().unwrap().to_string(), "details_603");
    }

    #[test]
    fn rejects_malformed_details() {
        for tag in ["details_", "details_abc", "details_-1", "details_1_2", "details_99999999999999999999"] {
            assert_eq!(
                tag.parse::<Action>(),
                Err(ActionParseError::BadMovieId(tag.to_string())),
                "{tag}"
            );
        }
    }

    #[test]
    fn rejects_unknown() {
        assert_eq!(
            "menu_unknown".parse::<Action>(),
            Err(ActionParseError::Unknown("menu_unknown".into()))
        );
        assert!(matches!("".parse::<Action>(), Err(ActionParseError::Unknown(_))));
        assert!(matches!("add:1".parse::<Action>(), Err(ActionParseError::Unknown(_))));
    }

    #[test]
    fn tags_fit_callback_data_limit() {
        assert!(Action::Details(u64::MAX).to_string().len() <= 64);
    }
}
