use super::window::{Rectangle, WindowHandle};
use crate::error::{KeepError, Result};
use crate::keep_error;
use std::fmt;
use std::str::FromStr;

/// Откуда пришёл запрос на показ окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationSource {
    IconClick,
    Shortcut,
}

impl fmt::Display for ActivationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationSource::IconClick => write!(f, "клик по иконке"),
            ActivationSource::Shortcut => write!(f, "сочетание клавиш"),
        }
    }
}

/// Команда консольного драйвера.
///
/// `click`/`shortcut`/`close` идут в контроллер, остальные имитируют
/// действия пользователя непосредственно в оконном менеджере.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Activate(ActivationSource),
    Close,
    Move(WindowHandle, Rectangle),
    Resize(WindowHandle, i32, i32),
    UserClose(WindowHandle),
    Minimize(WindowHandle),
    OpenTab(String),
    /// Имитация недоступности оконного менеджера
    Outage(bool),
    List,
    Quit,
}

fn parse_handle(arg: Option<&str>) -> Result<WindowHandle> {
    let raw = arg.ok_or_else(|| keep_error!(internal, "не указан номер окна"))?;
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(WindowHandle)
        .map_err(|e| keep_error!(internal, "неверный номер окна '{}': {}", raw, e))
}

fn parse_coord(arg: Option<&str>, name: &str) -> Result<i32> {
    let raw = arg.ok_or_else(|| keep_error!(internal, "не указано значение {}", name))?;
    raw.parse::<i32>()
        .map_err(|e| keep_error!(internal, "неверное значение {} '{}': {}", name, raw, e))
}

impl FromStr for ConsoleCommand {
    type Err = KeepError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let command = parts
            .next()
            .ok_or_else(|| keep_error!(internal, "пустая команда"))?;

        let parsed = match command.to_lowercase().as_str() {
            "click" => ConsoleCommand::Activate(ActivationSource::IconClick),
            "shortcut" => ConsoleCommand::Activate(ActivationSource::Shortcut),
            "close" => ConsoleCommand::Close,
            "move" => {
                let handle = parse_handle(parts.next())?;
                let rect = Rectangle {
                    left: parse_coord(parts.next(), "left")?,
                    top: parse_coord(parts.next(), "top")?,
                    width: parse_coord(parts.next(), "width")?,
                    height: parse_coord(parts.next(), "height")?,
                };
                ConsoleCommand::Move(handle, rect)
            }
            "resize" => {
                let handle = parse_handle(parts.next())?;
                let width = parse_coord(parts.next(), "width")?;
                let height = parse_coord(parts.next(), "height")?;
                ConsoleCommand::Resize(handle, width, height)
            }
            "outage" => match parts.next() {
                Some("on") => ConsoleCommand::Outage(true),
                Some("off") => ConsoleCommand::Outage(false),
                other => {
                    return Err(keep_error!(internal, "outage ожидает on|off, получено {:?}", other))
                }
            },
            "user-close" => ConsoleCommand::UserClose(parse_handle(parts.next())?),
            "minimize" => ConsoleCommand::Minimize(parse_handle(parts.next())?),
            "open-tab" => {
                let url = parts
                    .next()
                    .ok_or_else(|| keep_error!(internal, "не указан адрес вкладки"))?;
                ConsoleCommand::OpenTab(url.to_string())
            }
            "list" => ConsoleCommand::List,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(keep_error!(internal, "неизвестная команда '{}'", other)),
        };

        if let Some(extra) = parts.next() {
            return Err(keep_error!(internal, "лишний аргумент '{}'", extra));
        }

        Ok(parsed)
    }
}
