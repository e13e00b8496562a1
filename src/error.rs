use crate::events::WindowHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeepError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка сериализации: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Окно {0} больше не существует")]
    StaleHandle(WindowHandle),

    #[error("Операция не поддерживается: {0}")]
    Unsupported(String),

    #[error("Не удалось перечислить окна: {0}")]
    Enumeration(String),

    #[error("Хранилище недоступно: {0}")]
    Store(String),

    #[error("Не удалось создать окно: {0}")]
    Creation(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl KeepError {
    /// Признак того, что закэшированный дескриптор устарел
    pub fn is_stale(&self) -> bool {
        matches!(self, KeepError::StaleHandle(_))
    }
}

pub type Result<T> = std::result::Result<T, KeepError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! keep_error {
    (unsupported, $($arg:tt)*) => {
        $crate::error::KeepError::Unsupported(format!($($arg)*))
    };
    (enumeration, $($arg:tt)*) => {
        $crate::error::KeepError::Enumeration(format!($($arg)*))
    };
    (store, $($arg:tt)*) => {
        $crate::error::KeepError::Store(format!($($arg)*))
    };
    (creation, $($arg:tt)*) => {
        $crate::error::KeepError::Creation(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::KeepError::Internal(format!($($arg)*))
    };
}
