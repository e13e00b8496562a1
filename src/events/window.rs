use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Дескриптор окна, выданный оконным менеджером хоста.
/// Не гарантированно стабилен между перезапусками хоста.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Прямоугольник окна в пикселях
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Размеры нового окна Keep, если сохранённых нет
pub const DEFAULT_BOUNDS: Rectangle = Rectangle {
    left: 1325,
    top: 160,
    width: 575,
    height: 850,
};

/// Нейтральная подстановка для полей, которые хост не сообщил
pub const FALLBACK_BOUNDS: Rectangle = Rectangle {
    left: 0,
    top: 0,
    width: 0,
    height: 0,
};

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.left, self.top
        )
    }
}

/// Прямоугольник, часть полей которого может отсутствовать
/// (хост в переходных состояниях, старые записи хранилища).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRectangle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

impl PartialRectangle {
    /// Заполняет отсутствующие поля из `fallback`
    pub fn fill(&self, fallback: &Rectangle) -> Rectangle {
        Rectangle {
            left: self.left.unwrap_or(fallback.left),
            top: self.top.unwrap_or(fallback.top),
            width: self.width.unwrap_or(fallback.width),
            height: self.height.unwrap_or(fallback.height),
        }
    }
}

impl From<Rectangle> for PartialRectangle {
    fn from(rect: Rectangle) -> Self {
        Self {
            left: Some(rect.left),
            top: Some(rect.top),
            width: Some(rect.width),
            height: Some(rect.height),
        }
    }
}

/// Состояние окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

/// Вкладка (документ) внутри окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub location: String,
}

impl Document {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Информация об окне хоста
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub state: WindowState,
    pub bounds: PartialRectangle,
    pub documents: SmallVec<[Document; 2]>,
}

impl WindowInfo {
    pub fn new(handle: WindowHandle) -> Self {
        Self {
            handle,
            state: WindowState::Normal,
            bounds: PartialRectangle::default(),
            documents: SmallVec::new(),
        }
    }

    pub fn with_bounds(mut self, bounds: Rectangle) -> Self {
        self.bounds = bounds.into();
        self
    }

    #[cfg(test)]
    pub fn with_state(mut self, state: WindowState) -> Self {
        self.state = state;
        self
    }

    pub fn with_document(mut self, location: impl Into<String>) -> Self {
        self.documents.push(Document::new(location));
        self
    }

    /// Содержит ли хотя бы одна вкладка окна маркер (регистрозависимо)
    pub fn contains_location(&self, marker: &str) -> bool {
        self.documents.iter().any(|doc| doc.location.contains(marker))
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:?}] {}",
            self.handle,
            self.state,
            self.bounds.fill(&FALLBACK_BOUNDS)
        )?;
        for doc in &self.documents {
            write!(f, " {}", doc.location)?;
        }
        Ok(())
    }
}

/// Тип создаваемого окна
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Normal,
    /// Окно с минимальным оформлением
    Popup,
}

/// Запрос на создание окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub location: String,
    pub kind: WindowKind,
    pub bounds: Rectangle,
}

/// Изменение состояния окна; `None` означает "не трогать"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowUpdate {
    pub state: Option<WindowState>,
    pub focused: Option<bool>,
    pub draw_attention: Option<bool>,
}

impl WindowUpdate {
    pub fn restore() -> Self {
        Self {
            state: Some(WindowState::Normal),
            ..Self::default()
        }
    }

    pub fn focus() -> Self {
        Self {
            focused: Some(true),
            draw_attention: Some(true),
            ..Self::default()
        }
    }
}

/// Чем хост описывает окно в событии изменения геометрии
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundsSubject {
    Handle(WindowHandle),
    Window(WindowInfo),
}

/// Событие в том виде, в каком его присылает хост
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawHostEvent {
    Removed(WindowHandle),
    BoundsChanged(BoundsSubject),
}

/// Нормализованное событие окна: до контроллера доходит только дескриптор
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Removed(WindowHandle),
    BoundsChanged(WindowHandle),
}

impl WindowEvent {
    #[cfg(test)]
    pub fn handle(&self) -> WindowHandle {
        match self {
            WindowEvent::Removed(handle) | WindowEvent::BoundsChanged(handle) => *handle,
        }
    }
}

impl From<RawHostEvent> for WindowEvent {
    fn from(raw: RawHostEvent) -> Self {
        match raw {
            RawHostEvent::Removed(handle) => WindowEvent::Removed(handle),
            RawHostEvent::BoundsChanged(BoundsSubject::Handle(handle)) => {
                WindowEvent::BoundsChanged(handle)
            }
            RawHostEvent::BoundsChanged(BoundsSubject::Window(window)) => {
                WindowEvent::BoundsChanged(window.handle)
            }
        }
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowEvent::Removed(handle) => write!(f, "Removed({})", handle),
            WindowEvent::BoundsChanged(handle) => write!(f, "BoundsChanged({})", handle),
        }
    }
}
