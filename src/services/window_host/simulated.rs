use crate::error::{KeepError, Result};
use crate::events::{
    BoundsSubject, CreateRequest, RawHostEvent, Rectangle, WindowHandle, WindowInfo, WindowKind,
    WindowState, WindowUpdate, FALLBACK_BOUNDS,
};
use crate::{debug_if_enabled, keep_error};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::info;

use super::r#trait::WindowHost;

/// Минимальный размер, до которого хост растягивает новые окна
pub const MIN_WIDTH: i32 = 200;
pub const MIN_HEIGHT: i32 = 150;

/// Положение обычного окна, открытого пользователем
const USER_WINDOW_BOUNDS: Rectangle = Rectangle {
    left: 0,
    top: 0,
    width: 1280,
    height: 800,
};

struct SimWindow {
    info: WindowInfo,
    kind: WindowKind,
}

/// Оконный менеджер в памяти.
///
/// Действия пользователя (`user_*`) и вызовы API порождают события хоста
/// в канале `events`, как это делает настоящий менеджер окон.
pub struct SimulatedHost {
    windows: DashMap<WindowHandle, SimWindow>,
    next_id: AtomicU64,
    focused: Mutex<Option<WindowHandle>>,
    events: mpsc::UnboundedSender<RawHostEvent>,
    supports_restore: bool,
    // Менеджер окон "лежит": перечисление и создание окон отказывают
    outage: AtomicBool,
}

impl SimulatedHost {
    pub fn new(events: mpsc::UnboundedSender<RawHostEvent>) -> Self {
        info!("Инициализация SimulatedHost");
        Self {
            windows: DashMap::new(),
            next_id: AtomicU64::new(1),
            focused: Mutex::new(None),
            events,
            supports_restore: true,
            outage: AtomicBool::new(false),
        }
    }

    /// Хост, который не умеет разворачивать свёрнутые окна
    pub fn without_restore(mut self) -> Self {
        self.supports_restore = false;
        self
    }

    fn allocate(&self) -> WindowHandle {
        WindowHandle(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn emit(&self, event: RawHostEvent) {
        // Получатель мог уже завершиться при остановке
        let _ = self.events.send(event);
    }

    /// Пользователь открыл обычное окно браузера с одной вкладкой
    pub fn user_open_tab(&self, location: &str) -> WindowHandle {
        let handle = self.allocate();
        let info = WindowInfo::new(handle)
            .with_bounds(USER_WINDOW_BOUNDS)
            .with_document(location);
        self.windows.insert(
            handle,
            SimWindow {
                info,
                kind: WindowKind::Normal,
            },
        );
        info!("Пользователь открыл окно {} с {}", handle, location);
        handle
    }

    /// Пользователь перетащил или растянул окно
    pub fn user_move(&self, handle: WindowHandle, bounds: Rectangle) -> Result<()> {
        let info = {
            let mut window = self
                .windows
                .get_mut(&handle)
                .ok_or(KeepError::StaleHandle(handle))?;
            window.info.bounds = bounds.into();
            window.info.clone()
        };
        debug_if_enabled!("Окно {} перемещено в {}", handle, bounds);
        self.emit(RawHostEvent::BoundsChanged(BoundsSubject::Window(info)));
        Ok(())
    }

    /// Пользователь растянул окно; хост сообщает только дескриптор
    pub fn user_resize(&self, handle: WindowHandle, width: i32, height: i32) -> Result<()> {
        {
            let mut window = self
                .windows
                .get_mut(&handle)
                .ok_or(KeepError::StaleHandle(handle))?;
            window.info.bounds.width = Some(width);
            window.info.bounds.height = Some(height);
        }
        debug_if_enabled!("Окно {} растянуто до {}x{}", handle, width, height);
        self.emit(RawHostEvent::BoundsChanged(BoundsSubject::Handle(handle)));
        Ok(())
    }

    /// Включить или выключить сбой перечисления и создания окон
    pub fn set_outage(&self, enabled: bool) {
        self.outage.store(enabled, Ordering::Relaxed);
        info!("Сбой оконного менеджера: {}", if enabled { "включён" } else { "выключен" });
    }

    fn in_outage(&self) -> bool {
        self.outage.load(Ordering::Relaxed)
    }

    /// Пользователь закрыл окно сам, минуя контроллер
    pub fn user_close(&self, handle: WindowHandle) -> Result<()> {
        self.windows
            .remove(&handle)
            .ok_or(KeepError::StaleHandle(handle))?;
        self.forget_focus(handle);
        info!("Пользователь закрыл окно {}", handle);
        self.emit(RawHostEvent::Removed(handle));
        Ok(())
    }

    pub fn user_minimize(&self, handle: WindowHandle) -> Result<()> {
        let mut window = self
            .windows
            .get_mut(&handle)
            .ok_or(KeepError::StaleHandle(handle))?;
        window.info.state = WindowState::Minimized;
        drop(window);
        self.forget_focus(handle);
        info!("Окно {} свёрнуто", handle);
        Ok(())
    }

    fn forget_focus(&self, handle: WindowHandle) {
        let mut focused = self.focused.lock();
        if *focused == Some(handle) {
            *focused = None;
        }
    }

    pub fn focused(&self) -> Option<WindowHandle> {
        *self.focused.lock()
    }

    /// Снимок окон в порядке создания, для вывода на консоль
    pub fn describe(&self) -> Vec<String> {
        let focused = self.focused();
        let mut windows: Vec<(WindowHandle, String)> = self
            .windows
            .iter()
            .map(|entry| {
                let marker = if focused == Some(*entry.key()) { "*" } else { " " };
                let line = format!("{} {:?} {}", marker, entry.kind, entry.info);
                (*entry.key(), line)
            })
            .collect();
        windows.sort_by_key(|(handle, _)| *handle);
        windows.into_iter().map(|(_, line)| line).collect()
    }
}

#[async_trait::async_trait]
impl WindowHost for SimulatedHost {
    async fn list_windows(&self, include_contents: bool) -> Result<Vec<WindowInfo>> {
        if self.in_outage() {
            return Err(keep_error!(enumeration, "оконный менеджер недоступен"));
        }

        let mut windows: Vec<WindowInfo> = self
            .windows
            .iter()
            .map(|entry| {
                let mut info = entry.info.clone();
                if !include_contents {
                    info.documents.clear();
                }
                info
            })
            .collect();
        windows.sort_by_key(|w| w.handle);
        Ok(windows)
    }

    async fn get_window(&self, handle: WindowHandle) -> Result<WindowInfo> {
        self.windows
            .get(&handle)
            .map(|w| w.info.clone())
            .ok_or(KeepError::StaleHandle(handle))
    }

    async fn update_window(&self, handle: WindowHandle, update: WindowUpdate) -> Result<()> {
        let mut window = self
            .windows
            .get_mut(&handle)
            .ok_or(KeepError::StaleHandle(handle))?;

        if let Some(state) = update.state {
            if window.info.state == WindowState::Minimized
                && state != WindowState::Minimized
                && !self.supports_restore
            {
                return Err(keep_error!(unsupported, "восстановление окна {}", handle));
            }
            window.info.state = state;
        }
        drop(window);

        if update.focused == Some(true) {
            *self.focused.lock() = Some(handle);
            info!("Окно {} получило фокус", handle);
        }
        if update.draw_attention == Some(true) {
            debug_if_enabled!("Окно {} привлекает внимание", handle);
        }

        Ok(())
    }

    async fn create_window(&self, request: CreateRequest) -> Result<WindowInfo> {
        if self.in_outage() {
            return Err(keep_error!(creation, "оконный менеджер недоступен"));
        }

        let handle = self.allocate();
        let bounds = Rectangle {
            width: request.bounds.width.max(MIN_WIDTH),
            height: request.bounds.height.max(MIN_HEIGHT),
            ..request.bounds
        };

        let info = WindowInfo::new(handle)
            .with_bounds(bounds)
            .with_document(request.location.as_str());
        self.windows.insert(
            handle,
            SimWindow {
                info: info.clone(),
                kind: request.kind,
            },
        );
        *self.focused.lock() = Some(handle);

        info!(
            "Создано окно {} ({:?}) {} -> {}",
            handle,
            request.kind,
            request.location,
            info.bounds.fill(&FALLBACK_BOUNDS)
        );
        Ok(info)
    }

    async fn remove_window(&self, handle: WindowHandle) -> Result<()> {
        self.windows
            .remove(&handle)
            .ok_or(KeepError::StaleHandle(handle))?;
        self.forget_focus(handle);
        info!("Окно {} закрыто", handle);
        self.emit(RawHostEvent::Removed(handle));
        Ok(())
    }
}
