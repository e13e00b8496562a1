use crate::config::Config;
use crate::debug_if_enabled;
use crate::events::{
    CreateRequest, Rectangle, WindowEvent, WindowHandle, WindowKind, DEFAULT_BOUNDS,
    FALLBACK_BOUNDS,
};
use crate::services::bounds_store::BoundsStore;
use crate::services::focuser::WindowFocuser;
use crate::services::locator::WindowLocator;
use crate::services::persister::DebouncedPersister;
use crate::services::window_host::WindowHost;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Какой путь прошёл open-or-focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Сфокусировано окно из кэша
    FocusedKnown(WindowHandle),
    /// Найдено перебором окон и сфокусировано
    FocusedExisting(WindowHandle),
    Created(WindowHandle),
    /// Создать окно не удалось, окна нет
    Failed,
}

impl OpenOutcome {
    #[cfg(test)]
    pub fn handle(&self) -> Option<WindowHandle> {
        match self {
            OpenOutcome::FocusedKnown(h) | OpenOutcome::FocusedExisting(h) | OpenOutcome::Created(h) => Some(*h),
            OpenOutcome::Failed => None,
        }
    }
}

impl fmt::Display for OpenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenOutcome::FocusedKnown(h) => write!(f, "сфокусировано известное окно {}", h),
            OpenOutcome::FocusedExisting(h) => write!(f, "сфокусировано найденное окно {}", h),
            OpenOutcome::Created(h) => write!(f, "создано окно {}", h),
            OpenOutcome::Failed => write!(f, "окно не создано"),
        }
    }
}

/// Держит "единственное окно Keep": кэш его дескриптора, поиск, фокус,
/// создание и сохранение размеров.
///
/// Вызовы open-or-focus выполняются строго по одному, поэтому два почти
/// одновременных запуска не создают два окна. Кэш дескриптора защищён
/// синхронным мьютексом, который не удерживается через `.await`.
pub struct KeepWindowController {
    host: Arc<dyn WindowHost>,
    store: Arc<dyn BoundsStore>,
    locator: WindowLocator,
    focuser: WindowFocuser,
    persister: DebouncedPersister,
    url: String,
    known: Mutex<Option<WindowHandle>>,
    open_lock: tokio::sync::Mutex<()>,
}

impl KeepWindowController {
    pub fn new(config: &Config, host: Arc<dyn WindowHost>, store: Arc<dyn BoundsStore>) -> Self {
        info!("Инициализация KeepWindowController для {}", config.window.url);

        Self {
            locator: WindowLocator::new(Arc::clone(&host), config.window.marker.clone()),
            focuser: WindowFocuser::new(Arc::clone(&host)),
            persister: DebouncedPersister::new(Arc::clone(&store), config.persistence.debounce()),
            host,
            store,
            url: config.window.url.clone(),
            known: Mutex::new(None),
            open_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Текущий известный дескриптор окна Keep
    pub fn known(&self) -> Option<WindowHandle> {
        *self.known.lock()
    }

    fn adopt(&self, handle: WindowHandle) {
        *self.known.lock() = Some(handle);
    }

    /// Забыть дескриптор, только если он всё ещё текущий
    fn forget(&self, handle: WindowHandle) -> bool {
        let mut known = self.known.lock();
        if *known == Some(handle) {
            *known = None;
            true
        } else {
            false
        }
    }

    /// Показать окно Keep: кэш -> поиск -> создание.
    /// Не более двух попыток фокуса и одного создания за вызов.
    pub async fn open_or_focus(&self) -> OpenOutcome {
        let _serial = self.open_lock.lock().await;

        if let Some(handle) = self.known() {
            if self.focuser.focus(handle).await {
                return OpenOutcome::FocusedKnown(handle);
            }
            info!("Окно {} больше не отвечает, забываем его", handle);
            self.forget(handle);
        }

        if let Some(handle) = self.locator.find_existing().await {
            self.adopt(handle);
            if self.focuser.focus(handle).await {
                return OpenOutcome::FocusedExisting(handle);
            }
            // Обратно к поиску не возвращаемся: окно есть, но фокус не берёт
            warn!("Найденное окно {} не удалось сфокусировать, создаём новое", handle);
            self.forget(handle);
        }

        self.create().await
    }

    async fn create(&self) -> OpenOutcome {
        let bounds = self.load_bounds().await;
        let request = CreateRequest {
            location: self.url.clone(),
            kind: WindowKind::Popup,
            bounds,
        };

        match self.host.create_window(request).await {
            Ok(window) => {
                self.adopt(window.handle);
                // Хост мог подправить запрошенные размеры; чего он не сообщил,
                // берём из запроса, чтобы не сохранить вырожденный прямоугольник
                let actual = window.bounds.fill(&bounds);
                info!("Создано окно Keep {} с размерами {}", window.handle, actual);
                self.persister.schedule(actual);
                OpenOutcome::Created(window.handle)
            }
            Err(e) => {
                error!("Не удалось создать окно Keep: {}", e);
                OpenOutcome::Failed
            }
        }
    }

    async fn load_bounds(&self) -> Rectangle {
        match self.store.get().await {
            Ok(Some(stored)) => {
                let bounds = stored.fill(&DEFAULT_BOUNDS);
                debug_if_enabled!("Восстановлены размеры окна: {}", bounds);
                bounds
            }
            Ok(None) => {
                debug_if_enabled!("Сохранённых размеров нет, используем значения по умолчанию");
                DEFAULT_BOUNDS
            }
            Err(e) => {
                warn!("Не удалось прочитать сохранённые размеры: {}", e);
                DEFAULT_BOUNDS
            }
        }
    }

    /// Закрыть окно Keep. Дескриптор забывается независимо от результата.
    /// Ждёт завершения идущего open-or-focus, чтобы закрыть и только что созданное окно.
    pub async fn close(&self) {
        let _serial = self.open_lock.lock().await;

        let Some(handle) = self.known.lock().take() else {
            debug_if_enabled!("Закрывать нечего: окно Keep неизвестно");
            return;
        };

        match self.host.remove_window(handle).await {
            Ok(()) => info!("Окно Keep {} закрыто", handle),
            Err(e) => warn!("Не удалось закрыть окно {}: {}", handle, e),
        }
    }

    /// Пользователь закрыл окно сам
    pub fn on_external_removed(&self, handle: WindowHandle) {
        if self.forget(handle) {
            info!("Окно Keep {} закрыто извне", handle);
        }
    }

    pub async fn on_bounds_changed(&self, handle: WindowHandle) {
        if self.known() != Some(handle) {
            return;
        }

        match self.host.get_window(handle).await {
            Ok(window) => {
                let bounds = window.bounds.fill(&FALLBACK_BOUNDS);
                debug_if_enabled!("Размеры окна Keep {} изменились: {}", handle, bounds);
                self.persister.schedule(bounds);
            }
            Err(e) => warn!("Не удалось получить размеры окна {}: {}", handle, e),
        }
    }

    /// Точка входа для нормализованных событий хоста
    pub async fn handle_window_event(&self, event: WindowEvent) {
        debug_if_enabled!("Обработка события окна: {}", event);

        match event {
            WindowEvent::Removed(handle) => self.on_external_removed(handle),
            WindowEvent::BoundsChanged(handle) => self.on_bounds_changed(handle).await,
        }
    }

    /// Последние известные размеры окна Keep
    pub fn current_bounds(&self) -> Option<Rectangle> {
        self.persister.current()
    }

    pub fn has_pending_write(&self) -> bool {
        self.persister.has_pending()
    }

    /// Сохранить ожидающие размеры перед выходом
    pub async fn shutdown(&self) {
        self.persister.flush().await;
    }
}
