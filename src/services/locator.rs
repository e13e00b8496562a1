use crate::debug_if_enabled;
use crate::events::WindowHandle;
use crate::services::window_host::WindowHost;
use std::sync::Arc;
use tracing::{info, warn};

/// Ищет уже открытое окно Keep среди всех окон хоста
pub struct WindowLocator {
    host: Arc<dyn WindowHost>,
    marker: String,
}

impl WindowLocator {
    pub fn new(host: Arc<dyn WindowHost>, marker: impl Into<String>) -> Self {
        Self {
            host,
            marker: marker.into(),
        }
    }

    /// Первое окно, в котором есть вкладка с маркером.
    /// Ошибка перечисления считается отсутствием окна.
    pub async fn find_existing(&self) -> Option<WindowHandle> {
        let windows = match self.host.list_windows(true).await {
            Ok(windows) => windows,
            Err(e) => {
                warn!("Не удалось получить список окон: {}", e);
                return None;
            }
        };

        debug_if_enabled!("Проверяем {} окон на маркер '{}'", windows.len(), self.marker);

        let found = windows
            .iter()
            .find(|window| window.contains_location(&self.marker))
            .map(|window| window.handle);

        match found {
            Some(handle) => info!("Найдено существующее окно Keep: {}", handle),
            None => debug_if_enabled!("Окно Keep среди открытых не найдено"),
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::WindowInfo;
    use crate::services::test_support::MockHost;

    const MARKER: &str = "keep.google.com";

    #[tokio::test]
    async fn first_matching_window_wins() {
        let host = Arc::new(
            MockHost::new()
                .with_window(WindowInfo::new(WindowHandle(1)).with_document("https://example.org/"))
                .with_window(
                    WindowInfo::new(WindowHandle(2))
                        .with_document("https://mail.google.com/")
                        .with_document("https://keep.google.com/u/0/"),
                )
                .with_window(WindowInfo::new(WindowHandle(3)).with_document("https://keep.google.com/")),
        );
        let locator = WindowLocator::new(host.clone(), MARKER);

        assert_eq!(locator.find_existing().await, Some(WindowHandle(2)));
        assert_eq!(host.calls(), vec![crate::services::test_support::HostCall::List(true)]);
    }

    #[tokio::test]
    async fn no_match_is_absent() {
        let host = Arc::new(
            MockHost::new()
                .with_window(WindowInfo::new(WindowHandle(1)).with_document("https://example.org/"))
                .with_window(WindowInfo::new(WindowHandle(2))),
        );
        let locator = WindowLocator::new(host, MARKER);
        assert_eq!(locator.find_existing().await, None);
    }

    #[tokio::test]
    async fn enumeration_failure_is_absent() {
        let host = Arc::new(
            MockHost::new().with_window(WindowInfo::new(WindowHandle(1)).with_document("https://keep.google.com/")),
        );
        host.fail_list();
        let locator = WindowLocator::new(host, MARKER);
        assert_eq!(locator.find_existing().await, None);
    }
}
