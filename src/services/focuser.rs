use crate::debug_if_enabled;
use crate::events::{WindowHandle, WindowState, WindowUpdate};
use crate::services::window_host::WindowHost;
use std::sync::Arc;
use tracing::{info, warn};

/// Выводит окно на передний план
pub struct WindowFocuser {
    host: Arc<dyn WindowHost>,
}

impl WindowFocuser {
    pub fn new(host: Arc<dyn WindowHost>) -> Self {
        Self { host }
    }

    /// `false`, если дескриптор устарел или хост отказал в фокусе
    pub async fn focus(&self, handle: WindowHandle) -> bool {
        let window = match self.host.get_window(handle).await {
            Ok(window) => window,
            Err(e) if e.is_stale() => {
                debug_if_enabled!("Дескриптор {} устарел", handle);
                return false;
            }
            Err(e) => {
                warn!("Не удалось получить состояние окна {}: {}", handle, e);
                return false;
            }
        };

        if window.state == WindowState::Minimized {
            // Не на всех платформах окно можно развернуть
            if let Err(e) = self.host.update_window(handle, WindowUpdate::restore()).await {
                warn!("Не удалось развернуть окно {}: {}", handle, e);
            }
        }

        match self.host.update_window(handle, WindowUpdate::focus()).await {
            Ok(()) => {
                info!("Окно {} выведено на передний план", handle);
                true
            }
            Err(e) => {
                warn!("Не удалось передать фокус окну {}: {}", handle, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::WindowInfo;
    use crate::services::test_support::{HostCall, MockHost};

    #[tokio::test]
    async fn stale_handle_fails_without_updates() {
        let host = Arc::new(MockHost::new());
        let focuser = WindowFocuser::new(host.clone());

        assert!(!focuser.focus(WindowHandle(5)).await);
        assert_eq!(host.calls(), vec![HostCall::Get(WindowHandle(5))]);
    }

    #[tokio::test]
    async fn normal_window_only_gets_focus() {
        let host = Arc::new(MockHost::new().with_window(WindowInfo::new(WindowHandle(1))));
        let focuser = WindowFocuser::new(host.clone());

        assert!(focuser.focus(WindowHandle(1)).await);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Get(WindowHandle(1)),
                HostCall::Update(WindowHandle(1), WindowUpdate::focus()),
            ]
        );
    }

    #[tokio::test]
    async fn minimized_window_restored_then_focused() {
        let host = Arc::new(
            MockHost::new().with_window(WindowInfo::new(WindowHandle(1)).with_state(WindowState::Minimized)),
        );
        let focuser = WindowFocuser::new(host.clone());

        assert!(focuser.focus(WindowHandle(1)).await);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Get(WindowHandle(1)),
                HostCall::Update(WindowHandle(1), WindowUpdate::restore()),
                HostCall::Update(WindowHandle(1), WindowUpdate::focus()),
            ]
        );
    }

    #[tokio::test]
    async fn refused_focus_is_failure() {
        let host = Arc::new(MockHost::new().with_window(WindowInfo::new(WindowHandle(1))));
        host.unfocusable(WindowHandle(1));
        let focuser = WindowFocuser::new(host);

        assert!(!focuser.focus(WindowHandle(1)).await);
    }
}
