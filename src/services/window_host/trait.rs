use crate::error::Result;
use crate::events::{CreateRequest, WindowHandle, WindowInfo, WindowUpdate};

/// Capabilities the host window manager exposes to us.
///
/// Implementations report a handle that no longer resolves as
/// `KeepError::StaleHandle` and a state change the platform cannot perform as
/// `KeepError::Unsupported`.
#[async_trait::async_trait]
pub trait WindowHost: Send + Sync {
    /// Enumerate all windows; documents are filled only when `include_contents` is set
    async fn list_windows(&self, include_contents: bool) -> Result<Vec<WindowInfo>>;

    async fn get_window(&self, handle: WindowHandle) -> Result<WindowInfo>;

    async fn update_window(&self, handle: WindowHandle, update: WindowUpdate) -> Result<()>;

    /// Create a window; the returned bounds may differ from the requested ones
    async fn create_window(&self, request: CreateRequest) -> Result<WindowInfo>;

    async fn remove_window(&self, handle: WindowHandle) -> Result<()>;
}
