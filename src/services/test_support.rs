//! Test doubles for the host window manager and the bounds store.

use crate::error::{KeepError, Result};
use crate::events::{
    CreateRequest, PartialRectangle, Rectangle, WindowHandle, WindowInfo, WindowUpdate,
};
use crate::keep_error;
use crate::services::bounds_store::BoundsStore;
use crate::services::window_host::WindowHost;
use parking_lot::Mutex;
use std::collections::HashSet;
use tokio::time::{sleep, Duration};

/// One recorded call into the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    List(bool),
    Get(WindowHandle),
    Update(WindowHandle, WindowUpdate),
    Create(CreateRequest),
    Remove(WindowHandle),
}

#[derive(Default)]
struct MockHostState {
    windows: Vec<WindowInfo>,
    calls: Vec<HostCall>,
    next_id: u64,
    fail_list: bool,
    fail_create: bool,
    fail_remove: bool,
    unsupported_restore: bool,
    unfocusable: HashSet<WindowHandle>,
    created_bounds_override: Option<PartialRectangle>,
    create_delay: Option<Duration>,
}

/// Scriptable host that records every call
pub struct MockHost {
    state: Mutex<MockHostState>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockHostState {
                next_id: 100,
                ..MockHostState::default()
            }),
        }
    }

    pub fn with_window(self, window: WindowInfo) -> Self {
        self.state.lock().windows.push(window);
        self
    }

    pub fn fail_list(&self) {
        self.state.lock().fail_list = true;
    }

    pub fn fail_create(&self) {
        self.state.lock().fail_create = true;
    }

    pub fn fail_remove(&self) {
        self.state.lock().fail_remove = true;
    }

    pub fn unsupported_restore(&self) {
        self.state.lock().unsupported_restore = true;
    }

    /// Window exists but refuses focus requests
    pub fn unfocusable(&self, handle: WindowHandle) {
        self.state.lock().unfocusable.insert(handle);
    }

    /// Bounds the host reports for created windows regardless of the request
    pub fn override_created_bounds(&self, bounds: PartialRectangle) {
        self.state.lock().created_bounds_override = Some(bounds);
    }

    /// Make `create_window` suspend for `delay` before answering
    pub fn delay_create(&self, delay: Duration) {
        self.state.lock().create_delay = Some(delay);
    }

    /// Drop a window behind the controller's back, as a user would
    pub fn vanish(&self, handle: WindowHandle) {
        self.state.lock().windows.retain(|w| w.handle != handle);
    }

    pub fn set_bounds(&self, handle: WindowHandle, bounds: PartialRectangle) {
        let mut state = self.state.lock();
        if let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) {
            window.bounds = bounds;
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }

    pub fn creates(&self) -> Vec<CreateRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Whether any get/update call targeted `handle`
    pub fn touched(&self, handle: WindowHandle) -> bool {
        self.calls().iter().any(|call| {
            matches!(call, HostCall::Get(h) | HostCall::Update(h, _) if *h == handle)
        })
    }
}

#[async_trait::async_trait]
impl WindowHost for MockHost {
    async fn list_windows(&self, include_contents: bool) -> Result<Vec<WindowInfo>> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::List(include_contents));
        if state.fail_list {
            return Err(keep_error!(enumeration, "list failed"));
        }
        Ok(state.windows.clone())
    }

    async fn get_window(&self, handle: WindowHandle) -> Result<WindowInfo> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Get(handle));
        state
            .windows
            .iter()
            .find(|w| w.handle == handle)
            .cloned()
            .ok_or(KeepError::StaleHandle(handle))
    }

    async fn update_window(&self, handle: WindowHandle, update: WindowUpdate) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Update(handle, update));
        if !state.windows.iter().any(|w| w.handle == handle) {
            return Err(KeepError::StaleHandle(handle));
        }
        if update.state.is_some() && state.unsupported_restore {
            return Err(keep_error!(unsupported, "restore"));
        }
        if update.focused == Some(true) && state.unfocusable.contains(&handle) {
            return Err(keep_error!(unsupported, "focus"));
        }
        if let Some(new_state) = update.state {
            if let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) {
                window.state = new_state;
            }
        }
        Ok(())
    }

    async fn create_window(&self, request: CreateRequest) -> Result<WindowInfo> {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push(HostCall::Create(request.clone()));
            state.create_delay
        };
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        let mut state = self.state.lock();
        if state.fail_create {
            return Err(keep_error!(creation, "create failed"));
        }
        state.next_id += 1;
        let mut info = WindowInfo::new(WindowHandle(state.next_id))
            .with_bounds(request.bounds)
            .with_document(request.location.as_str());
        if let Some(bounds) = state.created_bounds_override {
            info.bounds = bounds;
        }
        state.windows.push(info.clone());
        Ok(info)
    }

    async fn remove_window(&self, handle: WindowHandle) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Remove(handle));
        if state.fail_remove {
            return Err(keep_error!(internal, "remove failed"));
        }
        let before = state.windows.len();
        state.windows.retain(|w| w.handle != handle);
        if state.windows.len() == before {
            return Err(KeepError::StaleHandle(handle));
        }
        Ok(())
    }
}

#[derive(Default)]
struct MockStoreState {
    stored: Option<PartialRectangle>,
    writes: Vec<Rectangle>,
    fail_get: bool,
    fail_set: bool,
    set_delay: Option<Duration>,
}

/// In-memory store recording every write
#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockStoreState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stored(self, bounds: PartialRectangle) -> Self {
        self.state.lock().stored = Some(bounds);
        self
    }

    pub fn fail_get(&self) {
        self.state.lock().fail_get = true;
    }

    pub fn fail_set(&self, fail: bool) {
        self.state.lock().fail_set = fail;
    }

    /// Make `set` suspend for `delay` before recording the write
    pub fn delay_set(&self, delay: Duration) {
        self.state.lock().set_delay = Some(delay);
    }

    pub fn writes(&self) -> Vec<Rectangle> {
        self.state.lock().writes.clone()
    }
}

#[async_trait::async_trait]
impl BoundsStore for MockStore {
    async fn get(&self) -> Result<Option<PartialRectangle>> {
        let state = self.state.lock();
        if state.fail_get {
            return Err(keep_error!(store, "get failed"));
        }
        Ok(state.stored)
    }

    async fn set(&self, bounds: Rectangle) -> Result<()> {
        let delay = self.state.lock().set_delay;
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        let mut state = self.state.lock();
        if state.fail_set {
            return Err(keep_error!(store, "set failed"));
        }
        state.writes.push(bounds);
        state.stored = Some(bounds.into());
        Ok(())
    }
}
