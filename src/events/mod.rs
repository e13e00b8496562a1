pub mod trigger;
pub mod window;

pub use trigger::ConsoleCommand;
pub use window::{
    BoundsSubject, CreateRequest, PartialRectangle, RawHostEvent, Rectangle, WindowEvent,
    WindowHandle, WindowInfo, WindowKind, WindowState, WindowUpdate, DEFAULT_BOUNDS,
    FALLBACK_BOUNDS,
};
