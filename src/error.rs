use thiserror::Error;

/// Caller mistakes surfaced by the public widget API.
///
/// Nothing here is a runtime fault: geometry and timer problems degrade
/// silently, these only report requests that name something that does not
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("no menu entry at path {path:?}")]
    UnknownEntry { path: Vec<usize> },
    #[error("window `{0}` is not registered with a window stack")]
    UnknownWindow(String),
    #[error("window `{0}` was rendered without a window stack")]
    MissingStack(String),
}
