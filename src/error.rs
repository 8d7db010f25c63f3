use thiserror::Error;

/// Failures of the windowed host. The gauge core itself never fails.
#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Pixel surface error: {0}")]
    Surface(#[from] pixels::Error),
    #[error("Font data could not be parsed")]
    Font,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid command '{0}'")]
    Command(String),
}
