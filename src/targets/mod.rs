pub mod buffer;
mod mode;
#[cfg(feature = "terminal")]
pub mod terminal;

pub use buffer::{BufferTarget, Cell};
pub use mode::ColorMode;
#[cfg(feature = "terminal")]
pub use terminal::{terminal_size, TerminalGuard, TerminalPresenter, TerminalPresenterConfig};
