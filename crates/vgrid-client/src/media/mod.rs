pub mod dispatch;
pub mod surface;

pub use dispatch::CommandDispatcher;
pub use surface::{LoggingSurface, RecordingSurface, RenderSurface, SurfaceCall, SurfaceError};
