pub mod config;
pub mod error;
pub mod surface;
pub mod timer;
pub mod motion;
pub mod loader;
pub mod effects;
pub mod notify;
pub mod form;
pub mod page;
pub mod runtime;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use page::{Page, PageEvent};
pub use runtime::{Milestones, PageRuntime, RuntimeEvent};
pub use surface::{ElementId, MemorySurface, Surface};
