mod loader;
mod page_view;
mod particles;
mod popup;
mod status_bar;
mod toast;

pub use loader::LoaderWidget;
pub use page_view::PageViewWidget;
pub use particles::{ParticleLayer, ParticlesWidget};
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
pub use toast::ToastWidget;
