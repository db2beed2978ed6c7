//! Page state, lookup plumbing and presentation for usweather.

pub mod models;
pub mod render;
pub mod services;
pub mod view;

pub use models::{ForecastModel, ForecastState, RequestStatus};
pub use render::render_text;
pub use view::{view, view_in, PageView};
