pub mod cli;
pub mod config;
pub mod ecs;
pub mod field;
pub mod input;
pub mod manifest;
pub mod object;
pub mod overlay;
pub mod scroll;
pub mod slide;
pub mod view;

pub use field::{Field, FieldValue};
pub use object::ObjectEntry;
pub use overlay::{OverlayController, OverlayEvent, OverlayLevel};
pub use view::OverlayView;
