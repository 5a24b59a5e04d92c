pub mod bitmap;
pub mod brush;
pub mod gesture;
pub mod messages;
pub mod model;
pub mod pinch;
pub mod raster;
pub mod save;
pub mod script;
pub mod settings;
pub mod settings_store;
pub mod surface;
pub mod view;

pub use messages::ViewToShell;
pub use model::{Color, Mode, OverlayTransform, Point, ShapeKind, TouchAction, TouchEvent};
pub use settings::DrawSettings;
pub use view::DrawView;
