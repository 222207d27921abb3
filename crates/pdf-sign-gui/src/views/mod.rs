pub mod canvas;
pub mod cleanup;

pub use canvas::show_canvas;
pub use cleanup::CleanupWindow;
