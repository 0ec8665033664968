pub mod hand_overlay;
pub mod window;

pub use minifb::Key;
pub use window::MinifbRenderer;
