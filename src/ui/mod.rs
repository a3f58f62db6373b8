mod layout;
mod theme;

pub use layout::{Layout, center_rect};
pub use theme::{Theme, brand_color};
