pub mod hit;
pub mod paint;

pub use hit::{hit_test, hit_test_handle, hit_test_rect};
pub use paint::{RenderItem, render_list};
