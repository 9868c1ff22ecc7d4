pub mod animate;
pub mod commands;
pub mod editor;
pub mod input;
pub mod sync;
pub mod tools;

pub use animate::{Animator, Easing};
pub use commands::CommandStack;
pub use editor::Editor;
pub use input::InputEvent;
pub use sync::{DoodleMutation, DrawingEngine};
pub use tools::{DragTool, Hit, Tool};
