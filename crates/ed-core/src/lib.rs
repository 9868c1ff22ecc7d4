pub mod clock;
pub mod config;
pub mod doodle;
pub mod drawing;
pub mod error;
pub mod handle;
pub mod id;
pub mod linked;
pub mod param;
pub mod persist;
pub mod point;
pub mod random;
pub mod range;
pub mod resolve;
pub mod shapes;
pub mod transform;

pub use config::{DoodleEnv, DrawingConfig, Eye};
pub use doodle::{Doodle, DoodleBase, DoodleShape, Squiggle, Touched};
pub use drawing::Drawing;
pub use error::{ConfigError, EngineError, ParamError, PersistError};
pub use id::DoodleId;
pub use param::{Param, ParamValue};
pub use point::Polar;
pub use range::{AngleUnit, Range};
pub use resolve::{AnimatedChange, Resolution};
pub use shapes::Shape;

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo;
