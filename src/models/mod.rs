// Domain rows and request shapes

pub mod exercise;
pub mod profile;
pub mod template;
pub mod training_day;
pub mod training_session;

pub use exercise::*;
pub use profile::*;
pub use template::*;
pub use training_day::*;
pub use training_session::*;
