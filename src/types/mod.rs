pub mod alert;
pub mod position;
pub mod stats;

pub use alert::*;
pub use position::*;
pub use stats::*;
