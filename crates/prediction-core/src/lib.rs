pub mod calibration;
pub mod error;
pub mod rounding;
pub mod types;

pub use calibration::*;
pub use error::*;
pub use rounding::*;
pub use types::*;
