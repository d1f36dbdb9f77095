mod epoch;
mod error;
mod frames;
mod locate;
mod speed;
mod types;

pub use epoch::{format_epoch, parse_epoch};
pub use error::EphemerisError;
pub use frames::convert;
pub use locate::find_nearest;
pub use speed::speed;
pub use types::{Component, StateVector};
