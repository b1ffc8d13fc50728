//! Types shared by the formscribe gateways

mod error;

pub use error::{ErrorBody, HttpError};
