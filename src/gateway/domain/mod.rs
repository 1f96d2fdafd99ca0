//! Domain model for dispatch outcomes.

mod error;
mod response;

pub use error::DispatchError;
pub use response::GatewayResponse;
