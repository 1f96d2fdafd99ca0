//! Notification services.

mod worker;

pub use worker::DispatchWorker;
