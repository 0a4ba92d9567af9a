//! Contracts and value types shared by the runtime.

pub mod emitter;
pub mod endpoint;
pub mod event;
pub mod host;
pub mod scheduler;
pub mod surface;
pub mod token;
