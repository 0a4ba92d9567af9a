//! Preview orchestration and schedulers.

pub mod local;
pub mod manual;
pub mod preview;

pub use preview::Preview;
