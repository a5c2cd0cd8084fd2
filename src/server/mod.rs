//! Connection supervision and the per-request pipeline.

pub mod listener;
pub mod pipeline;

pub use listener::Listener;
