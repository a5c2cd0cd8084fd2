//! Lynx - minimal static file server
//!
//! Core library for the request pipeline: wire codec, path containment,
//! IP access control, extension hooks and file resolution.

pub mod access;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod files;
pub mod hooks;
pub mod http;
pub mod server;
