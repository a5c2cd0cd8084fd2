//! HTTP wire handling.
//!
//! Lynx speaks a deliberately small slice of HTTP/1.1: one request and one
//! response per accepted connection, no keep-alive, no chunked bodies.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection unit of work and the `ConnectionHandle` given to hooks
//! - **`parser`**: Decodes a single read buffer into a `Request`
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses onto the wire
//! - **`mime`**: MIME type detection based on file extensions
//! - **`form`**: URL-encoded form decoding for POST bodies
//!
//! # Connection Lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read
//!        └──────┬──────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Decode, filter, hooks, resolve
//!        └──────┬───────────┘
//!               │ Response ready (or halted by a hook)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │
//!               └─ Closed
//! ```

pub mod connection;
pub mod form;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
