//! Mapping request paths onto the web root.
//!
//! - **`path`**: `WebRoot` and lexical containment of request paths
//! - **`resolver`**: Chooses favicon, index, listing, 404 or method dispatch
//! - **`listing`**: HTML rendering of directory contents

pub mod listing;
pub mod path;
pub mod resolver;

pub use path::{ResolvedPath, WebRoot};
pub use resolver::ResourceResolver;
