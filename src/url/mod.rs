//! URL handling module for Setup-Scout
//!
//! Every probe the walker makes is derived from an [`Endpoint`]: a typed
//! position in the `course/year/format/index/problem` hierarchy that renders
//! to a URL under the site root or to a catalog key.

mod endpoint;

pub use endpoint::Endpoint;
