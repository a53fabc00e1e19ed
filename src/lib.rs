//! Page assembly for static sites.
//!
//! - [`loader`]: fetch HTML fragments, cache them, insert them into a page
//! - [`bootstrap`]: load every fragment a page declares with `data-component`
//! - [`head`]: build a `<head>` and render or apply it
//!
//! Documents are held in the arena DOM of [`dom`]; fragments come from any
//! [`fetch::Fetch`] source.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod dom;
pub mod fetch;
pub mod head;
pub mod loader;
pub mod logger;
pub mod utils;

pub use bootstrap::bootstrap;
pub use dom::{Document, Page};
pub use head::HeadBuilder;
pub use loader::{ComponentLoader, Descriptor, LoadOptions, LoadReport};
