//! Core domain entities.
//!
//! - [`ShortLink`] - A shortened URL mapping
//! - [`Visit`] - A recorded resolution of a short link

pub mod short_link;
pub mod visit;

pub use short_link::ShortLink;
pub use visit::Visit;
