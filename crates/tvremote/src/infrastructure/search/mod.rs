//! Third-party content lookup used by smart search.

pub mod youtube;

pub use youtube::VideoSearchClient;
