//! Infrastructure layer for filesystem and environment interactions.
//!
//! Platform data-directory lookup, `~` expansion and URL component encoding.
//! Nothing in here knows about products or filters.

pub mod encoding;
pub mod paths;

pub use encoding::percent_encode;
pub use paths::{default_config_file, default_data_dir, expand_tilde};
