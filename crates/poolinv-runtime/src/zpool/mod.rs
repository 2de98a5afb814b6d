//! Parsers for `zpool` utility output

pub mod props;
pub mod status;

pub use props::parse_int_property;
pub use status::parse_status_config;
