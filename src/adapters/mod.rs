// Adapters layer: concrete implementations for the search API, SMTP and the filesystem.

pub mod http;
pub mod mail;
pub mod storage;
