mod api_url;
mod client;
pub mod domain;

pub use api_url::*;

pub use client::*;
