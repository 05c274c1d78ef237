// src/integrations/mod.rs
//
// External Integrations Module
//
// The one integration this client has: the StoryHub platform API.

pub mod api;

pub use api::client::StoryhubClient;
pub use api::{ExploreFeed, StoryhubApi};
