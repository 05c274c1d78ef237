pub mod cache_handlers;

pub use cache_handlers::register_cache_handlers;
