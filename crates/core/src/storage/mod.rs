pub mod artifacts;
pub mod ticket_cache;
