pub mod contract;
pub mod summary;
pub mod ticket;
pub mod transaction;
