pub mod connection;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod pipelines;
pub mod store;

pub use connection::{ConnectionManager, Connector, MongoConnector, MongoHandle};
pub use memory::MemoryStatsStore;
pub use models::*;
pub use mongo::MongoStatsStore;
pub use store::StatsStore;
