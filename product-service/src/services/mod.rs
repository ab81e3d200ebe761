pub mod database;
pub mod memory_store;
pub mod mongo_store;
pub mod store;

pub use database::MongoDb;
pub use memory_store::InMemoryProductStore;
pub use mongo_store::MongoProductStore;
pub use store::{Page, ProductFilter, ProductStore};
