pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
pub use record::{Collection, DeleteResult, Document, Filter, InsertOneResult, RecordId, UpdateResult};
pub use store::{RecordStore, StoreError};
