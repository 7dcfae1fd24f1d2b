// Storage module - in-memory row store backing the executors

mod mem_store;

pub use mem_store::MemStore;
