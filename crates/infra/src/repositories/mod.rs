mod memory;

pub use memory::{InMemoryCaseRepository, InMemoryDocumentRepository};
