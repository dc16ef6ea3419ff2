mod in_memory_generation_store;

pub use in_memory_generation_store::InMemoryGenerationStore;
