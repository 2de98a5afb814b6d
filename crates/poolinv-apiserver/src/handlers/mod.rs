pub mod pools;

// Re-export handler functions
pub use pools::*;
