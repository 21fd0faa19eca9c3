// Database module
// Vector storage lives in a remote Qdrant instance

pub mod qdrant;

pub use qdrant::*;
