//! Cache Module
//!
//! The cache store, its instrumentation wrappers, and history replay.

mod instrument;
mod replay;
mod store;
mod value;


// Re-export public types
pub use instrument::{inputs_key, outputs_key, Counted, Operation, Recorded, StoreOp};
pub use replay::{replay, transcript};
pub use store::Cache;
pub use value::Value;
