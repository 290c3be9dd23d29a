//! Call Instrumentation Module
//!
//! Wraps cache operations with invocation counting and history recording,
//! both kept in the same backing store the cache writes through.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::backend::Backend;
use crate::cache::{Cache, Value};
use crate::error::{CacheError, Result};

// == Operation Trait ==
/// A single cache operation that instrumentation layers can wrap.
///
/// Wrappers implement this trait themselves, so counting and recording
/// compose freely around any implementation in either order.
pub trait Operation {
    /// Stable identity naming the operation's counter and history keys.
    fn id(&self) -> &str;

    /// Invokes the operation with positional arguments.
    fn call(&self, args: &[Value]) -> Result<Value>;
}

/// History key holding an operation's recorded inputs.
pub fn inputs_key(op_id: &str) -> String {
    format!("{op_id}:inputs")
}

/// History key holding an operation's recorded outputs.
pub fn outputs_key(op_id: &str) -> String {
    format!("{op_id}:outputs")
}

// == Store Operation ==
/// `Cache::store` exposed as a wrappable operation.
///
/// Takes exactly one argument, the value to store, and returns the
/// generated key as a string value.
pub struct StoreOp {
    cache: Cache,
}

impl StoreOp {
    /// Wraps the store operation of the given cache.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

impl Operation for StoreOp {
    fn id(&self) -> &str {
        "cache.store"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        match args {
            [value] => self.cache.store(value.clone()).map(Value::Str),
            _ => Err(CacheError::InvalidArguments(format!(
                "{} takes exactly one value, got {}",
                self.id(),
                args.len()
            ))),
        }
    }
}

// == Count Wrapper ==
/// Counts invocations of the wrapped operation.
///
/// The counter at the operation's id is incremented before delegating.
/// Pure side effect: the wrapped result passes through unchanged.
pub struct Counted<O> {
    inner: O,
    backend: Arc<dyn Backend>,
}

impl<O: Operation> Counted<O> {
    /// Wraps `inner`, counting its calls in `backend`.
    pub fn new(inner: O, backend: Arc<dyn Backend>) -> Self {
        Self { inner, backend }
    }
}

impl<O: Operation> Operation for Counted<O> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        let count = self.backend.incr(self.id())?;
        debug!(op = self.id(), count, "counted call");
        self.inner.call(args)
    }
}

// == History Wrapper ==
/// Records the wrapped operation's inputs and outputs.
///
/// The serialized argument list is appended to `<id>:inputs` before
/// delegating, the serialized result to `<id>:outputs` after a successful
/// return, and the result passes through unchanged. For a single-threaded
/// caller the two sequences stay equal-length and positionally paired.
///
/// The wrapper adds no locking of its own: with concurrent callers the
/// ordering is only as strong as the store's atomic append, so
/// interleaved calls can record entries out of call order. A delegate
/// that fails leaves its input unpaired.
pub struct Recorded<O> {
    inner: O,
    backend: Arc<dyn Backend>,
}

impl<O: Operation> Recorded<O> {
    /// Wraps `inner`, recording its call history in `backend`.
    pub fn new(inner: O, backend: Arc<dyn Backend>) -> Self {
        Self { inner, backend }
    }
}

impl<O: Operation> Operation for Recorded<O> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        self.backend
            .rpush(&inputs_key(self.id()), encode_record(&args)?)?;
        let output = self.inner.call(args)?;
        self.backend
            .rpush(&outputs_key(self.id()), encode_record(&output)?)?;
        debug!(op = self.id(), "recorded call");
        Ok(output)
    }
}

/// Serializes a history record as tagged JSON.
fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| CacheError::Encode(e.to_string()))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn test_setup() -> (Arc<MemoryBackend>, Cache) {
        let backend = Arc::new(MemoryBackend::new());
        let cache = Cache::new(backend.clone());
        (backend, cache)
    }

    #[test]
    fn test_history_keys() {
        assert_eq!(inputs_key("cache.store"), "cache.store:inputs");
        assert_eq!(outputs_key("cache.store"), "cache.store:outputs");
    }

    #[test]
    fn test_store_op_delegates() {
        let (_, cache) = test_setup();
        let op = StoreOp::new(cache.clone());

        let result = op.call(&["hello".into()]).unwrap();
        let Value::Str(key) = result else {
            panic!("store must return its key as a string value");
        };
        assert_eq!(cache.get_str(&key).unwrap(), Some("hello".to_string()));
    }

    #[test]
    fn test_store_op_rejects_wrong_arity() {
        let (_, cache) = test_setup();
        let op = StoreOp::new(cache);

        assert!(matches!(
            op.call(&[]),
            Err(CacheError::InvalidArguments(_))
        ));
        assert!(matches!(
            op.call(&["a".into(), "b".into()]),
            Err(CacheError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_counted_increments_per_call() {
        let (backend, cache) = test_setup();
        let op = Counted::new(StoreOp::new(cache), backend.clone());

        for _ in 0..3 {
            op.call(&["v".into()]).unwrap();
        }

        assert_eq!(backend.get(op.id()).unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn test_counted_counts_failed_calls() {
        let (backend, cache) = test_setup();
        let op = Counted::new(StoreOp::new(cache), backend.clone());

        // Wrong arity fails inside the delegate, after the counter ticked
        assert!(op.call(&[]).is_err());

        assert_eq!(backend.get(op.id()).unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_recorded_pairs_inputs_and_outputs() {
        let (backend, cache) = test_setup();
        let op = Recorded::new(StoreOp::new(cache), backend.clone());

        let first = op.call(&["one".into()]).unwrap();
        let second = op.call(&[2i64.into()]).unwrap();

        let inputs = backend.lrange(&inputs_key(op.id()), 0, -1).unwrap();
        let outputs = backend.lrange(&outputs_key(op.id()), 0, -1).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(outputs.len(), 2);

        let args: Vec<Value> = serde_json::from_slice(&inputs[0]).unwrap();
        assert_eq!(args, vec![Value::from("one")]);
        let args: Vec<Value> = serde_json::from_slice(&inputs[1]).unwrap();
        assert_eq!(args, vec![Value::from(2i64)]);

        let out: Value = serde_json::from_slice(&outputs[0]).unwrap();
        assert_eq!(out, first);
        let out: Value = serde_json::from_slice(&outputs[1]).unwrap();
        assert_eq!(out, second);
    }

    #[test]
    fn test_recorded_passes_result_through() {
        let (backend, cache) = test_setup();
        let plain = StoreOp::new(cache.clone());
        let wrapped = Recorded::new(StoreOp::new(cache.clone()), backend);

        let Value::Str(plain_key) = plain.call(&["x".into()]).unwrap() else {
            panic!("store returns a string key");
        };
        let Value::Str(wrapped_key) = wrapped.call(&["x".into()]).unwrap() else {
            panic!("store returns a string key");
        };

        // Different keys, same stored value: wrapping changed nothing else
        assert_ne!(plain_key, wrapped_key);
        assert_eq!(cache.get_str(&wrapped_key).unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_failed_call_leaves_input_unpaired() {
        let (backend, cache) = test_setup();
        let op = Recorded::new(StoreOp::new(cache), backend.clone());

        assert!(op.call(&[]).is_err());

        let inputs = backend.lrange(&inputs_key(op.id()), 0, -1).unwrap();
        let outputs = backend.lrange(&outputs_key(op.id()), 0, -1).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(outputs.len(), 0);
    }

    #[test]
    fn test_count_outside_history_inside_composition() {
        let (backend, cache) = test_setup();
        let op = Counted::new(
            Recorded::new(StoreOp::new(cache), backend.clone()),
            backend.clone(),
        );

        // Identity is transparent through both layers
        assert_eq!(op.id(), "cache.store");

        op.call(&["v".into()]).unwrap();
        assert!(op.call(&[]).is_err());

        // Counter ticks once per call whether or not recording paired up
        assert_eq!(backend.get(op.id()).unwrap(), Some(b"2".to_vec()));
        assert_eq!(backend.lrange(&inputs_key(op.id()), 0, -1).unwrap().len(), 2);
        assert_eq!(
            backend.lrange(&outputs_key(op.id()), 0, -1).unwrap().len(),
            1
        );
    }
}
