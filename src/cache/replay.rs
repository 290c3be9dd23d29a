//! Replay Module
//!
//! Reconstructs an operation's recorded call history as a readable
//! transcript.

use crate::backend::{read_counter, Backend};
use crate::cache::instrument::{inputs_key, outputs_key};
use crate::cache::Value;
use crate::error::{CacheError, Result};

// == Transcript ==
/// Renders the call history recorded for the operation named `op_id`.
///
/// The transcript is a header line with the total call count followed by
/// one line per recorded input/output pairing, in history order. An
/// operation that was never called has no counter key; that reads as zero
/// calls and a header-only transcript, never an error. A trailing input
/// whose call failed before producing an output is left out rather than
/// paired with an invented result.
pub fn transcript(backend: &dyn Backend, op_id: &str) -> Result<String> {
    let count = read_counter(backend, op_id)?;
    let inputs = backend.lrange(&inputs_key(op_id), 0, -1)?;
    let outputs = backend.lrange(&outputs_key(op_id), 0, -1)?;

    let mut rendered = format!("{op_id} was called {count} times:\n");
    for (input, output) in inputs.iter().zip(outputs.iter()) {
        let args: Vec<Value> = decode_record(&inputs_key(op_id), input)?;
        let result: Value = decode_record(&outputs_key(op_id), output)?;
        rendered.push_str(&format!("{op_id}({}) -> {result}\n", join_args(&args)));
    }

    Ok(rendered)
}

// == Replay ==
/// Prints the transcript for `op_id` to stdout.
pub fn replay(backend: &dyn Backend, op_id: &str) -> Result<()> {
    print!("{}", transcript(backend, op_id)?);
    Ok(())
}

/// Deserializes one tagged-JSON history record.
fn decode_record<T: serde::de::DeserializeOwned>(key: &str, raw: &[u8]) -> Result<T> {
    serde_json::from_slice(raw).map_err(|e| CacheError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cache::{Cache, Counted, Operation, Recorded, StoreOp};
    use std::sync::Arc;

    #[test]
    fn test_transcript_never_called() {
        let backend = MemoryBackend::new();

        let rendered = transcript(&backend, "cache.store").unwrap();
        assert_eq!(rendered, "cache.store was called 0 times:\n");
    }

    #[test]
    fn test_transcript_lists_calls_in_order() {
        let backend = Arc::new(MemoryBackend::new());
        let cache = Cache::new(backend.clone());
        let op = Counted::new(
            Recorded::new(StoreOp::new(cache), backend.clone()),
            backend.clone(),
        );

        let keys: Vec<Value> = vec![
            op.call(&["first".into()]).unwrap(),
            op.call(&[2i64.into()]).unwrap(),
            op.call(&[0.5f64.into()]).unwrap(),
        ];

        let rendered = transcript(backend.as_ref(), op.id()).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "cache.store was called 3 times:");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], format!("cache.store(\"first\") -> {}", keys[0]));
        assert_eq!(lines[2], format!("cache.store(2) -> {}", keys[1]));
        assert_eq!(lines[3], format!("cache.store(0.5) -> {}", keys[2]));
    }

    #[test]
    fn test_transcript_skips_unpaired_trailing_input() {
        let backend = Arc::new(MemoryBackend::new());
        let cache = Cache::new(backend.clone());
        let op = Counted::new(
            Recorded::new(StoreOp::new(cache), backend.clone()),
            backend.clone(),
        );

        op.call(&["good".into()]).unwrap();
        assert!(op.call(&[]).is_err());

        let rendered = transcript(backend.as_ref(), op.id()).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        // Both calls counted, only the paired one rendered
        assert_eq!(lines[0], "cache.store was called 2 times:");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_transcript_counter_must_be_numeric() {
        let backend = MemoryBackend::new();
        backend.set("cache.store", b"garbage".to_vec()).unwrap();

        assert!(matches!(
            transcript(&backend, "cache.store"),
            Err(CacheError::Decode { .. })
        ));
    }
}
