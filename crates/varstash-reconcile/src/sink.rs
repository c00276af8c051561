//! Where loaded values go.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use varstash_types::Identifier;

/// The caller refused a binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot bind {identifier}: {reason}")]
pub struct BindError {
    pub identifier: String,
    pub reason: String,
}

impl BindError {
    pub fn new(identifier: &Identifier, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// A caller's namespace: receives `identifier = value` bindings.
///
/// Sanitization can map distinct stored names to one identifier; a sink
/// decides what a repeated bind means. The map implementations below keep
/// the last value bound.
pub trait NamespaceSink<V> {
    fn bind(&mut self, identifier: &Identifier, value: V) -> Result<(), BindError>;
}

impl<V> NamespaceSink<V> for HashMap<String, V> {
    fn bind(&mut self, identifier: &Identifier, value: V) -> Result<(), BindError> {
        self.insert(identifier.to_string(), value);
        Ok(())
    }
}

impl<V> NamespaceSink<V> for BTreeMap<String, V> {
    fn bind(&mut self, identifier: &Identifier, value: V) -> Result<(), BindError> {
        self.insert(identifier.to_string(), value);
        Ok(())
    }
}

impl<V> NamespaceSink<V> for IndexMap<String, V> {
    fn bind(&mut self, identifier: &Identifier, value: V) -> Result<(), BindError> {
        self.insert(identifier.to_string(), value);
        Ok(())
    }
}

/// Adapts a closure into a [`NamespaceSink`].
pub struct FnSink<F>(pub F);

impl<V, F> NamespaceSink<V> for FnSink<F>
where
    F: FnMut(&Identifier, V) -> Result<(), BindError>,
{
    fn bind(&mut self, identifier: &Identifier, value: V) -> Result<(), BindError> {
        (self.0)(identifier, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varstash_types::sanitize;

    #[test]
    fn maps_keep_last_bind() {
        let mut ns: HashMap<String, i32> = HashMap::new();
        ns.bind(&sanitize("a b"), 1).unwrap();
        ns.bind(&sanitize("a-b"), 2).unwrap();
        assert_eq!(ns.len(), 1);
        assert_eq!(ns["a_b"], 2);
    }

    #[test]
    fn fn_sink_can_refuse() {
        let mut seen = Vec::new();
        let mut sink = FnSink(|id: &Identifier, v: i32| {
            if v < 0 {
                return Err(BindError::new(id, "negative"));
            }
            seen.push((id.to_string(), v));
            Ok(())
        });
        assert!(sink.bind(&sanitize("ok"), 1).is_ok());
        let err = sink.bind(&sanitize("bad"), -1).unwrap_err();
        assert_eq!(err.identifier, "bad");
        drop(sink);
        assert_eq!(seen, vec![("ok".to_string(), 1)]);
    }
}
