//! Interception policies.
//!
//! A [`Handler`] decides what happens when a view is read, written or asked
//! to delete a property. It works against a [`Reflect`] target: either a raw
//! [`Target`] or another view, so views can be layered.
//!
//! | Handler           | read              | write                  | delete                  |
//! |-------------------|-------------------|------------------------|-------------------------|
//! | `MutableHandler`  | pass through, log | pass through, log      | pass through, log       |
//! | `ReadonlyHandler` | pass through, log | ignored, warn, `true`  | ignored, warn, `true`   |

use std::fmt;

use crate::key::{Key, ViewKind};
use crate::node::{Node, Target};
use crate::observe::{Observation, TRACE_TARGET};

/// Plain property access with JavaScript `Reflect` semantics: failures are
/// reported as `false`, never raised.
pub trait Reflect {
    fn get(&self, key: &Key) -> Option<Node>;
    fn set(&self, key: Key, value: Node) -> bool;
    fn delete_property(&self, key: &Key) -> bool;
    /// Own keys; enumeration is not intercepted.
    fn own_keys(&self) -> Vec<Key>;
}

impl Reflect for Target {
    fn get(&self, key: &Key) -> Option<Node> {
        Target::get(self, key)
    }

    fn set(&self, key: Key, value: Node) -> bool {
        match Target::set(self, key, value) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(target: TRACE_TARGET, error = %err, "target refused write");
                false
            }
        }
    }

    fn delete_property(&self, key: &Key) -> bool {
        match Target::delete(self, key) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(target: TRACE_TARGET, error = %err, "target refused delete");
                false
            }
        }
    }

    fn own_keys(&self) -> Vec<Key> {
        self.keys()
    }
}

pub trait Handler: fmt::Debug {
    /// The classification flag this handler answers `true` for.
    fn kind(&self) -> ViewKind;
    fn get(&self, target: &dyn Reflect, key: &Key) -> Option<Node>;
    fn set(&self, target: &dyn Reflect, key: Key, value: Node) -> bool;
    fn delete_property(&self, target: &dyn Reflect, key: &Key) -> bool;
}

/// Reads and writes pass through to the target and are observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutableHandler;

/// Reads pass through; writes and deletes are dropped with a warning but
/// still report success.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadonlyHandler;

pub static MUTABLE_HANDLER: MutableHandler = MutableHandler;
pub static READONLY_HANDLER: ReadonlyHandler = ReadonlyHandler;

/// Shared read path: the handler's own flag short-circuits, everything else
/// is read from the target and observed.
fn observed_get(kind: ViewKind, target: &dyn Reflect, key: &Key) -> Option<Node> {
    if *key == Key::Flag(kind) {
        return Some(Node::from(true));
    }
    let result = target.get(key);
    Observation::Read {
        key,
        result: result.as_ref(),
    }
    .emit();
    result
}

impl Handler for MutableHandler {
    fn kind(&self) -> ViewKind {
        ViewKind::Reactive
    }

    fn get(&self, target: &dyn Reflect, key: &Key) -> Option<Node> {
        observed_get(self.kind(), target, key)
    }

    fn set(&self, target: &dyn Reflect, key: Key, value: Node) -> bool {
        let ok = target.set(key.clone(), value.clone());
        Observation::Write {
            key: &key,
            value: &value,
        }
        .emit();
        ok
    }

    fn delete_property(&self, target: &dyn Reflect, key: &Key) -> bool {
        let ok = target.delete_property(key);
        Observation::Delete { key }.emit();
        ok
    }
}

impl Handler for ReadonlyHandler {
    fn kind(&self) -> ViewKind {
        ViewKind::Readonly
    }

    fn get(&self, target: &dyn Reflect, key: &Key) -> Option<Node> {
        observed_get(self.kind(), target, key)
    }

    fn set(&self, _target: &dyn Reflect, key: Key, value: Node) -> bool {
        Observation::WriteRejected {
            key: &key,
            value: &value,
        }
        .emit();
        true
    }

    fn delete_property(&self, _target: &dyn Reflect, key: &Key) -> bool {
        Observation::DeleteRejected { key }.emit();
        true
    }
}
