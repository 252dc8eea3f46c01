//! Object/array wrapper factory and its four entry points.

use std::collections::HashMap;

use crate::handler::{Handler, MUTABLE_HANDLER, READONLY_HANDLER};
use crate::node::{Node, Target};
use crate::view::{Depth, View};

/// Wraps `target` in a view using `handler`.
///
/// - Scalars and refs are returned unchanged; a ref is a box, not an
///   object, so deep wrapping does not reach into its slot either.
/// - An existing view gets a new view layered over it. A deep layered view
///   wraps every nested container it hands out, so nothing below it escapes
///   its handler.
/// - With [`Depth::Deep`] the container is rebuilt with every nested object,
///   array or foreign view replaced by a deep view of its own. The caller's
///   data is left as it was.
pub fn make_wrapped(target: Node, handler: &'static dyn Handler, depth: Depth) -> Node {
    match target {
        Node::Composite(target) => {
            let target = match depth {
                Depth::Shallow => target,
                Depth::Deep => DeepWrap::new(handler).rebuild(&target),
            };
            Node::View(View::over_target(handler, target, depth))
        }
        Node::View(inner) => Node::View(View::over_view(handler, inner, depth)),
        other => other,
    }
}

/// Mutable, observed view over the top level only.
pub fn shallow_reactive(target: impl Into<Node>) -> Node {
    make_wrapped(target.into(), &MUTABLE_HANDLER, Depth::Shallow)
}

/// Mutable, observed view; nested objects and arrays are wrapped too.
pub fn reactive(target: impl Into<Node>) -> Node {
    make_wrapped(target.into(), &MUTABLE_HANDLER, Depth::Deep)
}

/// Read-only view over the top level only. Nested values stay writable.
pub fn shallow_readonly(target: impl Into<Node>) -> Node {
    make_wrapped(target.into(), &READONLY_HANDLER, Depth::Shallow)
}

/// Read-only view; nested objects and arrays are read-only too.
pub fn readonly(target: impl Into<Node>) -> Node {
    make_wrapped(target.into(), &READONLY_HANDLER, Depth::Deep)
}

/// One deep-wrapping pass.
///
/// Rebuilt containers are remembered by the identity of their source, so a
/// sub-target reachable twice is rebuilt once, and a back-reference to a
/// container still being rebuilt resolves to the new container instead of
/// recursing forever.
struct DeepWrap {
    handler: &'static dyn Handler,
    rebuilt: HashMap<usize, Target>,
}

impl DeepWrap {
    fn new(handler: &'static dyn Handler) -> Self {
        Self {
            handler,
            rebuilt: HashMap::new(),
        }
    }

    fn rebuild(&mut self, source: &Target) -> Target {
        if let Some(done) = self.rebuilt.get(&source.id()) {
            return done.clone();
        }
        let fresh = if source.is_array() {
            Target::array()
        } else {
            Target::object()
        };
        self.rebuilt.insert(source.id(), fresh.clone());

        for (key, child) in source.entries() {
            let child = match child {
                Node::Composite(nested) => {
                    let nested = self.rebuild(&nested);
                    Node::View(View::over_target(self.handler, nested, Depth::Deep))
                }
                Node::View(view) if !view.is_deep(self.handler.kind()) => {
                    Node::View(View::over_view(self.handler, view, Depth::Deep))
                }
                other => other,
            };
            fresh.append(key, child);
        }
        fresh
    }
}
