//! Wrapped views.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::ReactiveError;
use crate::handler::{Handler, Reflect};
use crate::key::{Key, ViewKind};
use crate::node::{Node, Target};

/// How far wrapping reaches into a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Only the top-level container is wrapped.
    Shallow,
    /// Every nested object or array is wrapped too.
    Deep,
}

#[derive(Clone)]
enum Source {
    Target(Target),
    View(Rc<View>),
}

/// An intercepting view over a target.
///
/// Every read, write and delete goes through the view's [`Handler`]; the
/// target itself is never handed out. Cloning a view clones the handle, and
/// wrapping one target twice gives two views over the same data.
#[derive(Clone)]
pub struct View {
    handler: &'static dyn Handler,
    depth: Depth,
    source: Source,
}

impl View {
    pub(crate) fn over_target(handler: &'static dyn Handler, target: Target, depth: Depth) -> Self {
        Self {
            handler,
            depth,
            source: Source::Target(target),
        }
    }

    pub(crate) fn over_view(handler: &'static dyn Handler, inner: View, depth: Depth) -> Self {
        Self {
            handler,
            depth,
            source: Source::View(Rc::new(inner)),
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.handler.kind()
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Reads `key` through the handler. `None` means the property is absent.
    ///
    /// A deep view never hands out a nested container outside its family:
    /// raw objects and arrays, and views of another family or depth, come
    /// back wrapped in a deep view with this view's handler.
    pub fn get(&self, key: impl Into<Key>) -> Option<Node> {
        Reflect::get(self, &key.into())
    }

    /// Writes `key` through the handler and returns its completion flag.
    ///
    /// Read-only views return `true` without changing anything.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Node>) -> bool {
        self.handler.set(self.source(), key.into(), value.into())
    }

    pub fn delete(&self, key: impl Into<Key>) -> bool {
        self.handler.delete_property(self.source(), &key.into())
    }

    /// Own keys of the underlying target. Not observed.
    pub fn keys(&self) -> Vec<Key> {
        self.source().own_keys()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when this view sits over another view rather than a target.
    pub fn is_layered(&self) -> bool {
        matches!(self.source, Source::View(_))
    }

    pub fn is_array(&self) -> bool {
        match &self.source {
            Source::Target(target) => target.is_array(),
            Source::View(inner) => inner.is_array(),
        }
    }

    /// `true` when this view already wraps deeply with a `kind` handler.
    pub(crate) fn is_deep(&self, kind: ViewKind) -> bool {
        self.depth == Depth::Deep && self.kind() == kind
    }

    fn wrap_child(&self, child: Node) -> Node {
        if self.depth == Depth::Shallow {
            return child;
        }
        match child {
            Node::Composite(target) => {
                Node::View(View::over_target(self.handler, target, Depth::Deep))
            }
            Node::View(view) if !view.is_deep(self.kind()) => {
                Node::View(View::over_view(self.handler, view, Depth::Deep))
            }
            other => other,
        }
    }

    fn source(&self) -> &dyn Reflect {
        match &self.source {
            Source::Target(target) => target as &dyn Reflect,
            Source::View(inner) => &**inner as &dyn Reflect,
        }
    }

    pub(crate) fn snapshot(&self, path: &mut Vec<usize>) -> Result<Value, ReactiveError> {
        match &self.source {
            Source::Target(target) => target.snapshot(path),
            Source::View(inner) => inner.snapshot(path),
        }
    }
}

impl Reflect for View {
    fn get(&self, key: &Key) -> Option<Node> {
        self.handler
            .get(self.source(), key)
            .map(|child| self.wrap_child(child))
    }

    fn set(&self, key: Key, value: Node) -> bool {
        self.handler.set(self.source(), key, value)
    }

    fn delete_property(&self, key: &Key) -> bool {
        self.handler.delete_property(self.source(), key)
    }

    fn own_keys(&self) -> Vec<Key> {
        self.source().own_keys()
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("kind", &self.kind())
            .field("depth", &self.depth)
            .field("layered", &self.is_layered())
            .finish()
    }
}
