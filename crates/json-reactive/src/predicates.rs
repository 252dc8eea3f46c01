//! Classification predicates.
//!
//! Every predicate accepts a `&Node` or an `Option<&Node>` (the result of a
//! read), and answers `false` for absent input and `null`.

use crate::key::{Key, ViewKind};
use crate::node::Node;

/// `true` for containers built by [`r#ref`](crate::r#ref).
///
/// Reads the ref's literal tag. Never goes through a view.
pub fn is_ref<'a>(x: impl Into<Option<&'a Node>>) -> bool {
    matches!(x.into(), Some(Node::Ref(r)) if r.is_ref())
}

/// `true` when reading the reactive flag through `x` yields `true`.
pub fn is_reactive<'a>(x: impl Into<Option<&'a Node>>) -> bool {
    has_flag(x.into(), ViewKind::Reactive)
}

/// `true` when reading the read-only flag through `x` yields `true`.
pub fn is_readonly<'a>(x: impl Into<Option<&'a Node>>) -> bool {
    has_flag(x.into(), ViewKind::Readonly)
}

pub fn is_proxy<'a>(x: impl Into<Option<&'a Node>>) -> bool {
    let x = x.into();
    is_reactive(x) || is_readonly(x)
}

fn has_flag(x: Option<&Node>, kind: ViewKind) -> bool {
    match x {
        Some(Node::View(view)) => view.get(Key::Flag(kind)).is_some_and(|flag| flag.is_truthy()),
        _ => false,
    }
}
