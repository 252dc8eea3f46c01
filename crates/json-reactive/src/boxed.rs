//! Boxed values: a single slot read and replaced through `value` /
//! `set_value`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::factory::reactive;
use crate::node::Node;
use crate::observe::Observation;

/// Single-slot container.
///
/// Both accessors are observed. `is_ref` is a plain field, set only by
/// [`r#ref`]; reading it is never observed.
#[derive(Clone)]
pub struct Ref {
    is_ref: bool,
    slot: Rc<RefCell<Node>>,
}

impl Ref {
    fn new(is_ref: bool, value: Node) -> Self {
        Self {
            is_ref,
            slot: Rc::new(RefCell::new(value)),
        }
    }

    pub fn is_ref(&self) -> bool {
        self.is_ref
    }

    pub fn value(&self) -> Node {
        let value = self.peek();
        Observation::RefRead { value: &value }.emit();
        value
    }

    /// Replaces the slot. The new value is stored as given, even for deep
    /// refs.
    pub fn set_value(&self, value: impl Into<Node>) {
        let value = value.into();
        self.slot.replace(value.clone());
        Observation::RefWrite { value: &value }.emit();
    }

    pub fn ptr_eq(&self, other: &Ref) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    pub(crate) fn peek(&self) -> Node {
        self.slot.borrow().clone()
    }

    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.slot) as *const () as usize
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("is_ref", &self.is_ref)
            .finish_non_exhaustive()
    }
}

/// Boxes `value` as given. The result is not tagged as a ref.
pub fn shallow_ref(value: impl Into<Node>) -> Ref {
    Ref::new(false, value.into())
}

/// Boxes `value`, deep-wrapping it first if it is an object or array.
pub fn r#ref(value: impl Into<Node>) -> Ref {
    Ref::new(true, reactive(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ViewKind;
    use serde_json::json;

    #[test]
    fn ref_reads_and_writes() {
        let boxed = r#ref(5);
        assert!(boxed.is_ref());
        assert_eq!(boxed.value(), json!(5));
        boxed.set_value(10);
        assert_eq!(boxed.value(), json!(10));
    }

    #[test]
    fn ref_deep_wraps_composites() {
        let boxed = r#ref(json!({"a": {"b": 1}}));
        let value = boxed.value();
        let view = value.as_view().expect("payload must be wrapped");
        assert_eq!(view.kind(), ViewKind::Reactive);
        let nested = view.get("a").unwrap();
        assert_eq!(nested.as_view().map(|v| v.kind()), Some(ViewKind::Reactive));
    }

    #[test]
    fn assignment_is_not_rewrapped() {
        let boxed = r#ref(1);
        boxed.set_value(json!({"a": 1}));
        assert!(boxed.value().as_target().is_some());
    }

    #[test]
    fn shallow_ref_stores_raw_value() {
        let boxed = shallow_ref(json!({"a": 1}));
        assert!(!boxed.is_ref());
        assert!(boxed.value().as_target().is_some());
        assert_eq!(shallow_ref(5).value(), json!(5));
    }

    #[test]
    fn clones_share_the_slot() {
        let boxed = r#ref("a");
        let other = boxed.clone();
        other.set_value("b");
        assert_eq!(boxed.value(), json!("b"));
        assert!(boxed.ptr_eq(&other));
        assert!(!boxed.ptr_eq(&r#ref("b")));
    }

    #[test]
    fn self_referencing_ref_snapshot_fails() {
        let boxed = shallow_ref(json!(null));
        boxed.set_value(Node::Ref(boxed.clone()));
        assert!(Node::Ref(boxed).to_json().is_err());
    }
}
