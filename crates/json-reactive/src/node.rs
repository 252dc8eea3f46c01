//! The value tree handled by the wrappers.
//!
//! A [`Node`] is either a JSON scalar, a raw composite [`Target`], a wrapped
//! [`View`] or a boxed [`Ref`]. Targets are shared handles: cloning one clones
//! the `Rc`, not the contents, so every view over a target sees the same data.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::boxed::Ref;
use crate::error::ReactiveError;
use crate::key::Key;
use crate::view::View;

/// Arrays never grow to this length or past it.
const MAX_ARRAY_LEN: u64 = u32::MAX as u64;

/// Most `null` slots a single write may pad an array with. Arrays are dense,
/// so a far-away index or a large `length` would otherwise allocate up front.
pub const MAX_ARRAY_GAP: usize = 1 << 16;

#[derive(Debug, Clone)]
pub enum Node {
    /// Null, bool, number or string. Build nodes with `Node::from(Value)` so
    /// objects and arrays land in [`Node::Composite`].
    Scalar(Value),
    /// Raw, unwrapped object or array.
    Composite(Target),
    View(View),
    Ref(Ref),
}

impl Node {
    pub fn null() -> Self {
        Self::Scalar(Value::Null)
    }

    /// Objects, arrays and views over them. Scalars and refs are not
    /// composite and pass through the wrapping constructors unchanged.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_) | Self::View(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }

    /// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy,
    /// everything else (including every composite) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Scalar(Value::Null) => false,
            Self::Scalar(Value::Bool(b)) => *b,
            Self::Scalar(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::Scalar(Value::String(s)) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_target(&self) -> Option<&Target> {
        match self {
            Self::Composite(target) => Some(target),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Self::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_boxed(&self) -> Option<&Ref> {
        match self {
            Self::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Plain JSON copy of the underlying data.
    ///
    /// Views and refs are unwrapped without going through their handlers, so
    /// taking a snapshot emits no observations.
    pub fn to_json(&self) -> Result<Value, ReactiveError> {
        let mut path = Vec::new();
        self.snapshot(&mut path)
    }

    /// `path` holds the identities of the containers currently being copied.
    pub(crate) fn snapshot(&self, path: &mut Vec<usize>) -> Result<Value, ReactiveError> {
        match self {
            Self::Scalar(value) => Ok(value.clone()),
            Self::Composite(target) => target.snapshot(path),
            Self::View(view) => view.snapshot(path),
            Self::Ref(r) => {
                let id = r.id();
                if path.contains(&id) {
                    return Err(ReactiveError::CircularReference);
                }
                path.push(id);
                let out = r.peek().snapshot(path)?;
                path.pop();
                Ok(out)
            }
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Composite(Target::new(Composite::Array(
                items.into_iter().map(Node::from).collect(),
            ))),
            Value::Object(map) => Self::Composite(Target::new(Composite::Object(
                map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
            ))),
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(Value::String(value))
    }
}

impl From<Target> for Node {
    fn from(value: Target) -> Self {
        Self::Composite(value)
    }
}

impl From<View> for Node {
    fn from(value: View) -> Self {
        Self::View(value)
    }
}

impl From<Ref> for Node {
    fn from(value: Ref) -> Self {
        Self::Ref(value)
    }
}

/// Compares the snapshot of `self` with `other`. Cyclic nodes never compare
/// equal.
impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        match self {
            Self::Scalar(value) => value == other,
            _ => self.to_json().is_ok_and(|v| v == *other),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(value) => write!(f, "{value}"),
            Err(_) => f.write_str("<circular>"),
        }
    }
}

/// Contents of a [`Target`].
#[derive(Debug)]
pub enum Composite {
    Object(IndexMap<String, Node>),
    Array(Vec<Node>),
}

/// Shared, interior-mutable object or array.
///
/// Reads and writes on a `Target` are plain: nothing is observed. Wrap it in
/// a view to intercept access.
#[derive(Clone)]
pub struct Target {
    inner: Rc<RefCell<Composite>>,
}

impl Target {
    pub fn new(contents: Composite) -> Self {
        Self {
            inner: Rc::new(RefCell::new(contents)),
        }
    }

    pub fn object() -> Self {
        Self::new(Composite::Object(IndexMap::new()))
    }

    pub fn array() -> Self {
        Self::new(Composite::Array(Vec::new()))
    }

    pub fn is_array(&self) -> bool {
        matches!(&*self.inner.borrow(), Composite::Array(_))
    }

    pub fn len(&self) -> usize {
        match &*self.inner.borrow() {
            Composite::Object(map) => map.len(),
            Composite::Array(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Own keys in order: object keys as names, array slots as indices.
    pub fn keys(&self) -> Vec<Key> {
        match &*self.inner.borrow() {
            Composite::Object(map) => map.keys().map(|k| Key::Name(k.clone())).collect(),
            Composite::Array(items) => (0..items.len()).map(Key::Index).collect(),
        }
    }

    pub fn ptr_eq(&self, other: &Target) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn get(&self, key: &Key) -> Option<Node> {
        match &*self.inner.borrow() {
            Composite::Object(map) => key.to_property_name().and_then(|name| map.get(&name).cloned()),
            Composite::Array(items) => {
                if is_length(key) {
                    return Some(Node::Scalar(Value::from(items.len())));
                }
                key.as_index().and_then(|i| items.get(i).cloned())
            }
        }
    }

    /// Stores `value` under `key` and returns the value it replaced.
    ///
    /// Writing past the end of an array fills the gap with `null`. Writing
    /// `length` truncates or extends the array.
    pub fn set(&self, key: Key, value: Node) -> Result<Option<Node>, ReactiveError> {
        if let Key::Flag(_) = key {
            return Err(ReactiveError::ReservedKey {
                key: key.to_string(),
            });
        }
        let mut inner = self.inner.borrow_mut();
        match &mut *inner {
            Composite::Object(map) => {
                let name = key.to_property_name().ok_or_else(|| ReactiveError::ReservedKey {
                    key: key.to_string(),
                })?;
                Ok(map.insert(name, value))
            }
            Composite::Array(items) => {
                if let Some(i) = key.as_index().filter(|&i| (i as u64) < MAX_ARRAY_LEN) {
                    if i < items.len() {
                        return Ok(Some(std::mem::replace(&mut items[i], value)));
                    }
                    check_gap(i, items.len())?;
                    items.resize_with(i, Node::null);
                    items.push(value);
                    return Ok(None);
                }
                if is_length(&key) {
                    let len = value
                        .as_scalar()
                        .and_then(Value::as_u64)
                        .filter(|&n| n <= MAX_ARRAY_LEN)
                        .ok_or(ReactiveError::InvalidLength)?;
                    let previous = items.len();
                    check_gap(len as usize, previous)?;
                    items.resize_with(len as usize, Node::null);
                    return Ok(Some(Node::Scalar(Value::from(previous))));
                }
                Err(ReactiveError::UnsupportedArrayKey {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Removes `key` and returns the removed value.
    ///
    /// Deleting an array slot leaves a `null` hole; the length is kept.
    /// Missing keys delete successfully.
    pub fn delete(&self, key: &Key) -> Result<Option<Node>, ReactiveError> {
        let mut inner = self.inner.borrow_mut();
        match &mut *inner {
            Composite::Object(map) => {
                Ok(key.to_property_name().and_then(|name| map.shift_remove(&name)))
            }
            Composite::Array(items) => {
                if is_length(key) {
                    return Err(ReactiveError::UnsupportedArrayKey {
                        key: key.to_string(),
                    });
                }
                match key.as_index() {
                    Some(i) if i < items.len() => {
                        Ok(Some(std::mem::replace(&mut items[i], Node::null())))
                    }
                    _ => Ok(None),
                }
            }
        }
    }

    /// Own entries, cloned out so callers can recurse without holding a
    /// borrow.
    pub(crate) fn entries(&self) -> Vec<(Key, Node)> {
        match &*self.inner.borrow() {
            Composite::Object(map) => map
                .iter()
                .map(|(k, v)| (Key::Name(k.clone()), v.clone()))
                .collect(),
            Composite::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (Key::Index(i), v.clone()))
                .collect(),
        }
    }

    /// Appends an entry while building a container. Array keys are ignored:
    /// entries arrive in index order.
    pub(crate) fn append(&self, key: Key, value: Node) {
        match &mut *self.inner.borrow_mut() {
            Composite::Object(map) => {
                if let Some(name) = key.to_property_name() {
                    map.insert(name, value);
                }
            }
            Composite::Array(items) => items.push(value),
        }
    }

    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn snapshot(&self, path: &mut Vec<usize>) -> Result<Value, ReactiveError> {
        let id = self.id();
        if path.contains(&id) {
            return Err(ReactiveError::CircularReference);
        }
        path.push(id);
        let out = match &*self.inner.borrow() {
            Composite::Object(map) => {
                let mut obj = Map::new();
                for (key, node) in map {
                    obj.insert(key.clone(), node.snapshot(path)?);
                }
                Value::Object(obj)
            }
            Composite::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|node| node.snapshot(path))
                    .collect::<Result<_, _>>()?,
            ),
        };
        path.pop();
        Ok(out)
    }
}

fn check_gap(new_len: usize, len: usize) -> Result<(), ReactiveError> {
    if new_len.saturating_sub(len) > MAX_ARRAY_GAP {
        return Err(ReactiveError::GapTooLarge { index: new_len, len });
    }
    Ok(())
}

fn is_length(key: &Key) -> bool {
    matches!(key, Key::Name(name) if name == "length")
}

// Contents may be cyclic, so only the shape is printed.
impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(contents) => {
                let (kind, len) = match &*contents {
                    Composite::Object(map) => ("object", map.len()),
                    Composite::Array(items) => ("array", items.len()),
                };
                f.debug_struct("Target")
                    .field("kind", &kind)
                    .field("len", &len)
                    .finish()
            }
            Err(_) => f.debug_struct("Target").finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_composites_become_targets() {
        let node = Node::from(json!({"a": [1, {"b": true}], "c": "x"}));
        let target = node.as_target().expect("object must become a target");
        assert!(!target.is_array());
        assert_eq!(target.len(), 2);
        let a = target.get(&Key::from("a")).unwrap();
        assert!(a.as_target().unwrap().is_array());
        assert_eq!(target.get(&Key::from("c")).unwrap(), json!("x"));
        assert_eq!(node.to_json().unwrap(), json!({"a": [1, {"b": true}], "c": "x"}));
    }

    #[test]
    fn scalars_stay_scalars() {
        for value in [json!(null), json!(false), json!(3.5), json!("s")] {
            let node = Node::from(value.clone());
            assert_eq!(node.as_scalar(), Some(&value));
            assert!(!node.is_composite());
        }
    }

    #[test]
    fn object_set_get_delete() {
        let target = Target::object();
        assert!(target.set(Key::from("a"), Node::from(1)).unwrap().is_none());
        assert_eq!(target.set(Key::from("a"), Node::from(2)).unwrap().unwrap(), json!(1));
        assert_eq!(target.get(&Key::from("a")).unwrap(), json!(2));
        assert_eq!(target.delete(&Key::from("a")).unwrap().unwrap(), json!(2));
        assert!(target.get(&Key::from("a")).is_none());
        assert!(target.delete(&Key::from("missing")).unwrap().is_none());
    }

    #[test]
    fn object_index_keys_are_stringified() {
        let target = Target::object();
        target.set(Key::from(1usize), Node::from("one")).unwrap();
        assert_eq!(target.get(&Key::from("1")).unwrap(), json!("one"));
        assert_eq!(target.keys(), vec![Key::from("1")]);
    }

    #[test]
    fn object_delete_keeps_order() {
        let node = Node::from(json!({"a": 1, "b": 2, "c": 3}));
        let target = node.as_target().unwrap();
        target.delete(&Key::from("b")).unwrap();
        assert_eq!(target.keys(), vec![Key::from("a"), Key::from("c")]);
    }

    #[test]
    fn array_reads() {
        let node = Node::from(json!([10, 20]));
        let target = node.as_target().unwrap();
        assert_eq!(target.get(&Key::from(1usize)).unwrap(), json!(20));
        assert_eq!(target.get(&Key::from("0")).unwrap(), json!(10));
        assert_eq!(target.get(&Key::from("length")).unwrap(), json!(2));
        assert!(target.get(&Key::from(5usize)).is_none());
        assert!(target.get(&Key::from("foo")).is_none());
    }

    #[test]
    fn array_write_past_end_fills_with_null() {
        let node = Node::from(json!([1]));
        let target = node.as_target().unwrap();
        target.set(Key::from(3usize), Node::from(4)).unwrap();
        assert_eq!(node.to_json().unwrap(), json!([1, null, null, 4]));
    }

    #[test]
    fn array_length_write_resizes() {
        let node = Node::from(json!([1, 2, 3]));
        let target = node.as_target().unwrap();
        let previous = target.set(Key::from("length"), Node::from(1)).unwrap();
        assert_eq!(previous.unwrap(), json!(3));
        assert_eq!(node.to_json().unwrap(), json!([1]));
        target.set(Key::from("length"), Node::from(2)).unwrap();
        assert_eq!(node.to_json().unwrap(), json!([1, null]));
        assert!(matches!(
            target.set(Key::from("length"), Node::from(-1)),
            Err(ReactiveError::InvalidLength)
        ));
    }

    #[test]
    fn far_array_writes_are_refused_without_allocating() {
        let node = Node::from(json!([1]));
        let target = node.as_target().unwrap();
        let err = target
            .set(Key::from(4_000_000_000usize), Node::from(1))
            .unwrap_err();
        assert_eq!(
            err,
            ReactiveError::GapTooLarge {
                index: 4_000_000_000,
                len: 1
            }
        );
        assert!(matches!(
            target.set(Key::from("length"), Node::from(4_000_000_000i64)),
            Err(ReactiveError::GapTooLarge { .. })
        ));
        assert_eq!(node.to_json().unwrap(), json!([1]));
    }

    #[test]
    fn writes_within_the_gap_limit_pad() {
        let target = Target::array();
        target
            .set(Key::from(MAX_ARRAY_GAP), Node::from(true))
            .unwrap();
        assert_eq!(target.len(), MAX_ARRAY_GAP + 1);
        assert!(target
            .set(Key::from(2 * MAX_ARRAY_GAP + 2), Node::from(true))
            .is_err());
        target
            .set(Key::from("length"), Node::from(1))
            .unwrap();
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn array_rejects_named_properties() {
        let target = Target::array();
        let err = target.set(Key::from("foo"), Node::from(1)).unwrap_err();
        assert_eq!(
            err,
            ReactiveError::UnsupportedArrayKey {
                key: "foo".to_string()
            }
        );
    }

    #[test]
    fn array_delete_leaves_hole() {
        let node = Node::from(json!([1, 2, 3]));
        let target = node.as_target().unwrap();
        assert_eq!(target.delete(&Key::from(1usize)).unwrap().unwrap(), json!(2));
        assert_eq!(node.to_json().unwrap(), json!([1, null, 3]));
        assert!(target.delete(&Key::from(9usize)).unwrap().is_none());
        assert!(target.delete(&Key::from("length")).is_err());
    }

    #[test]
    fn flags_are_never_stored() {
        let target = Target::object();
        let flag = Key::Flag(crate::key::ViewKind::Reactive);
        assert!(matches!(
            target.set(flag.clone(), Node::from(true)),
            Err(ReactiveError::ReservedKey { .. })
        ));
        assert!(target.get(&flag).is_none());
    }

    #[test]
    fn snapshot_detects_cycles() {
        let target = Target::object();
        target
            .set(Key::from("me"), Node::Composite(target.clone()))
            .unwrap();
        let node = Node::Composite(target);
        assert_eq!(node.to_json().unwrap_err(), ReactiveError::CircularReference);
        assert_eq!(node.to_string(), "<circular>");
    }

    #[test]
    fn shared_subtrees_are_not_cycles() {
        let shared = Node::from(json!({"x": 1}));
        let parent = Target::array();
        parent.append(Key::Index(0), shared.clone());
        parent.append(Key::Index(1), shared);
        assert_eq!(
            Node::Composite(parent).to_json().unwrap(),
            json!([{"x": 1}, {"x": 1}])
        );
    }

    #[test]
    fn truthiness() {
        assert!(!Node::null().is_truthy());
        assert!(!Node::from(false).is_truthy());
        assert!(!Node::from(0).is_truthy());
        assert!(!Node::from("").is_truthy());
        assert!(Node::from(true).is_truthy());
        assert!(Node::from(-1).is_truthy());
        assert!(Node::from(json!({})).is_truthy());
    }

    #[test]
    fn debug_prints_shape_only() {
        let node = Node::from(json!([1, 2]));
        assert_eq!(
            format!("{:?}", node.as_target().unwrap()),
            "Target { kind: \"array\", len: 2 }"
        );
    }
}
