//! json-reactive — observed and read-only views over JSON-shaped data.
//!
//! Plain data (objects, arrays and boxed values) is wrapped so that every
//! read and write is intercepted and logged, or so that mutation is refused.
//! Nothing reacts to the intercepted access: there is no effect scheduling,
//! only observation through `tracing` (target `json_reactive`).
//!
//! | Constructor        | Result                                        |
//! |--------------------|-----------------------------------------------|
//! | [`shallow_reactive`] | mutable view, top level only                |
//! | [`reactive`]       | mutable view, nested containers wrapped       |
//! | [`shallow_readonly`] | read-only view, top level only              |
//! | [`readonly`]       | read-only view, nested containers wrapped     |
//! | [`shallow_ref`]    | boxed value, stored as given, untagged        |
//! | [`r#ref`]          | boxed value, composites deep-wrapped, tagged  |
//!
//! [`is_ref`], [`is_reactive`], [`is_readonly`] and [`is_proxy`] classify a
//! node.
//!
//! ```
//! use json_reactive::{is_reactive, reactive, readonly};
//! use serde_json::json;
//!
//! let state = reactive(json!({"user": {"name": "ada"}}));
//! let view = state.as_view().unwrap();
//! assert!(is_reactive(view.get("user").as_ref()));
//!
//! let frozen = readonly(json!({"a": 1}));
//! assert!(frozen.as_view().unwrap().set("a", 2));
//! assert_eq!(frozen.as_view().unwrap().get("a").unwrap(), json!(1));
//! ```
//!
//! Values are `Rc`-based and stay on one thread. Cyclic data is accepted by
//! the wrappers (a cycle is wrapped once and keeps its shape) but holds its
//! own memory alive, and [`Node::to_json`] reports it as
//! [`ReactiveError::CircularReference`].

pub mod boxed;
pub mod error;
pub mod factory;
pub mod handler;
pub mod key;
pub mod node;
pub mod observe;
pub mod predicates;
pub mod view;

pub use boxed::{r#ref, shallow_ref, Ref};
pub use error::ReactiveError;
pub use factory::{make_wrapped, reactive, readonly, shallow_reactive, shallow_readonly};
pub use handler::{
    Handler, MutableHandler, ReadonlyHandler, Reflect, MUTABLE_HANDLER, READONLY_HANDLER,
};
pub use key::{Key, ViewKind};
pub use node::{Composite, Node, Target, MAX_ARRAY_GAP};
pub use observe::{Observation, TRACE_TARGET};
pub use predicates::{is_proxy, is_reactive, is_readonly, is_ref};
pub use view::{Depth, View};
