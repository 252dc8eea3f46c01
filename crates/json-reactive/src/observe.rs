//! Observation records emitted on intercepted access.
//!
//! Observations go out as `tracing` events under [`TRACE_TARGET`]: plain
//! access at `DEBUG`, read-only rejections at `WARN`. They are debugging
//! output only; nothing downstream reacts to them.

use std::fmt;

use crate::key::Key;
use crate::node::Node;

pub const TRACE_TARGET: &str = "json_reactive";

#[derive(Debug, Clone, Copy)]
pub enum Observation<'a> {
    Read {
        key: &'a Key,
        result: Option<&'a Node>,
    },
    Write {
        key: &'a Key,
        value: &'a Node,
    },
    Delete {
        key: &'a Key,
    },
    WriteRejected {
        key: &'a Key,
        value: &'a Node,
    },
    DeleteRejected {
        key: &'a Key,
    },
    RefRead {
        value: &'a Node,
    },
    RefWrite {
        value: &'a Node,
    },
}

impl Observation<'_> {
    pub fn op(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::Delete { .. } => "delete",
            Self::WriteRejected { .. } => "write-rejected",
            Self::DeleteRejected { .. } => "delete-rejected",
            Self::RefRead { .. } => "ref-read",
            Self::RefWrite { .. } => "ref-write",
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::WriteRejected { .. } | Self::DeleteRejected { .. })
    }

    pub fn emit(&self) {
        let op = self.op();
        match *self {
            Self::Read { key, result } => tracing::debug!(
                target: TRACE_TARGET,
                op,
                prop = %key,
                result = %Shown(result),
                "intercepted read"
            ),
            Self::Write { key, value } => tracing::debug!(
                target: TRACE_TARGET,
                op,
                prop = %key,
                value = %value,
                "intercepted write"
            ),
            Self::Delete { key } => {
                tracing::debug!(target: TRACE_TARGET, op, prop = %key, "intercepted delete")
            }
            Self::WriteRejected { key, value } => tracing::warn!(
                target: TRACE_TARGET,
                op,
                prop = %key,
                value = %value,
                "view is read-only, write ignored"
            ),
            Self::DeleteRejected { key } => tracing::warn!(
                target: TRACE_TARGET,
                op,
                prop = %key,
                "view is read-only, delete ignored"
            ),
            Self::RefRead { value } => {
                tracing::debug!(target: TRACE_TARGET, op, result = %value, "intercepted ref read")
            }
            Self::RefWrite { value } => {
                tracing::debug!(target: TRACE_TARGET, op, value = %value, "intercepted ref write")
            }
        }
    }
}

/// Prints an absent read result as `undefined`.
struct Shown<'a>(Option<&'a Node>);

impl fmt::Display for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => fmt::Display::fmt(node, f),
            None => f.write_str("undefined"),
        }
    }
}
