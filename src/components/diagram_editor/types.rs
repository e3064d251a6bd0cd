use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node, e.g. `node_3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// Identifier of an edge, e.g. `e_1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

macro_rules! string_id {
	($ty:ident) => {
		impl $ty {
			/// Wraps a raw identifier token.
			pub fn new(raw: impl Into<String>) -> Self {
				Self(raw.into())
			}

			/// The raw identifier token.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $ty {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $ty {
			fn from(raw: &str) -> Self {
				Self(raw.to_owned())
			}
		}
	};
}

string_id!(NodeId);
string_id!(EdgeId);

/// A position in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub position: Point,
	pub label: String,
}

/// A directed relation `from -> to`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EdgeId,
	pub from: NodeId,
	pub to: NodeId,
}

impl Edge {
	/// Whether either endpoint is `node`.
	pub fn touches(&self, node: &NodeId) -> bool {
		&self.from == node || &self.to == node
	}
}
