// Copyright 2024 The MMR Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Node codec.
//!
//! A node serializes as its left digest followed by its right digest, using
//! each digest's canonical bytes. Those bytes are what gets hashed into the
//! node's own digest. A pending node, whose sibling mountain isn't complete
//! yet, keeps its single known child in the left slot and serializes as that
//! one digest. Variable width digests get a LEB128 length prefix per slot.
//!
//! `NodeRecord` adds the position to the node so it can be persisted by
//! digest and restored without knowing where it came from.

use crate::hash::{Digest, HashCombinator};
use crate::index::{IndexValue, Position};
use crate::ser::{self, Error};

const LEAF_FLAG: u8 = 1;
const NODE_FLAG: u8 = 0;

/// An internal node: two child digests, or one while pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<D> {
	left: D,
	right: Option<D>,
}

impl<D: Digest> Node<D> {
	/// A complete node.
	pub fn new(left: D, right: D) -> Node<D> {
		Node {
			left,
			right: Some(right),
		}
	}

	/// A node with a single known child.
	pub fn pending(child: D) -> Node<D> {
		Node {
			left: child,
			right: None,
		}
	}

	/// Left child digest.
	pub fn left(&self) -> &D {
		&self.left
	}

	/// Right child digest, None while pending.
	pub fn right(&self) -> Option<&D> {
		self.right.as_ref()
	}

	/// Whether only one child is known.
	pub fn is_pending(&self) -> bool {
		self.right.is_none()
	}

	/// Child digests, left first.
	pub fn children(&self) -> Vec<&D> {
		let mut children = vec![&self.left];
		children.extend(self.right.as_ref());
		children
	}

	/// Appends the node's bytes to `buf`.
	pub fn write(&self, buf: &mut Vec<u8>) {
		for child in self.children() {
			ser::write_digest(buf, child);
		}
	}

	/// Canonical byte form.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buf = vec![];
		self.write(&mut buf);
		buf
	}

	/// Decodes a node from exactly `bytes`. A single digest decodes as a
	/// pending node.
	pub fn from_bytes(bytes: &[u8]) -> Result<Node<D>, Error> {
		let mut reader = bytes;
		let node = Node::read(&mut reader, 2)?;
		ser::expect_eof(reader)?;
		Ok(node)
	}

	// Reads one child, then a second one if `max_children` allows and
	// there's data left.
	fn read(reader: &mut &[u8], max_children: u64) -> Result<Node<D>, Error> {
		let left = ser::read_digest(reader)?;
		let right = if max_children > 1 && !reader.is_empty() {
			Some(ser::read_digest(reader)?)
		} else {
			None
		};
		Ok(Node { left, right })
	}

	/// Digest of this node, the combinator applied to its canonical bytes.
	pub fn hash_with<H>(&self, hasher: &H) -> D
	where
		H: HashCombinator<Digest = D> + ?Sized,
	{
		let bytes = self.to_bytes();
		hasher.combine(&[bytes.as_slice()])
	}
}

/// A node or leaf tagged with its position, as persisted by digest.
///
/// Layout: a flag byte (1 for leaves, 0 for nodes), the position as a
/// varint (zig-zag for signed index types), the number of children as a
/// LEB128 varint, then the children in node codec form. Leaves have no
/// children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord<I, D> {
	position: Position<I>,
	node: Option<Node<D>>,
}

impl<I: IndexValue, D: Digest> NodeRecord<I, D> {
	/// Record for a leaf, which only carries its position.
	pub fn leaf(index: I) -> NodeRecord<I, D> {
		NodeRecord {
			position: Position::Leaf(index),
			node: None,
		}
	}

	/// Record for an internal node.
	pub fn node(index: I, node: Node<D>) -> NodeRecord<I, D> {
		NodeRecord {
			position: Position::Node(index),
			node: Some(node),
		}
	}

	/// Recorded position.
	pub fn position(&self) -> &Position<I> {
		&self.position
	}

	/// The node, None for leaf records.
	pub fn as_node(&self) -> Option<&Node<D>> {
		self.node.as_ref()
	}

	/// Consumes the record, returning the node if there is one.
	pub fn into_node(self) -> Option<Node<D>> {
		self.node
	}

	/// Binary form.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buf = vec![];
		let flag = if self.position.is_leaf() {
			LEAF_FLAG
		} else {
			NODE_FLAG
		};
		buf.push(flag);
		self.position.value().write_varint(&mut buf);
		match self.node {
			Some(ref node) => {
				ser::write_uvarint(&mut buf, node.children().len() as u64);
				node.write(&mut buf);
			}
			None => ser::write_uvarint(&mut buf, 0),
		}
		buf
	}

	/// Decodes a record from exactly `bytes`.
	pub fn from_bytes(bytes: &[u8]) -> Result<NodeRecord<I, D>, Error> {
		let mut reader = bytes;
		let flag = ser::read_u8(&mut reader)?;
		let index = I::read_varint(&mut reader)?;
		let count = ser::read_uvarint(&mut reader)?;
		let record = match (flag, count) {
			(LEAF_FLAG, 0) => NodeRecord::leaf(index),
			(NODE_FLAG, 1) | (NODE_FLAG, 2) => {
				let node = Node::read(&mut reader, count)?;
				if node.children().len() as u64 != count {
					return Err(Error::CorruptedData(format!(
						"expected {} children, got {}",
						count,
						node.children().len()
					)));
				}
				NodeRecord::node(index, node)
			}
			(LEAF_FLAG, n) | (NODE_FLAG, n) => {
				return Err(Error::CorruptedData(format!("invalid child count {}", n)));
			}
			(f, _) => return Err(Error::CorruptedData(format!("invalid node flag {}", f))),
		};
		ser::expect_eof(reader)?;
		Ok(record)
	}
}
