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

//! Leaf and node coordinates and the arithmetic relating them.

use std::fmt;

use super::IndexValue;

/// A coordinate in the mountain range, tagged with how to read it. Leaf and
/// node positions share the same numeric domain, so `Leaf(3)` and `Node(3)`
/// are unrelated locations and are stored under distinct keys.
///
/// Every relation that might step outside the representable range of `I`
/// returns an `Option`, `None` meaning there is no such position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position<I> {
	/// A leaf, numbered in insertion order from 0
	Leaf(I),
	/// An internal node
	Node(I),
}

/// Distance between a node and its sibling, `2^(height + 1)`.
fn node_dist<I: IndexValue>(x: &I) -> Option<I> {
	I::pow2(x.height() + 1)
}

fn node_is_right<I: IndexValue>(x: &I) -> bool {
	match node_dist(x) {
		Some(dist) => x.bit_and(&dist) == dist,
		None => false,
	}
}

fn node_sibling<I: IndexValue>(x: &I) -> Option<I> {
	node_dist(x).map(|dist| x.bit_xor(&dist))
}

fn node_right_up<I: IndexValue>(x: &I) -> Option<I> {
	if !node_is_right(x) {
		return None;
	}
	let parent = x.bit_xor(&I::pow2(x.height())?);
	if parent.is_zero() {
		None
	} else {
		Some(parent)
	}
}

fn node_top<I: IndexValue>(x: &I) -> I {
	let mut top = x.clone();
	let mut value = x.clone();
	let mut shift = match I::pow2(x.height()) {
		Some(shift) => shift,
		None => return top,
	};
	while !value.is_zero() && value.bit_and(&shift) == shift {
		top = value.clone();
		value = value.bit_xor(&shift);
		shift = match shift.checked_add(&shift) {
			Some(next) => next,
			None => break,
		};
	}
	top
}

impl<I: IndexValue> Position<I> {
	/// The raw coordinate.
	pub fn value(&self) -> &I {
		match self {
			Position::Leaf(v) | Position::Node(v) => v,
		}
	}

	/// Consumes the position, returning the raw coordinate.
	pub fn into_value(self) -> I {
		match self {
			Position::Leaf(v) | Position::Node(v) => v,
		}
	}

	/// Whether this is a leaf position.
	pub fn is_leaf(&self) -> bool {
		matches!(self, Position::Leaf(_))
	}

	/// Structural height, 0 for leaves and for the nodes directly above them.
	pub fn height(&self) -> u32 {
		match self {
			Position::Leaf(_) => 0,
			Position::Node(x) => x.height(),
		}
	}

	/// Whether this is the right member of its sibling pair.
	pub fn is_right(&self) -> bool {
		match self {
			Position::Leaf(v) => v.is_odd(),
			Position::Node(x) => node_is_right(x),
		}
	}

	/// The other member of the sibling pair.
	pub fn sibling(&self) -> Option<Position<I>> {
		match self {
			Position::Leaf(v) if v.is_odd() => v.checked_sub(&I::one()).map(Position::Leaf),
			Position::Leaf(v) => v.checked_add(&I::one()).map(Position::Leaf),
			Position::Node(x) => node_sibling(x).map(Position::Node),
		}
	}

	/// Descends to the left neighbouring mountain while walking peaks.
	pub fn left_branch(&self) -> Option<Position<I>> {
		match self {
			Position::Leaf(v) => {
				if v.is_odd() || v.is_zero() {
					None
				} else {
					v.checked_sub(&I::one()).map(Position::Node)
				}
			}
			Position::Node(x) => {
				let dist = node_dist(x)?;
				if *x > dist {
					x.checked_sub(&dist).map(Position::Node)
				} else {
					None
				}
			}
		}
	}

	/// Parent of a right position, None for left positions.
	pub fn right_up(&self) -> Option<Position<I>> {
		match self {
			Position::Leaf(v) if v.is_odd() => Some(Position::Node(v.clone())),
			Position::Leaf(_) => None,
			Position::Node(x) => node_right_up(x).map(Position::Node),
		}
	}

	/// Parent position, whichever side of the pair this is.
	pub fn up(&self) -> Option<Position<I>> {
		if self.is_right() {
			self.right_up()
		} else {
			self.sibling()?.right_up()
		}
	}

	/// The peak of the mountain this position currently belongs to.
	pub fn top(&self) -> Position<I> {
		match self {
			Position::Leaf(v) if !v.is_odd() => self.clone(),
			Position::Leaf(v) | Position::Node(v) => Position::Node(node_top(v)),
		}
	}

	/// Left and right children of a node, None for leaves.
	pub fn children(&self) -> Option<(Position<I>, Position<I>)> {
		match self {
			Position::Leaf(_) => None,
			Position::Node(x) => {
				let h = x.height();
				if h == 0 {
					let left = x.checked_sub(&I::one())?;
					Some((Position::Leaf(left), Position::Leaf(x.clone())))
				} else {
					let child_dist = I::pow2(h - 1)?;
					Some((
						Position::Node(x.checked_sub(&child_dist)?),
						Position::Node(x.checked_add(&child_dist)?),
					))
				}
			}
		}
	}
}

impl<I: fmt::Display> fmt::Display for Position<I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Position::Leaf(v) => write!(f, "leaf_{}", v),
			Position::Node(v) => write!(f, "node_{}", v),
		}
	}
}
