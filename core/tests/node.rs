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

mod common;

use mmr_core::hash::{Hash256, Sha256};
use mmr_core::index::Position;
use mmr_core::ser;
use mmr_core::{Digest, Node, NodeRecord};
use num_bigint::BigUint;

use crate::common::{h, mmr_with};

#[test]
fn complete_node_is_left_then_right() {
	let node = Node::new(h("left"), h("right"));
	let bytes = node.to_bytes();
	assert_eq!(bytes.len(), 64);
	assert_eq!(&bytes[..32], h("left").as_bytes());
	assert_eq!(&bytes[32..], h("right").as_bytes());
	assert_eq!(Node::<Hash256>::from_bytes(&bytes).unwrap(), node);
	assert!(!node.is_pending());
	assert_eq!(node.children(), vec![&h("left"), &h("right")]);
}

#[test]
fn pending_node_round_trip() {
	let node = Node::pending(h("only"));
	assert!(node.is_pending());
	assert_eq!(node.right(), None);
	let bytes = node.to_bytes();
	assert_eq!(bytes, h("only").to_bytes());
	assert_eq!(Node::<Hash256>::from_bytes(&bytes).unwrap(), node);
}

#[test]
fn node_record_layouts() {
	let record = NodeRecord::<u64, u32>::node(5, Node::new(1, 2));
	assert_eq!(record.to_bytes(), vec![0, 5, 2, 0, 0, 0, 1, 0, 0, 0, 2]);
	assert_eq!(NodeRecord::from_bytes(&record.to_bytes()).unwrap(), record);

	// zig-zag position
	let leaf = NodeRecord::<i32, u32>::leaf(3);
	assert_eq!(leaf.to_bytes(), vec![1, 6, 0]);
	assert_eq!(leaf.position(), &Position::Leaf(3));
	assert!(leaf.as_node().is_none());

	let pending = NodeRecord::<u32, u16>::node(300, Node::pending(9));
	assert_eq!(pending.to_bytes(), vec![0, 0xac, 0x02, 1, 0, 9]);
	assert_eq!(NodeRecord::from_bytes(&pending.to_bytes()).unwrap(), pending);
}

#[test]
fn big_positions() {
	let index = BigUint::from(1u8) << 100usize;
	let record = NodeRecord::<BigUint, String>::node(
		index.clone(),
		Node::new("a".to_owned(), "bc".to_owned()),
	);
	let decoded = NodeRecord::<BigUint, String>::from_bytes(&record.to_bytes()).unwrap();
	assert_eq!(decoded.position(), &Position::Node(index));
	assert_eq!(decoded.into_node().unwrap().right(), Some(&"bc".to_owned()));
}

#[test]
fn malformed_records() {
	type Rec = NodeRecord<u64, u32>;
	assert_eq!(Rec::from_bytes(&[]), Err(ser::Error::UnexpectedEof));
	// unknown flag
	assert!(matches!(
		Rec::from_bytes(&[2, 5, 0]),
		Err(ser::Error::CorruptedData(_))
	));
	// leaves carry no children
	assert!(Rec::from_bytes(&[1, 5, 1, 0, 0, 0, 1]).is_err());
	// nodes carry one or two
	assert!(Rec::from_bytes(&[0, 5, 0]).is_err());
	assert!(Rec::from_bytes(&[0, 5, 3, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3]).is_err());
	// count says two, only one present
	assert!(Rec::from_bytes(&[0, 5, 2, 0, 0, 0, 1]).is_err());
	// trailing bytes
	assert!(Rec::from_bytes(&[1, 5, 0, 0]).is_err());
	// truncated digest
	assert_eq!(
		NodeRecord::<u64, Hash256>::from_bytes(&[0, 5, 1, 0, 0, 0, 1]),
		Err(ser::Error::UnexpectedEof)
	);
}

#[test]
fn full_mountain_root_is_top_node_hash() {
	let l: Vec<Hash256> = (0..4).map(|i| h(&i.to_string())).collect();
	let n1 = Node::new(l[0], l[1]);
	let n3 = Node::new(l[2], l[3]);
	let n2 = Node::new(n1.hash_with(&Sha256), n3.hash_with(&Sha256));
	let four = mmr_with::<u64>(4);
	assert_eq!(four.root().unwrap(), n2.hash_with(&Sha256));
}
