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

use mmr_core::index::Position::{self, Leaf, Node};
use mmr_core::index::{peaks, peaks_for_size, IndexValue};
use num_bigint::BigUint;

#[test]
fn some_peaks() {
	assert_eq!(peaks(&Leaf(0u64)), vec![Leaf(0)]);
	assert_eq!(peaks(&Leaf(1u64)), vec![Node(1)]);
	assert_eq!(peaks(&Leaf(2u64)), vec![Leaf(2), Node(1)]);
	assert_eq!(peaks(&Leaf(3u64)), vec![Node(2)]);
	assert_eq!(peaks(&Leaf(6u64)), vec![Leaf(6), Node(5), Node(2)]);
	assert_eq!(peaks(&Leaf(7u64)), vec![Node(4)]);
	assert_eq!(peaks(&Leaf(8u64)), vec![Leaf(8), Node(4)]);
	assert_eq!(peaks(&Leaf(9u64)), vec![Node(9), Node(4)]);
	assert_eq!(peaks(&Leaf(10u64)), vec![Leaf(10), Node(9), Node(4)]);
	assert_eq!(
		peaks(&Leaf(14u64)),
		vec![Leaf(14), Node(13), Node(10), Node(4)]
	);
}

#[test]
fn peaks_by_size() {
	assert_eq!(peaks_for_size(&0u64), vec![]);
	assert_eq!(peaks_for_size(&-3i32), vec![]);
	assert_eq!(peaks_for_size(&7u64), peaks(&Leaf(6)));
	assert_eq!(peaks_for_size(&1u32), vec![Leaf(0)]);
}

// a leaf peak covers one leaf, a node peak of height h covers 2^(h+1)
fn width(peak: &Position<u64>) -> u64 {
	match peak {
		Leaf(_) => 1,
		Node(_) => 1 << (peak.height() + 1),
	}
}

#[test]
fn peaks_partition_the_leaves() {
	for size in 1..1000u64 {
		let peaks = peaks_for_size(&size);
		assert_eq!(peaks.len() as u32, size.count_ones(), "size {}", size);
		assert_eq!(peaks.iter().map(width).sum::<u64>(), size);

		// most recent mountain first, so each peak covers lower leaves
		// than the one before it, with strictly growing widths
		for pair in peaks.windows(2) {
			assert!(width(&pair[0]) < width(&pair[1]), "size {}", size);
		}
		for peak in &peaks {
			assert_eq!(&peak.top(), peak);
			if !peak.is_leaf() {
				assert!(!peak.is_right());
			}
		}
	}
}

#[test]
fn peak_order_is_stable() {
	for size in 1..200u64 {
		assert_eq!(peaks_for_size(&size), peaks_for_size(&size));
	}
}

fn as_u64<I: IndexValue>(peaks: Vec<Position<I>>) -> Vec<Position<u64>> {
	peaks
		.into_iter()
		.map(|p| match p {
			Leaf(v) => Leaf(v.to_u64().unwrap()),
			Node(v) => Node(v.to_u64().unwrap()),
		})
		.collect()
}

#[test]
fn peaks_agree_across_widths() {
	for size in 0..300u64 {
		let expected = peaks_for_size(&size);
		assert_eq!(as_u64(peaks_for_size(&(size as u32))), expected);
		assert_eq!(as_u64(peaks_for_size(&(size as i32))), expected);
		assert_eq!(as_u64(peaks_for_size(&(size as i64))), expected);
		assert_eq!(as_u64(peaks_for_size(&BigUint::from(size))), expected);
	}
}

#[test]
fn peaks_of_huge_range() {
	// 2^80 - 1 leaves, one mountain per bit
	let one = BigUint::from(1u32);
	let size: BigUint = (&one << 80u32) - &one;
	let peaks = peaks_for_size(&size);
	assert_eq!(peaks.len(), 80);
	assert_eq!(peaks.last(), Some(&Node(&one << 78u32)));
}
