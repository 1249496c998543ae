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

use super::{IndexValue, Position};

/// Peaks of the mountain range whose last leaf is `last`, ordered from the
/// most recent mountain (highest leaf positions) down to the oldest one.
/// Root bagging and proof partitioning both rely on exactly this order.
pub fn peaks<I: IndexValue>(last: &Position<I>) -> Vec<Position<I>> {
	let mut peaks = vec![];
	let mut next = Some(last.clone());
	while let Some(pos) = next {
		let peak = pos.top();
		next = peak.left_branch();
		peaks.push(peak);
	}
	peaks
}

/// Peaks of a mountain range holding `size` leaves, empty when `size` is 0.
pub fn peaks_for_size<I: IndexValue>(size: &I) -> Vec<Position<I>> {
	if *size <= I::zero() {
		return vec![];
	}
	match size.checked_sub(&I::one()) {
		Some(last) => peaks(&Position::Leaf(last)),
		None => vec![],
	}
}
