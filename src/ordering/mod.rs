//! Ordering Engine - pure reorder planning over a dense, zero-based sequence.
//!
//! Nothing here suspends or touches the store. Every operation returns the new
//! sequence together with the minimal set of position writes needed to persist
//! it. Invalid or redundant requests come back as no-ops, never as errors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::OrderedRecord;

/// Direction of a button-driven move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// One position write to persist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: String,
    pub position: u32,
}

/// Why a reorder request left the sequence untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOp {
    /// Source and (clamped) target are the same slot.
    SamePosition,
    /// The source index is outside the sequence.
    OutOfRange,
    /// Moving the first element up or the last element down.
    AtBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Unchanged(NoOp),
}

/// Result of planning a reorder.
#[derive(Debug, Clone)]
pub struct Reorder<R> {
    /// The sequence to display, positions renumbered.
    pub sequence: Vec<R>,
    /// Only the records whose stored position changes.
    pub diff: Vec<PositionUpdate>,
    pub outcome: MoveOutcome,
}

impl<R> Reorder<R> {
    fn unchanged(sequence: Vec<R>, reason: NoOp) -> Self {
        Self {
            sequence,
            diff: Vec::new(),
            outcome: MoveOutcome::Unchanged(reason),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Unchanged(_))
    }
}

/// Remove the element at `from` and reinsert it at `to`.
///
/// `to` is clamped into `[0, len - 1]`. An out-of-range `from`, or a `to` that
/// lands back on `from`, is a no-op.
pub fn move_by_index<R: OrderedRecord>(sequence: &[R], from: usize, to: usize) -> Reorder<R> {
    if from >= sequence.len() {
        return Reorder::unchanged(sequence.to_vec(), NoOp::OutOfRange);
    }

    let to = to.min(sequence.len() - 1);
    if to == from {
        return Reorder::unchanged(sequence.to_vec(), NoOp::SamePosition);
    }

    let mut reordered = sequence.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);

    tracing::debug!(collection = R::COLLECTION, from, to, "planned move");
    finish(sequence, reordered)
}

/// Swap the element at `index` with its neighbour.
///
/// `Up` on the first element and `Down` on the last are no-ops.
pub fn swap_adjacent<R: OrderedRecord>(
    sequence: &[R],
    index: usize,
    direction: Direction,
) -> Reorder<R> {
    if index >= sequence.len() {
        return Reorder::unchanged(sequence.to_vec(), NoOp::OutOfRange);
    }

    let target = match direction {
        Direction::Up if index == 0 => None,
        Direction::Up => Some(index - 1),
        Direction::Down if index + 1 == sequence.len() => None,
        Direction::Down => Some(index + 1),
    };
    let Some(target) = target else {
        return Reorder::unchanged(sequence.to_vec(), NoOp::AtBoundary);
    };

    let mut reordered = sequence.to_vec();
    reordered.swap(index, target);

    tracing::debug!(collection = R::COLLECTION, index, ?direction, "planned swap");
    finish(sequence, reordered)
}

/// Position writes that turn `old` into `new`.
///
/// A record's target position is its index in `new`; it is written only when
/// that differs from the position it holds in `old`. Records absent from `old`
/// are always written.
pub fn diff_positions<R: OrderedRecord>(old: &[R], new: &[R]) -> Vec<PositionUpdate> {
    let stored: HashMap<&str, u32> = old.iter().map(|r| (r.id(), r.position())).collect();

    new.iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let position = to_position(index);
            match stored.get(record.id()) {
                Some(&current) if current == position => None,
                _ => Some(PositionUpdate {
                    id: record.id().to_string(),
                    position,
                }),
            }
        })
        .collect()
}

/// Renumber positions densely, keeping the current order.
pub fn compact<R: OrderedRecord>(sequence: &[R]) -> Vec<R> {
    let mut compacted = sequence.to_vec();
    renumber(&mut compacted);
    compacted
}

/// Assign `position = index` to every record.
pub fn renumber<R: OrderedRecord>(sequence: &mut [R]) {
    for (index, record) in sequence.iter_mut().enumerate() {
        record.set_position(to_position(index));
    }
}

fn finish<R: OrderedRecord>(old: &[R], mut reordered: Vec<R>) -> Reorder<R> {
    let diff = diff_positions(old, &reordered);
    renumber(&mut reordered);
    Reorder {
        sequence: reordered,
        diff,
        outcome: MoveOutcome::Moved,
    }
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
