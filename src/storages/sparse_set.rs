use crate::component::DeletionPolicy;
use crate::entity::Entity;
use crate::utils::sparse_entity_index::{SparseEntityIndex, NO_SLOT};

/// The freelist head value meaning "no reusable slot".
pub(crate) const NO_FREE_SLOT: usize = usize::MAX;

/// A bijection between sparse entity identifiers and a dense packed range.
///
/// The dense side is an ordered `Vec` of entities whose position is the
/// entity's *packed index*; the sparse side is a paged map from index bits
/// back to that position, so `contains`, `index`, insertion and removal are
/// all O(1).
///
/// Removal follows the set's [`DeletionPolicy`]:
///
/// * `SwapAndPop` exchanges the victim with the last dense slot and pops,
///   which keeps the range contiguous but may reorder one survivor.
/// * `InPlace` overwrites the slot with a tombstone and threads it onto a
///   freelist running through the dense array itself: the tombstone's index
///   bits name the next free position and `head` names the chain's first
///   link. Later insertions consume the chain head first, so no surviving
///   slot ever moves.
pub struct SparseSet<EntityType: Entity> {
	sparse: SparseEntityIndex<EntityType>,
	dense: Vec<EntityType>,
	head: usize,
	free: usize,
	policy: DeletionPolicy,
}

impl<EntityType: Entity> Default for SparseSet<EntityType> {
	fn default() -> Self {
		Self::new(DeletionPolicy::SwapAndPop)
	}
}

impl<EntityType: Entity> SparseSet<EntityType> {
	pub fn new(policy: DeletionPolicy) -> Self {
		Self {
			sparse: SparseEntityIndex::new(),
			dense: vec![],
			head: NO_FREE_SLOT,
			free: 0,
			policy,
		}
	}

	pub fn policy(&self) -> DeletionPolicy {
		self.policy
	}

	/// Number of dense slots, tombstones included.
	pub fn len(&self) -> usize {
		self.dense.len()
	}

	pub fn is_empty(&self) -> bool {
		self.dense.is_empty()
	}

	/// Number of tombstoned slots awaiting reuse or [`compact_with`](Self::compact_with).
	pub fn free_slots(&self) -> usize {
		self.free
	}

	pub fn contains(&self, entity: EntityType) -> bool {
		if entity.is_null() || entity.is_tombstone() {
			return false;
		}
		let position = self.sparse.get(entity);
		position != NO_SLOT && self.dense[position] == entity
	}

	/// The packed index of a contained entity.
	pub fn index(&self, entity: EntityType) -> usize {
		assert!(self.contains(entity), "entity is not in the set");
		self.sparse.get(entity)
	}

	/// The packed index of an entity, `None` when absent.
	pub fn find(&self, entity: EntityType) -> Option<usize> {
		if self.contains(entity) {
			Some(self.sparse.get(entity))
		} else {
			None
		}
	}

	/// The dense array, tombstones included under the in-place policy.
	pub fn data(&self) -> &[EntityType] {
		&self.dense
	}

	/// The entity at a packed index, `NULL` when out of bounds.
	pub fn at(&self, position: usize) -> EntityType {
		self.dense.get(position).copied().unwrap_or(EntityType::NULL)
	}

	/// Live entities in reverse dense order (most recently placed first).
	pub fn entities(&self) -> impl DoubleEndedIterator<Item = EntityType> + '_ {
		self.dense.iter().rev().copied().filter(|entity| !entity.is_tombstone())
	}

	/// Appends an entity, reusing the freelist head under the in-place
	/// policy, and returns its packed index.
	pub fn push(&mut self, entity: EntityType) -> usize {
		assert!(!entity.is_null() && !entity.is_tombstone(), "reserved entity pattern");
		assert!(!self.contains(entity), "entity is already in the set");

		let position = if self.head != NO_FREE_SLOT {
			let position = self.head;
			self.head = self.dense[position].next_free_slot().unwrap_or(NO_FREE_SLOT);
			self.dense[position] = entity;
			self.free -= 1;
			position
		} else {
			self.dense.push(entity);
			self.dense.len() - 1
		};
		self.sparse.link(entity, position);
		position
	}

	/// Bulk push in forward order; freed slots are consumed in their current
	/// freelist order, so a range pushed right after a same-sized erase lands
	/// in the freed slots LIFO relative to the erase order.
	pub fn extend<I: IntoIterator<Item = EntityType>>(&mut self, entities: I) {
		for entity in entities {
			self.push(entity);
		}
	}

	/// Removes a contained entity according to the deletion policy.
	pub fn erase(&mut self, entity: EntityType) {
		assert!(self.contains(entity), "entity is not in the set");
		let position = self.sparse.unlink(entity);
		match self.policy {
			DeletionPolicy::SwapAndPop => {
				let last = self.dense.len() - 1;
				if position != last {
					let moved = self.dense[last];
					self.dense[position] = moved;
					self.sparse.set(moved, position);
				}
				self.dense.pop();
			}
			DeletionPolicy::InPlace => {
				self.dense[position] = match self.head {
					NO_FREE_SLOT => EntityType::TOMBSTONE,
					next => EntityType::tombstone_with_idx(next),
				};
				self.head = position;
				self.free += 1;
			}
		}
	}

	pub fn erase_many<I: IntoIterator<Item = EntityType>>(&mut self, entities: I) {
		for entity in entities {
			self.erase(entity);
		}
	}

	/// Erases the entity when present, reporting whether it was.
	pub fn remove(&mut self, entity: EntityType) -> bool {
		if self.contains(entity) {
			self.erase(entity);
			true
		} else {
			false
		}
	}

	/// Removes any contained entities of the range, returning how many were.
	pub fn remove_many<I: IntoIterator<Item = EntityType>>(&mut self, entities: I) -> usize {
		entities.into_iter().filter(|&entity| self.remove(entity)).count()
	}

	/// Exchanges the packed positions of two contained entities.
	pub fn swap_elements(&mut self, lhs: EntityType, rhs: EntityType) {
		let from = self.index(lhs);
		let to = self.index(rhs);
		self.swap_dense(from, to);
	}

	/// Swaps two live dense slots and rethreads their sparse back-pointers.
	pub(crate) fn swap_dense(&mut self, lhs: usize, rhs: usize) {
		debug_assert!(!self.dense[lhs].is_tombstone());
		debug_assert!(!self.dense[rhs].is_tombstone());
		self.dense.swap(lhs, rhs);
		self.sparse.set(self.dense[lhs], lhs);
		self.sparse.set(self.dense[rhs], rhs);
	}

	/// Collapses the freelist by pulling tail-most live entries into
	/// tombstoned positions, calling `relocate(from, to)` for each move so a
	/// parallel payload array can follow, then truncates the dense range.
	/// Returns the new length. No-op under swap-and-pop.
	pub(crate) fn compact_with<F: FnMut(usize, usize)>(&mut self, mut relocate: F) -> usize {
		if self.policy != DeletionPolicy::InPlace {
			return self.dense.len();
		}

		let mut from = self.dense.len();
		while from > 0 && self.dense[from - 1].is_tombstone() {
			from -= 1;
		}

		let mut next = self.head;
		while next != NO_FREE_SLOT && from > 0 {
			let to = next;
			next = self.dense[to].next_free_slot().unwrap_or(NO_FREE_SLOT);
			if to < from {
				from -= 1;
				let entity = self.dense[from];
				relocate(from, to);
				self.dense[to] = entity;
				self.sparse.set(entity, to);
				while from > 0 && self.dense[from - 1].is_tombstone() {
					from -= 1;
				}
			}
		}

		self.head = NO_FREE_SLOT;
		self.free = 0;
		self.dense.truncate(from);
		from
	}

	/// Resets dense, sparse and freelist state; capacity is retained.
	pub fn clear(&mut self) {
		self.sparse.clear();
		self.dense.clear();
		self.head = NO_FREE_SLOT;
		self.free = 0;
	}

	/// Reserve room for `additional` more entities on the dense side.
	pub fn reserve(&mut self, additional: usize) {
		self.dense.reserve(additional);
	}

	pub fn capacity(&self) -> usize {
		self.dense.capacity()
	}

	/// Sparse cells addressable without allocating a page, a multiple of the
	/// sparse page size.
	pub fn sparse_capacity(&self) -> usize {
		self.sparse.capacity()
	}

	pub fn shrink_to_fit(&mut self) {
		self.dense.shrink_to_fit();
		self.sparse.shrink_to_fit();
	}
}

impl<EntityType: Entity> AsRef<SparseSet<EntityType>> for SparseSet<EntityType> {
	fn as_ref(&self) -> &SparseSet<EntityType> {
		self
	}
}
