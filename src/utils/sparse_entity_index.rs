use std::marker::PhantomData;

use crate::entity::Entity;

/// Cells per sparse page, should only have a single bit set.
pub(crate) const PER_PAGE: usize = 4096;

/// The "no packed position" cell value.
pub(crate) const NO_SLOT: usize = usize::MAX;

struct Page {
	slots: Box<[usize; PER_PAGE]>,
	in_use: usize,
}

/// Paged map from an entity's index bits to its packed position.
///
/// Pages are allocated lazily on the first link into them; reading an absent
/// page or cell yields `NO_SLOT` rather than being an error. A page with at
/// least one live back-pointer is never released.
pub(crate) struct SparseEntityIndex<EntityType: Entity> {
	pages: Vec<Option<Page>>,
	_phantom: PhantomData<EntityType>,
}

impl<EntityType: Entity> SparseEntityIndex<EntityType> {
	pub fn new() -> Self {
		Self {
			pages: vec![],
			_phantom: PhantomData,
		}
	}

	#[inline]
	fn page_offset(entity: EntityType) -> (usize, usize) {
		let idx = entity.idx();
		(idx / PER_PAGE, idx & (PER_PAGE - 1))
	}

	/// The packed position linked to `entity`'s index, `NO_SLOT` when absent.
	pub fn get(&self, entity: EntityType) -> usize {
		let (page_idx, offset) = Self::page_offset(entity);
		match self.pages.get(page_idx) {
			Some(Some(page)) => page.slots[offset],
			_ => NO_SLOT,
		}
	}

	/// Links `entity`'s index to a packed position, allocating its page on demand.
	pub fn link(&mut self, entity: EntityType, position: usize) {
		debug_assert_ne!(position, NO_SLOT);
		let (page_idx, offset) = Self::page_offset(entity);

		if page_idx >= self.pages.len() {
			self.pages.resize_with(page_idx + 1, || None);
		}
		let page = self.pages[page_idx].get_or_insert_with(|| Page {
			slots: Box::new([NO_SLOT; PER_PAGE]),
			in_use: 0,
		});

		debug_assert_eq!(page.slots[offset], NO_SLOT);
		page.slots[offset] = position;
		page.in_use += 1;
	}

	/// Redirects an existing link to a new packed position.
	pub fn set(&mut self, entity: EntityType, position: usize) {
		debug_assert_ne!(position, NO_SLOT);
		let (page_idx, offset) = Self::page_offset(entity);
		let page = self.pages[page_idx].as_mut().expect("entity is not linked");
		debug_assert_ne!(page.slots[offset], NO_SLOT);
		page.slots[offset] = position;
	}

	/// Clears the link for `entity`'s index, returning the packed position it held.
	pub fn unlink(&mut self, entity: EntityType) -> usize {
		let (page_idx, offset) = Self::page_offset(entity);
		let page = self.pages[page_idx].as_mut().expect("entity is not linked");
		let position = page.slots[offset];
		debug_assert_ne!(position, NO_SLOT);
		page.slots[offset] = NO_SLOT;
		page.in_use -= 1;
		position
	}

	/// Total cells addressable without allocating a new page.
	pub fn capacity(&self) -> usize {
		self.pages.len() * PER_PAGE
	}

	/// Resets every cell while keeping the page allocations.
	pub fn clear(&mut self) {
		for page in self.pages.iter_mut().flatten() {
			if page.in_use > 0 {
				page.slots.fill(NO_SLOT);
				page.in_use = 0;
			}
		}
	}

	/// Releases trailing pages with no live back-pointers.
	pub fn shrink_to_fit(&mut self) {
		while matches!(self.pages.last(), Some(None))
			|| matches!(self.pages.last(), Some(Some(page)) if page.in_use == 0)
		{
			self.pages.pop();
		}
		self.pages.shrink_to_fit();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn link_get_unlink() {
		let mut index = SparseEntityIndex::<u32>::new();
		let e = <u32 as Entity>::new(3);

		assert_eq!(index.get(e), NO_SLOT);
		index.link(e, 0);
		assert_eq!(index.get(e), 0);
		index.set(e, 9);
		assert_eq!(index.get(e), 9);
		assert_eq!(index.unlink(e), 9);
		assert_eq!(index.get(e), NO_SLOT);
	}

	#[test]
	fn pages_allocate_lazily() {
		let mut index = SparseEntityIndex::<u32>::new();
		assert_eq!(index.capacity(), 0);

		index.link(<u32 as Entity>::new(PER_PAGE * 2 + 1), 0);
		assert_eq!(index.capacity(), PER_PAGE * 3);
		// the skipped pages stay unallocated
		assert_eq!(index.get(<u32 as Entity>::new(0)), NO_SLOT);
		assert_eq!(index.get(<u32 as Entity>::new(PER_PAGE)), NO_SLOT);

		index.unlink(<u32 as Entity>::new(PER_PAGE * 2 + 1));
		index.shrink_to_fit();
		assert_eq!(index.capacity(), 0);
	}

	#[test]
	fn clear_keeps_pages() {
		let mut index = SparseEntityIndex::<u32>::new();
		index.link(<u32 as Entity>::new(1), 0);
		index.clear();
		assert_eq!(index.capacity(), PER_PAGE);
		assert_eq!(index.get(<u32 as Entity>::new(1)), NO_SLOT);
	}
}
