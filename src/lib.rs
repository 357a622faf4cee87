//! Paged sparse-set component pools for entity-component-system runtimes.
//!
//! A [`Storage`] maps sparse integer entity identifiers to densely packed
//! component values: O(1) insertion, lookup and removal, iteration over a
//! contiguous range, and a choice between swap-and-pop removal (compact,
//! reorders the tail) and in-place removal (tombstones plus a freelist,
//! keeps every surviving value at a stable address). The untyped half of
//! that machinery is usable on its own as [`SparseSet`]; [`PoolHandle`]
//! wraps a storage for components whose constructors or destructors call
//! back into their own pool; [`Pools`] hands a type-erased set of pools to
//! outer layers.
//!
//! ```
//! use entpool::{Component, Entity, Storage};
//!
//! struct Position {
//! 	x: f32,
//! 	y: f32,
//! }
//! impl Component for Position {}
//!
//! let mut pool = Storage::<Position>::new();
//! let entity = <u32 as Entity>::new(0);
//!
//! pool.emplace(entity, Position { x: 1.0, y: 2.0 });
//! pool.patch(entity, |position| position.x += 1.0);
//! assert_eq!(pool.value(entity).x, 2.0);
//!
//! for (entity, position) in pool.each() {
//! 	assert_eq!(entity.idx(), 0);
//! 	assert_eq!(position.y, 2.0);
//! }
//! ```

pub mod component;
pub mod entity;
pub mod storages;
pub mod utils;

pub use component::{Component, DeletionPolicy};
pub use entity::Entity;
pub use storages::shared::{PoolHandle, PoolWeak};
pub use storages::sparse_set::SparseSet;
pub use storages::storage::Storage;
pub use storages::{ErasedPool, Pools, PoolsError};

mod instances {
	use crate::unsigned_integral_entity;
	unsigned_integral_entity!(
		u16,
		u8,
		0x0FFF,
		0xF000,
		12,
		"`u16` Entity, Index: 12 bits, Version: 4 bits, Max index: 4094"
	);
	unsigned_integral_entity!(
		u32,
		u16,
		0x000F_FFFF,
		0xFFF0_0000,
		20,
		"`u32` Entity, Index: 20 bits, Version: 12 bits, Max index: 1048574"
	);
	unsigned_integral_entity!(
		u64,
		u32,
		0x0000_0000_FFFF_FFFF,
		0xFFFF_FFFF_0000_0000,
		32,
		"`u64` Entity, Index: 32 bits, Version: 32 bits, Max index: 4294967294"
	);
}
