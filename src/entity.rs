/// Entity Type Trait to allow for a variety of entity identifier widths to be used.
///
/// An entity is an unsigned integer split into a low *index* part and a high
/// *version* part. Two bit patterns are reserved:
///
/// * `NULL`: index bits all set, never stored for a live entity.
/// * `TOMBSTONE`: version bits all set, marks an abandoned dense slot whose
///   index bits are free to carry the next position of an in-place freelist.
///
/// ```
/// # use entpool::entity::Entity;
/// let e = <u32 as Entity>::from_parts(42, 3);
/// assert_eq!(e.idx(), 42);
/// assert_eq!(e.version(), 3);
/// assert!(!e.is_null());
/// assert!(!e.is_tombstone());
/// assert!(<u32 as Entity>::NULL.is_null());
/// assert!(<u32 as Entity>::TOMBSTONE.is_tombstone());
/// let link = <u32 as Entity>::tombstone_with_idx(7);
/// assert!(link.is_tombstone());
/// assert_eq!(link.next_free_slot(), Some(7));
/// assert_eq!(<u32 as Entity>::TOMBSTONE.next_free_slot(), None);
/// ```
pub trait Entity:
	PartialEq + Eq + PartialOrd + Ord + core::hash::Hash + Copy + core::fmt::Debug + 'static
{
	/// The actual container type of this entity data, it should be Copy, and thus cheap to Copy.
	type StorageType;

	/// The type returned to hold the version, smaller than the StorageType in general.
	type VersionType: Copy + PartialEq + core::fmt::Debug;

	/// All index and version bits set, the reserved "no entity" pattern.
	const NULL: Self;

	/// The canonical tombstone pattern, equal to `NULL` but compared by its version bits.
	const TOMBSTONE: Self;

	/// Constructs an Entity Handle using the given index and a 0 version.
	fn new(idx: usize) -> Self;

	/// Constructs an Entity Handle from an index and a version.
	fn from_parts(idx: usize, version: Self::VersionType) -> Self;

	/// Returns the index of this entity.
	fn idx(self) -> usize;

	/// Returns the version of this entity.
	fn version(self) -> Self::VersionType;

	/// Return true if the index bits hold the reserved all-ones pattern.
	fn is_null(self) -> bool;

	/// Return true if the version bits hold the reserved all-ones pattern.
	fn is_tombstone(self) -> bool;

	/// Builds a tombstone whose index bits carry a packed position, the
	/// encoding used to thread a freelist through a dense array.
	fn tombstone_with_idx(idx: usize) -> Self;

	/// Decodes a freelist link, `None` when this is the chain terminator.
	fn next_free_slot(self) -> Option<usize>;
}

#[macro_export]
macro_rules! unsigned_integral_entity {
	($INT:ident, $INT_VERSION:ident, $INDEX_MASK:literal, $VERSION_MASK:literal, $SHIFT_BITS:literal, $DOC:literal) => {
		#[doc = $DOC]
		impl $crate::entity::Entity for $INT {
			type StorageType = $INT;
			type VersionType = $INT_VERSION;

			const NULL: Self = <$INT>::MAX;
			const TOMBSTONE: Self = <$INT>::MAX;

			fn new(idx: usize) -> Self {
				debug_assert!(idx < $INDEX_MASK as usize);
				idx as $INT
			}

			fn from_parts(idx: usize, version: $INT_VERSION) -> Self {
				debug_assert!(idx <= $INDEX_MASK as usize);
				(version as $INT).wrapping_shl($SHIFT_BITS) | (idx as $INT & $INDEX_MASK)
			}

			fn idx(self) -> usize {
				(self & $INDEX_MASK) as usize
			}

			fn version(self) -> Self::VersionType {
				(self & $VERSION_MASK).wrapping_shr($SHIFT_BITS) as $INT_VERSION
			}

			#[allow(clippy::verbose_bit_mask)]
			fn is_null(self) -> bool {
				(self & $INDEX_MASK) == $INDEX_MASK
			}

			#[allow(clippy::verbose_bit_mask)]
			fn is_tombstone(self) -> bool {
				(self & $VERSION_MASK) == $VERSION_MASK
			}

			fn tombstone_with_idx(idx: usize) -> Self {
				debug_assert!(idx <= $INDEX_MASK as usize);
				$VERSION_MASK | (idx as $INT & $INDEX_MASK)
			}

			fn next_free_slot(self) -> Option<usize> {
				debug_assert!(self.is_tombstone());
				if (self & $INDEX_MASK) == $INDEX_MASK {
					None
				} else {
					Some((self & $INDEX_MASK) as usize)
				}
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use crate::entity::Entity;

	#[test]
	fn index_and_version_split() {
		let e = <u32 as Entity>::from_parts(1048574, 4094);
		assert_eq!(e.idx(), 1048574);
		assert_eq!(e.version(), 4094);
		assert!(!e.is_null());
		assert!(!e.is_tombstone());

		let e = <u64 as Entity>::from_parts(7, 9);
		assert_eq!(e.idx(), 7);
		assert_eq!(e.version(), 9);

		let e = <u16 as Entity>::from_parts(4094, 14);
		assert_eq!(e.idx(), 4094);
		assert_eq!(e.version(), 14);
	}

	#[test]
	fn reserved_patterns() {
		assert!(<u32 as Entity>::NULL.is_null());
		assert!(<u32 as Entity>::NULL.is_tombstone());
		assert!(<u64 as Entity>::TOMBSTONE.is_tombstone());
		assert!(!<u32 as Entity>::new(0).is_null());
		assert!(!<u32 as Entity>::new(0).is_tombstone());
		// all version bits set reads as a tombstone no matter the index
		assert!(<u32 as Entity>::from_parts(42, 4095).is_tombstone());
	}

	#[test]
	fn freelist_links() {
		let link = <u32 as Entity>::tombstone_with_idx(3);
		assert!(link.is_tombstone());
		assert_eq!(link.next_free_slot(), Some(3));
		assert_eq!(<u32 as Entity>::TOMBSTONE.next_free_slot(), None);

		let link = <u16 as Entity>::tombstone_with_idx(0);
		assert_eq!(link.next_free_slot(), Some(0));
	}
}
