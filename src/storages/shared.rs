use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::component::Component;
use crate::entity::Entity;
use crate::storages::storage::Storage;

/// Shared ownership of a [`Storage`], the handle components keep when their
/// constructors or destructors need to call back into their own pool.
///
/// The plain `&mut` surface of [`Storage`] cannot allow that: a value
/// destructor runs while the pool is still exclusively borrowed. The handle
/// reorders the dance instead. Removal unlinks the slot and moves the value
/// out inside one borrow window, releases it, and only then drops the value;
/// a `Drop` impl upgrading a [`PoolWeak`] therefore observes a pool that is
/// consistent and no longer lists the erased entity. Construction runs the
/// value constructor with no borrow held at all, so it may emplace further
/// entities before the outer one is linked.
pub struct PoolHandle<ValueType: Component, EntityType: Entity = u32>(
	Rc<RefCell<Storage<ValueType, EntityType>>>,
);

impl<ValueType: Component, EntityType: Entity> Clone for PoolHandle<ValueType, EntityType> {
	fn clone(&self) -> Self {
		PoolHandle(Rc::clone(&self.0))
	}
}

impl<ValueType: Component, EntityType: Entity> fmt::Debug for PoolHandle<ValueType, EntityType> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PoolHandle").field(&Rc::as_ptr(&self.0)).finish()
	}
}

impl<ValueType: Component, EntityType: Entity> Default for PoolHandle<ValueType, EntityType> {
	fn default() -> Self {
		Self::new()
	}
}

impl<ValueType: Component, EntityType: Entity> PoolHandle<ValueType, EntityType> {
	pub fn new() -> Self {
		let this = Rc::new(RefCell::new(Storage::new()));
		let weak = Rc::downgrade(&this);
		this.borrow_mut().attach_this(weak);
		PoolHandle(this)
	}

	pub(crate) fn from_rc(rc: Rc<RefCell<Storage<ValueType, EntityType>>>) -> Self {
		PoolHandle(rc)
	}

	pub(crate) fn rc(&self) -> &Rc<RefCell<Storage<ValueType, EntityType>>> {
		&self.0
	}

	pub fn borrow(&self) -> Ref<'_, Storage<ValueType, EntityType>> {
		self.0.borrow()
	}

	pub fn borrow_mut(&self) -> RefMut<'_, Storage<ValueType, EntityType>> {
		self.0.borrow_mut()
	}

	pub fn downgrade(&self) -> PoolWeak<ValueType, EntityType> {
		PoolWeak(Rc::downgrade(&self.0))
	}

	pub fn emplace(&self, entity: EntityType, value: ValueType) {
		self.0.borrow_mut().emplace(entity, value);
	}

	/// Emplaces the value produced by `ctor`, which runs with no borrow of
	/// the pool held: it may emplace further entities through clones of this
	/// handle before the outer entity is linked.
	pub fn emplace_with<F: FnOnce() -> ValueType>(&self, entity: EntityType, ctor: F) {
		let value = ctor();
		self.0.borrow_mut().emplace(entity, value);
	}

	/// Erases a contained entity; its value is dropped after the pool's
	/// borrow is released, so the destructor may mutate the pool.
	pub fn erase(&self, entity: EntityType) {
		let value = self.0.borrow_mut().detach(entity);
		drop(value);
	}

	pub fn erase_many<I: IntoIterator<Item = EntityType>>(&self, entities: I) {
		for entity in entities {
			self.erase(entity);
		}
	}

	/// Erases the entity when present, with the same drop ordering as
	/// [`erase`](Self::erase); reports whether it was present.
	pub fn remove(&self, entity: EntityType) -> bool {
		let value = {
			let mut pool = self.0.borrow_mut();
			if pool.contains(entity) {
				Some(pool.detach(entity))
			} else {
				None
			}
		};
		value.is_some()
	}

	pub fn remove_many<I: IntoIterator<Item = EntityType>>(&self, entities: I) -> usize {
		entities.into_iter().filter(|&entity| self.remove(entity)).count()
	}

	/// Destroys every live value, one borrow window per value so destructors
	/// may erase or emplace other entities mid-flight, then resets the pool.
	pub fn clear(&self) {
		loop {
			let detached = self.0.borrow_mut().detach_last();
			match detached {
				Some(value) => drop(value),
				None => break,
			}
		}
		self.0.borrow_mut().clear();
	}
}

/// Non-owning counterpart of [`PoolHandle`], for components that must not
/// keep their own pool alive.
pub struct PoolWeak<ValueType: Component, EntityType: Entity = u32>(
	Weak<RefCell<Storage<ValueType, EntityType>>>,
);

impl<ValueType: Component, EntityType: Entity> Clone for PoolWeak<ValueType, EntityType> {
	fn clone(&self) -> Self {
		PoolWeak(Weak::clone(&self.0))
	}
}

impl<ValueType: Component, EntityType: Entity> Default for PoolWeak<ValueType, EntityType> {
	fn default() -> Self {
		Self::new()
	}
}

impl<ValueType: Component, EntityType: Entity> PoolWeak<ValueType, EntityType> {
	/// A weak handle to no pool at all; `upgrade` always yields `None`.
	pub fn new() -> Self {
		PoolWeak(Weak::new())
	}

	pub fn upgrade(&self) -> Option<PoolHandle<ValueType, EntityType>> {
		self.0.upgrade().map(PoolHandle)
	}
}
