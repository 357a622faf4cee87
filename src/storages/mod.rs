use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::component::{Component, DeletionPolicy};
use crate::entity::Entity;
use crate::storages::shared::PoolHandle;
use crate::storages::storage::Storage;
use crate::utils::unique_hasher::UniqueHasherBuilder;

pub(crate) mod dense_paged_values;
pub mod shared;
pub mod sparse_set;
pub mod storage;

/// Possible Errors given by a Pools container operation.
#[derive(Debug, PartialEq, Eq)]
pub enum PoolsError {
	PoolAlreadyExists(&'static str),
	PoolDoesNotExist(&'static str),
}

impl std::fmt::Display for PoolsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		use PoolsError::*;
		match self {
			PoolAlreadyExists(name) => write!(f, "Pool already exists for: {}", name),
			PoolDoesNotExist(name) => write!(f, "Pool does not exist for: {}", name),
		}
	}
}

impl std::error::Error for PoolsError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		use PoolsError::*;
		match self {
			PoolAlreadyExists(_name) => None,
			PoolDoesNotExist(_name) => None,
		}
	}
}

/// The untyped capability of a [`Storage`], the surface a registry or view
/// layer works against without knowing the component type.
pub trait ErasedPool<EntityType: Entity>: 'static {
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;

	/// A shared handle to this pool; panics when the pool was not created
	/// through a [`PoolHandle`].
	fn get_strong(&self) -> Rc<RefCell<dyn ErasedPool<EntityType>>>;

	fn component_type_id(&self) -> TypeId;
	fn component_type_name(&self) -> &'static str;
	fn deletion_policy(&self) -> DeletionPolicy;

	fn len(&self) -> usize;
	fn is_empty(&self) -> bool;
	fn contains(&self, entity: EntityType) -> bool;
	fn find(&self, entity: EntityType) -> Option<usize>;
	fn entities(&self) -> &[EntityType];

	/// Erased access to the stored value of a contained entity.
	fn value(&self, entity: EntityType) -> Option<&dyn Any>;

	fn erase(&mut self, entity: EntityType);
	fn remove(&mut self, entity: EntityType) -> bool;
	fn clear(&mut self);
}

impl<ValueType: Component, EntityType: Entity> ErasedPool<EntityType>
	for Storage<ValueType, EntityType>
{
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn get_strong(&self) -> Rc<RefCell<dyn ErasedPool<EntityType>>> {
		self.strong_self().expect("pool was not created through a PoolHandle")
	}

	fn component_type_id(&self) -> TypeId {
		TypeId::of::<ValueType>()
	}

	fn component_type_name(&self) -> &'static str {
		type_name::<ValueType>()
	}

	fn deletion_policy(&self) -> DeletionPolicy {
		self.policy()
	}

	fn len(&self) -> usize {
		Storage::len(self)
	}

	fn is_empty(&self) -> bool {
		Storage::is_empty(self)
	}

	fn contains(&self, entity: EntityType) -> bool {
		Storage::contains(self, entity)
	}

	fn find(&self, entity: EntityType) -> Option<usize> {
		Storage::find(self, entity)
	}

	fn entities(&self) -> &[EntityType] {
		self.data()
	}

	fn value(&self, entity: EntityType) -> Option<&dyn Any> {
		match self.get(entity) {
			Some(value) => Some(value),
			None => None,
		}
	}

	fn erase(&mut self, entity: EntityType) {
		Storage::erase(self, entity);
	}

	fn remove(&mut self, entity: EntityType) -> bool {
		Storage::remove(self, entity)
	}

	fn clear(&mut self) {
		Storage::clear(self);
	}
}

impl<EntityType: Entity> dyn ErasedPool<EntityType> {
	/// Recovers the typed handle behind an erased pool, `None` on a
	/// component type mismatch.
	pub fn get_strong_cast<ValueType: Component>(
		&self,
	) -> Option<PoolHandle<ValueType, EntityType>> {
		let storage = self.as_any().downcast_ref::<Storage<ValueType, EntityType>>()?;
		storage.strong_self().map(PoolHandle::from_rc)
	}
}

/// A set of pools keyed by component type, the boundary handed to outer
/// collaborators such as a registry.
pub struct Pools<EntityType: Entity> {
	pools: IndexMap<TypeId, Rc<RefCell<dyn ErasedPool<EntityType>>>, UniqueHasherBuilder>,
}

impl<EntityType: Entity> Default for Pools<EntityType> {
	fn default() -> Self {
		Self::new()
	}
}

impl<EntityType: Entity> Pools<EntityType> {
	pub fn new() -> Self {
		Self {
			pools: IndexMap::with_hasher(UniqueHasherBuilder),
		}
	}

	pub fn len(&self) -> usize {
		self.pools.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pools.is_empty()
	}

	pub fn contains<ValueType: Component>(&self) -> bool {
		self.pools.contains_key(&TypeId::of::<ValueType>())
	}

	/// Creates the pool for a component type not seen before.
	pub fn create<ValueType: Component>(
		&mut self,
	) -> Result<PoolHandle<ValueType, EntityType>, PoolsError> {
		let type_id = TypeId::of::<ValueType>();
		if self.pools.contains_key(&type_id) {
			return Err(PoolsError::PoolAlreadyExists(type_name::<ValueType>()));
		}
		let handle = PoolHandle::<ValueType, EntityType>::new();
		let erased: Rc<RefCell<dyn ErasedPool<EntityType>>> = handle.rc().clone();
		self.pools.insert(type_id, erased);
		Ok(handle)
	}

	/// The typed handle of an existing pool.
	pub fn get<ValueType: Component>(
		&self,
	) -> Result<PoolHandle<ValueType, EntityType>, PoolsError> {
		match self.pools.get(&TypeId::of::<ValueType>()) {
			Some(pool) => Ok(pool
				.borrow()
				.get_strong_cast::<ValueType>()
				.expect("type mismatch in pool map, shouldn't happen")),
			None => Err(PoolsError::PoolDoesNotExist(type_name::<ValueType>())),
		}
	}

	/// The typed handle of the pool, created on first use.
	pub fn ensure<ValueType: Component>(&mut self) -> PoolHandle<ValueType, EntityType> {
		if self.contains::<ValueType>() {
			self.get::<ValueType>().expect("pool vanished, shouldn't happen")
		} else {
			self.create::<ValueType>().expect("pool appeared, shouldn't happen")
		}
	}

	/// The erased pools, in creation order.
	pub fn iter(&self) -> impl Iterator<Item = &Rc<RefCell<dyn ErasedPool<EntityType>>>> {
		self.pools.values()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn e(idx: usize) -> u32 {
		<u32 as Entity>::new(idx)
	}

	#[test]
	fn create_then_get_shares_the_pool() {
		let mut pools = Pools::<u32>::new();
		assert!(pools.is_empty());

		let ints = pools.create::<i32>().unwrap();
		ints.emplace(e(3), 42);

		let again = pools.get::<i32>().unwrap();
		assert_eq!(again.borrow().value(e(3)), &42);
		assert_eq!(pools.len(), 1);

		assert_eq!(
			pools.create::<i32>().unwrap_err(),
			PoolsError::PoolAlreadyExists(std::any::type_name::<i32>())
		);
		assert_eq!(
			pools.get::<f64>().unwrap_err(),
			PoolsError::PoolDoesNotExist(std::any::type_name::<f64>())
		);
	}

	#[test]
	fn ensure_creates_once() {
		let mut pools = Pools::<u32>::new();

		pools.ensure::<i32>().emplace(e(0), 7);
		pools.ensure::<i32>().emplace(e(1), 8);

		assert_eq!(pools.len(), 1);
		assert_eq!(pools.get::<i32>().unwrap().borrow().len(), 2);
	}

	#[test]
	fn erased_surface_round_trips() {
		let mut pools = Pools::<u32>::new();
		pools.ensure::<i32>().emplace(e(3), 42);
		pools.ensure::<f32>();

		assert_eq!(pools.len(), 2);

		let erased = pools.iter().next().unwrap().clone();
		{
			let pool = erased.borrow();
			assert_eq!(pool.component_type_id(), TypeId::of::<i32>());
			assert_eq!(pool.component_type_name(), std::any::type_name::<i32>());
			assert_eq!(pool.deletion_policy(), DeletionPolicy::SwapAndPop);
			assert_eq!(pool.len(), 1);
			assert!(pool.contains(e(3)));
			assert_eq!(pool.find(e(3)), Some(0));
			assert_eq!(pool.entities(), &[e(3)]);
			assert_eq!(pool.value(e(3)).unwrap().downcast_ref::<i32>(), Some(&42));
			assert!(pool.value(e(4)).is_none());

			let typed = pool.get_strong_cast::<i32>().unwrap();
			assert_eq!(typed.borrow().value(e(3)), &42);
			assert!(pool.get_strong_cast::<f32>().is_none());
		}

		{
			let mut pool = erased.borrow_mut();
			assert!(!pool.remove(e(4)));
			pool.erase(e(3));
			assert!(pool.is_empty());
			pool.clear();
		}

		let strong = erased.borrow().get_strong();
		assert_eq!(strong.borrow().component_type_id(), TypeId::of::<i32>());
	}
}
