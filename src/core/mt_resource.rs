use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted value behind a read-write lock.
///
/// Voxel spaces hand out their member grids as `MtResource<VoxelGrid>`, and
/// callers that share a whole space between threads wrap it the same way:
/// lookups and meshing take the read side, structural edits and voxel
/// mutation take the write side.
///
/// A panic while a guard is held does not make the value unusable: the next
/// caller recovers the guard from the poisoned lock.
///
/// # Examples
///
/// ```
/// use voxel_space::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let shared = counter.clone();
///
/// std::thread::spawn(move || *shared.get_mut() += 1).join().unwrap();
/// assert_eq!(*counter.get(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Wraps a value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Shared read access. Blocks while a writer holds the lock.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive write access. Blocks while any reader or writer holds the lock.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether two handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync + Clone> MtResource<T> {
    /// Copies the current value out under a read lock.
    ///
    /// Background work uses this to get a stable view that later writers
    /// cannot change.
    pub fn snapshot(&self) -> T {
        self.get().clone()
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached() {
        let shared = MtResource::new(vec![1, 2, 3]);
        let copy = shared.snapshot();
        shared.get_mut().push(4);

        assert_eq!(copy, vec![1, 2, 3]);
        assert_eq!(shared.get().len(), 4);
    }

    #[test]
    fn survives_poisoning() {
        let shared = MtResource::new(5);
        let other = shared.clone();
        let _ = std::thread::spawn(move || {
            let _guard = other.get_mut();
            panic!("worker failed");
        })
        .join();

        assert_eq!(*shared.get(), 5);
        *shared.get_mut() = 6;
        assert_eq!(*shared.get(), 6);
    }
}
