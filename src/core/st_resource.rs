use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// `StResource` lets two owners on the same thread share one value: the engine uses it to
/// hand a [`Timer`](crate::engine_state::profiling::Timer) to the chunk grid as its update
/// observer while the driver keeps a clone to read the collected statistics.
///
/// # Type Parameters
/// - `T`: The type of the contained resource
///
/// # Examples
///
/// ## Cloning and Shared Ownership
/// ```
/// use tile_streamer::core::StResource;
///
/// let resource = StResource::new(vec![1, 2, 3]);
/// let clone = resource.clone();
///
/// clone.get_mut().push(4);
/// assert_eq!(resource.get().len(), 4);
/// assert_eq!(resource.owners(), 2);
/// ```
///
/// # Panics
/// - Panics if a mutable borrow is requested while any other borrow is alive
/// - Panics if a shared borrow is requested while a mutable borrow is alive
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Returns a guard that allows reading the contained value.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed mutably.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Returns a guard that allows modifying the contained value.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Number of handles currently sharing the value.
    pub fn owners(&self) -> usize {
        Rc::strong_count(&self.resource)
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: Default> Default for StResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
