//! A ref-counted handle to a resource whose last release must run cleanup
//! (closing a backend device, stopping a worker thread, freeing backend
//! buffer IDs). This plays the role the teacher's `Handle<T>`/`Resource`
//! pair plays for FMOD's C-allocated opaque types; since dsoal's resources
//! are plain Rust values rather than pointers returned by a C allocator, we
//! build it on [`std::sync::Arc`] instead of a raw-pointer `Resource` trait,
//! but keep the same contract: the handle is `Clone`, and the resource's
//! teardown logic runs exactly once, when the last handle is dropped.

use std::{
    fmt,
    sync::{Arc, Weak},
};

/// A type whose teardown has side effects and must run at most once, when
/// the last [`Handle`] referencing it is dropped.
pub(crate) trait Resource: fmt::Debug {
    /// Run teardown. Called by `Handle`'s `Drop` impl when the strong count
    /// reaches zero. Implementations must not panic; log and continue.
    fn release(&self);
}

/// A cloneable, ref-counted handle to a [`Resource`].
///
/// Cloning bumps the reference count; dropping the last clone calls
/// [`Resource::release`] before the value itself is deallocated.
pub(crate) struct Handle<T: Resource>(Arc<T>);

impl<T: Resource> Handle<T> {
    pub(crate) fn new(value: T) -> Self {
        log::trace!("created {value:?}");
        Handle(Arc::new(value))
    }

    /// Number of live handles referencing this resource, including `self`.
    pub(crate) fn ref_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }

    /// True if `self` is the only handle to this resource.
    pub(crate) fn is_unique(this: &Self) -> bool {
        Arc::strong_count(&this.0) == 1
    }

    /// A non-owning reference, for back-pointers that must not keep the
    /// resource alive (e.g. a worker thread's reference to the share that
    /// owns it).
    pub(crate) fn downgrade(this: &Self) -> Weak<T> {
        Arc::downgrade(&this.0)
    }

    /// Re-wrap an already-live `Arc`, bumping its strong count. Unlike
    /// [`Handle::new`] this does not log a construction event, since the
    /// resource was not just created — a process-wide registry is handing
    /// out an existing handle.
    pub(crate) fn from_arc(arc: Arc<T>) -> Self {
        Handle(arc)
    }
}

impl<T: Resource> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle(Arc::clone(&self.0))
    }
}

impl<T: Resource> std::ops::Deref for Handle<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Resource> Drop for Handle<T> {
    fn drop(&mut self) {
        if Arc::strong_count(&self.0) == 1 {
            self.0.release();
        }
    }
}

impl<T: Resource> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Resource> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl<T: Resource> Eq for Handle<T> {}
