//! Per-kind widget instance registries.
//!
//! Each widget kind owns one [`WidgetRegistry`]. Instances are appended at
//! construction and live as long as the display; there is no removal path.
//! Every accepted update visits all instances in insertion order so each
//! physical display shows the same state.

use core::marker::PhantomData;

use heapless::Vec;

use crate::error::Error;
use crate::log_error;

/// Handle to one instance of widget kind `W`.
pub struct WidgetHandle<W> {
    index: u8,
    _kind: PhantomData<fn() -> W>,
}

impl<W> WidgetHandle<W> {
    /// Insertion index inside the kind's registry.
    #[inline]
    pub const fn index(self) -> usize { self.index as usize }
}

impl<W> Clone for WidgetHandle<W> {
    fn clone(&self) -> Self { *self }
}

impl<W> Copy for WidgetHandle<W> {}

impl<W> PartialEq for WidgetHandle<W> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.index == other.index
    }
}

impl<W> Eq for WidgetHandle<W> {}

impl<W> core::fmt::Debug for WidgetHandle<W> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "WidgetHandle({})", self.index)
    }
}

/// Append-only list of live instances of one widget kind.
pub struct WidgetRegistry<W, const N: usize> {
    instances: Vec<W, N>,
}

impl<W, const N: usize> WidgetRegistry<W, N> {
    pub const fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// Fail with `InstanceRegistryFull` when no slot is left.
    ///
    /// Checked before a widget builds its drawables, so a rejected instance
    /// leaves nothing behind on the surface.
    pub fn check_capacity(&self) -> Result<(), Error> {
        if self.is_full() {
            log_error!("instance registry full ({})", N);
            return Err(Error::InstanceRegistryFull);
        }
        Ok(())
    }

    /// Register a freshly constructed instance.
    pub fn append(
        &mut self,
        widget: W,
    ) -> Result<WidgetHandle<W>, Error> {
        let index = self.instances.len();
        if self.instances.push(widget).is_err() {
            log_error!("instance registry full ({})", N);
            return Err(Error::InstanceRegistryFull);
        }
        Ok(WidgetHandle {
            index: index as u8,
            _kind: PhantomData,
        })
    }

    pub fn get(
        &self,
        handle: WidgetHandle<W>,
    ) -> Option<&W> {
        self.instances.get(handle.index())
    }

    pub fn get_mut(
        &mut self,
        handle: WidgetHandle<W>,
    ) -> Option<&mut W> {
        self.instances.get_mut(handle.index())
    }

    /// Instance at insertion `index`.
    pub fn at_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut W> {
        self.instances.get_mut(index)
    }

    /// Apply `f` to every instance in insertion order.
    pub fn for_each_mut(
        &mut self,
        mut f: impl FnMut(&mut W),
    ) {
        for widget in &mut self.instances {
            f(widget);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &W> { self.instances.iter() }

    #[inline]
    pub fn len(&self) -> usize { self.instances.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.instances.is_empty() }

    #[inline]
    pub fn is_full(&self) -> bool { self.instances.is_full() }
}

impl<W, const N: usize> Default for WidgetRegistry<W, N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
