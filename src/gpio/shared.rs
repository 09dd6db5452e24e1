//! # Shared port group
//!
//! The port operations are not synchronized internally. If a group has to be used from more than
//! one execution context, for example from the main loop and from an interrupt handler, place its
//! [`PortGroup`] into a [`SharedGroup`]. Every access then runs inside a critical section.
//!
//! ```ignore
//! static PORTB: SharedGroup<MmioGroup> = SharedGroup::new();
//!
//! let groups = ports.split();
//! PORTB.install(groups.b);
//!
//! #[interrupt]
//! fn EIC_EXTINT_3() {
//!     PORTB.with(|portb| portb.toggle_level(1 << 22));
//! }
//! ```
use super::port::PortGroup;
use core::cell::RefCell;
use critical_section::Mutex;

/// [`PortGroup`] guarded by a critical section
pub struct SharedGroup<R> {
    group: Mutex<RefCell<Option<PortGroup<R>>>>,
}

impl<R> SharedGroup<R> {
    pub const fn new() -> Self {
        SharedGroup {
            group: Mutex::new(RefCell::new(None)),
        }
    }

    /// Place a group into the container. Returns the previously installed group.
    pub fn install(&self, group: PortGroup<R>) -> Option<PortGroup<R>> {
        critical_section::with(|cs| self.group.borrow(cs).replace(Some(group)))
    }

    /// Remove the group from the container
    pub fn take(&self) -> Option<PortGroup<R>> {
        critical_section::with(|cs| self.group.borrow(cs).take())
    }

    /// Run `f` on the group inside a critical section. Returns [`None`] if no group is installed.
    ///
    /// Nesting calls on the same container is not possible: the inner call returns [`None`].
    pub fn with<T>(&self, f: impl FnOnce(&mut PortGroup<R>) -> T) -> Option<T> {
        critical_section::with(|cs| {
            let mut group = self.group.borrow(cs).try_borrow_mut().ok()?;
            Option::as_mut(&mut group).map(f)
        })
    }
}

impl<R> Default for SharedGroup<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::addr::Port;
    use crate::gpio::port::Direction;
    use crate::gpio::sim::SimGroup;

    #[test]
    fn access_through_critical_section() {
        let sim = SimGroup::default();
        let shared: SharedGroup<&SimGroup> = SharedGroup::new();
        assert_eq!(shared.with(|group| group.get_level()), None);
        assert!(shared.install(PortGroup::new(Port::D, &sim)).is_none());
        shared.with(|group| {
            group.set_direction(0b11, Direction::Out);
            group.set_level(0b01, true);
        });
        assert_eq!(shared.with(|group| group.get_level()), Some(0b01));
        // Nested access is refused instead of panicking
        let nested = shared.with(|_| shared.with(|group| group.get_level()));
        assert_eq!(nested, Some(None));
        let group = shared.take().unwrap();
        assert_eq!(group.port(), Port::D);
        assert!(shared.take().is_none());
    }
}
