//! Per-instance render state tracking for redundant-update suppression.
//!
//! Every widget instance keeps the last state it actually drew in a
//! [`RenderedState`]. Before touching the surface, the update path asks the
//! gate whether the new state differs:
//!
//! | Previous | Next         | Verdict                                   |
//! |----------|--------------|-------------------------------------------|
//! | none     | any          | [`Verdict::First`] (always proceeds)      |
//! | `a`      | `b != a`     | [`Verdict::Changed`]                      |
//! | `a`      | `a`          | [`Verdict::Unchanged`] (no-op)            |
//!
//! Equality is the state type's `PartialEq`: field-wise for bitmask states,
//! exact content for formatted text. The first verdict is distinct from a
//! change so text widgets can set content directly instead of animating away
//! from nothing.
//!
//! Mid-animation poses are never stored here; the rendered state always
//! describes the pose the instance is heading to.

/// Outcome of comparing a new state against the last rendered one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Nothing drawn yet for this instance.
    First,
    /// At least one tracked field differs.
    Changed,
    /// Identical to what is on screen.
    Unchanged,
}

impl Verdict {
    /// Whether the update should reach the surface.
    #[inline]
    pub const fn proceeds(self) -> bool { !matches!(self, Self::Unchanged) }
}

/// Compare `next` against `prev` without recording anything.
#[inline]
pub fn should_update<T: PartialEq>(
    prev: Option<&T>,
    next: &T,
) -> Verdict {
    match prev {
        None => Verdict::First,
        Some(prev) if prev == next => Verdict::Unchanged,
        Some(_) => Verdict::Changed,
    }
}

/// Last state drawn by one widget instance.
#[derive(Clone, Debug, Default)]
pub struct RenderedState<T> {
    last: Option<T>,
}

impl<T: PartialEq> RenderedState<T> {
    pub const fn new() -> Self { Self { last: None } }

    /// Last committed state, `None` before the first update.
    #[inline]
    pub const fn get(&self) -> Option<&T> { self.last.as_ref() }

    /// Gate `next` and record it when it proceeds.
    ///
    /// The state is committed exactly once per accepted update; rejected
    /// updates leave the stored value untouched.
    pub fn accept(
        &mut self,
        next: T,
    ) -> Verdict {
        let verdict = should_update(self.last.as_ref(), &next);
        if verdict.proceeds() {
            self.last = Some(next);
        }
        verdict
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
