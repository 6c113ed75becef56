//! Cause-chain inspection.
//!
//! Every step goes through [`std::error::Error::source`], the one-step
//! unwrap every Rust error may implement. Nodes built by this crate answer
//! it with their cause, and foreign errors answer it however they were
//! written, so a chain can alternate between the two freely:
//!
//! ```text
//! Error(wrap_c) ─source→ thiserror::Outer ─source→ Error(with_stack) ─source→ io::Error
//! ```

use std::error::Error as StdError;
use std::iter::FusedIterator;

/// Iterator over an error and every cause below it, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Walk `err` and all of its causes.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Reports whether any error in `err`'s chain equals `target`.
///
/// A node matches when its concrete type is `T` and it compares equal with
/// `PartialEq`. For [`crate::Error`] that means the very same node.
///
/// ```
/// use stackerr::{is, Error};
///
/// let root = Error::new("not found");
/// let wrapped = Error::wrap(root.clone(), "loading user");
/// assert!(is(&wrapped, &root));
/// ```
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    chain(err).any(|node| node.downcast_ref::<T>().is_some_and(|v| v == target))
}

/// Finds the first error in `err`'s chain whose concrete type is `T`.
pub fn find_as<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    chain(err).find_map(|node| node.downcast_ref::<T>())
}

/// One step down the chain.
#[inline]
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Same as [`unwrap`].
#[inline]
pub fn cause<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    unwrap(err)
}
