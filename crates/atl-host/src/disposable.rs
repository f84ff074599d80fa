//! Releasable resources.
//!
//! Every handle the host gives out (event subscriptions, status bar items) implements
//! [`Disposable`]. Releasing is idempotent, and handles also release themselves on drop.

/// A resource that can be released explicitly.
pub trait Disposable {
    /// Release the resource. Calling this more than once has no further effect.
    fn dispose(&mut self);

    /// Whether the resource has already been released.
    fn is_disposed(&self) -> bool;
}

/// A group of handles released together.
///
/// Members are released in insertion order. Once released the group is empty, so a second
/// `dispose` is a no-op.
#[derive(Default)]
#[must_use = "dropping a DisposableGroup releases every member"]
pub struct DisposableGroup {
    members: Vec<Box<dyn Disposable>>,
    disposed: bool,
}

impl DisposableGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine several handles into one.
    pub fn from_all<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Disposable>>,
    {
        Self {
            members: members.into_iter().collect(),
            disposed: false,
        }
    }

    /// Add a handle. Adding to an already released group releases the handle immediately.
    pub fn push(&mut self, mut member: Box<dyn Disposable>) {
        if self.disposed {
            member.dispose();
            return;
        }
        self.members.push(member);
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Disposable for DisposableGroup {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for mut member in self.members.drain(..) {
            member.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for DisposableGroup {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for DisposableGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposableGroup")
            .field("members", &self.members.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counted(Rc<Cell<u32>>, bool);

    impl Disposable for Counted {
        fn dispose(&mut self) {
            if !self.1 {
                self.1 = true;
                self.0.set(self.0.get() + 1);
            }
        }

        fn is_disposed(&self) -> bool {
            self.1
        }
    }

    #[test]
    fn test_group_releases_all_members_once() {
        let released = Rc::new(Cell::new(0));
        let mut group = DisposableGroup::from_all([
            Box::new(Counted(Rc::clone(&released), false)) as Box<dyn Disposable>,
            Box::new(Counted(Rc::clone(&released), false)),
        ]);
        assert_eq!(group.len(), 2);

        group.dispose();
        assert_eq!(released.get(), 2);
        assert!(group.is_disposed());
        assert!(group.is_empty());

        group.dispose();
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn test_drop_releases_members() {
        let released = Rc::new(Cell::new(0));
        {
            let mut group = DisposableGroup::new();
            group.push(Box::new(Counted(Rc::clone(&released), false)));
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_push_after_dispose_releases_immediately() {
        let released = Rc::new(Cell::new(0));
        let mut group = DisposableGroup::new();
        group.dispose();

        group.push(Box::new(Counted(Rc::clone(&released), false)));
        assert_eq!(released.get(), 1);
        assert!(group.is_empty());
    }
}
