use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Observer<T> = Box<dyn FnMut(&T)>;

/// A push-based holder of the latest value of one input.
///
/// Observers are notified synchronously, in registration order, on the
/// pushing thread. A new observer immediately receives the current value
/// and then every subsequent push until its [`Subscription`] is dropped.
///
/// Sources are cheap handles; clones share the same value and observer
/// list. Reading [`current`](Self::current) from inside an observer is
/// allowed. Pushing back into the source (or subscribing to it) from
/// inside one of its own observers is not supported and panics on the
/// interior borrow.
pub struct StateSource<T> {
    inner: Rc<SourceInner<T>>,
}

struct SourceInner<T> {
    current: RefCell<T>,
    observers: RefCell<ObserverList<T>>,
}

struct ObserverList<T> {
    next_id: u64,
    entries: Vec<(u64, Observer<T>)>,
}

impl<T> Clone for StateSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> StateSource<T> {
    /// Creates a source holding `initial` with no observers.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(SourceInner {
                current: RefCell::new(initial),
                observers: RefCell::new(ObserverList {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// Returns a clone of the latest pushed value.
    pub fn current(&self) -> T {
        self.inner.current.borrow().clone()
    }

    /// Replaces the current value and notifies all observers.
    ///
    /// No validation is performed; pushing a value equal to the current
    /// one still notifies.
    pub fn push(&self, value: T) {
        *self.inner.current.borrow_mut() = value.clone();
        let mut observers = self.inner.observers.borrow_mut();
        for (_, observer) in observers.entries.iter_mut() {
            observer(&value);
        }
    }

    /// Registers `observer` and immediately replays the current value to
    /// it. The observer stays registered until the returned guard is
    /// dropped.
    pub fn subscribe(&self, observer: impl FnMut(&T) + 'static) -> Subscription {
        let id;
        {
            let mut observers = self.inner.observers.borrow_mut();
            id = observers.next_id;
            observers.next_id += 1;
            observers.entries.push((id, Box::new(observer)));
            let current = self.inner.current.borrow().clone();
            if let Some((_, observer)) = observers.entries.last_mut() {
                observer(&current);
            }
        }
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || unsubscribe(&weak, id))
    }
}

fn unsubscribe<T>(weak: &Weak<SourceInner<T>>, id: u64) {
    if let Some(inner) = weak.upgrade() {
        inner
            .observers
            .borrow_mut()
            .entries
            .retain(|(obs_id, _)| *obs_id != id);
    }
}

/// Guard tying an observer registration to a scope: dropping it removes
/// the observer from its source.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
