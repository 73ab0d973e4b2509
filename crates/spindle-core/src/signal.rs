use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::effects::Dispose;

slotmap::new_key_type! {
    pub struct SubId;
}

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Observable value. Clones share the same cell.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: SlotMap<SubId, Subscriber<T>>,
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::with_key(),
        })))
    }

    pub fn get(&self) -> T {
        self.0.borrow().value.clone()
    }

    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = v;
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    /// Registers `f` for every later write. Run the returned handle to stop.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Dispose {
        let id = self.0.borrow_mut().subs.insert(Rc::new(f));
        let weak = Rc::downgrade(&self.0);
        Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subs.remove(id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }

    // Subscribers may read the signal or unsubscribe, so no borrow is held
    // while they run.
    fn notify(&self) {
        let (value, subs) = {
            let inner = self.0.borrow();
            let subs: Vec<Subscriber<T>> = inner.subs.values().cloned().collect();
            (inner.value.clone(), subs)
        };
        for s in subs {
            s(&value);
        }
    }
}

pub fn signal<T: Clone + 'static>(t: T) -> Signal<T> {
    Signal::new(t)
}
