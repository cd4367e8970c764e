use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::core::{Change, Editor};

type Listener = Rc<dyn Fn(Change)>;

struct Inner {
    editor: RefCell<Editor>,
    listeners: RefCell<Vec<(usize, Listener)>>,
    next_listener_id: Cell<usize>,
}

/// Shared, single-threaded access to a live editor.
///
/// Clones point at the same editor. Every `update` that changes something notifies the
/// subscribers exactly once, after the editor borrow has been released, so listeners are free
/// to read the editor again.
#[derive(Clone)]
pub struct EditorHandle {
    inner: Rc<Inner>,
}

impl fmt::Debug for EditorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorHandle")
            .field("ptr", &Rc::as_ptr(&self.inner))
            .finish()
    }
}

impl EditorHandle {
    pub fn new(editor: Editor) -> Self {
        Self {
            inner: Rc::new(Inner {
                editor: RefCell::new(editor),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    pub fn read(&self) -> Ref<'_, Editor> {
        self.inner.editor.borrow()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        let (result, change) = {
            let mut editor = self.inner.editor.borrow_mut();
            let result = f(&mut editor);
            (result, editor.take_change())
        };
        if let Some(change) = change {
            self.emit(change);
        }
        result
    }

    pub fn subscribe(&self, listener: impl Fn(Change) + 'static) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn ptr_eq(&self, other: &EditorHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn emit(&self, change: Change) {
        // Snapshot so listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

/// Keeps a listener registered until dropped.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Leave the listener registered for the lifetime of its source.
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
