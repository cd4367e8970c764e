use std::cell::{Cell, RefCell};
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use futures::channel::mpsc::{UnboundedReceiver, unbounded};
use gpui_docs_core::{Change, EditorHandle, Subscription};

/// What a registry subscriber is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The active editor was replaced, mounted or unmounted.
    HandleChanged,
    /// The active editor reported a change.
    EditorChanged(Change),
}

type Listener = Rc<dyn Fn(RegistryEvent)>;

#[derive(Default)]
struct Inner {
    handle: RefCell<Option<EditorHandle>>,
    engine_subscription: RefCell<Option<Subscription>>,
    listeners: RefCell<Vec<(usize, Listener)>>,
    next_listener_id: Cell<usize>,
}

/// The one place controls look up the live editor.
///
/// Cheap to clone; clones share the same slot. Subscribers hear about handle swaps and about
/// every change of the currently active editor, synchronously and after any editor borrow has
/// been released.
#[derive(Clone, Default)]
pub struct EditorRegistry {
    inner: Rc<Inner>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(handle: EditorHandle) -> Self {
        let registry = Self::new();
        registry.set_handle(Some(handle));
        registry
    }

    pub fn handle(&self) -> Option<EditorHandle> {
        self.inner.handle.borrow().clone()
    }

    pub fn set_handle(&self, handle: Option<EditorHandle>) {
        let subscription = handle.as_ref().map(|handle| {
            let weak: Weak<Inner> = Rc::downgrade(&self.inner);
            handle.subscribe(move |change| {
                if let Some(inner) = weak.upgrade() {
                    notify(&inner, RegistryEvent::EditorChanged(change));
                }
            })
        });

        // The previous engine subscription drops here, so the old editor stops being forwarded.
        let previous = self.inner.engine_subscription.replace(subscription);
        drop(previous);
        *self.inner.handle.borrow_mut() = handle;

        tracing::debug!(
            mounted = self.inner.handle.borrow().is_some(),
            "editor handle replaced"
        );
        notify(&self.inner, RegistryEvent::HandleChanged);
    }

    /// Unmount the current editor.
    pub fn clear(&self) {
        self.set_handle(None);
    }

    pub fn subscribe(&self, listener: impl Fn(RegistryEvent) + 'static) -> Subscription {
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

    /// The same notifications as [`EditorRegistry::subscribe`], queued for an async consumer.
    ///
    /// Listeners run inside the editor update that caused them; a consumer that has to borrow
    /// something else to react (a UI context, say) drains this stream instead. The stream ends
    /// once the registry is gone.
    pub fn events(&self) -> RegistryEvents {
        let (tx, rx) = unbounded();
        let subscription = self.subscribe(move |event| {
            let _ = tx.unbounded_send(event);
        });
        RegistryEvents {
            events: rx,
            _subscription: subscription,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

/// Stream returned by [`EditorRegistry::events`]. Dropping it unsubscribes.
pub struct RegistryEvents {
    events: UnboundedReceiver<RegistryEvent>,
    _subscription: Subscription,
}

impl Stream for RegistryEvents {
    type Item = RegistryEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<RegistryEvent>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}

fn notify(inner: &Inner, event: RegistryEvent) {
    let listeners: Vec<Listener> = inner
        .listeners
        .borrow()
        .iter()
        .map(|(_, l)| l.clone())
        .collect();
    for listener in listeners {
        listener(event);
    }
}
