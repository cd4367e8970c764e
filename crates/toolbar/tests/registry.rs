use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;
use futures::{FutureExt as _, StreamExt as _};
use gpui_docs_core::{Editor, EditorHandle, Subscription};
use gpui_docs_toolbar::{Command, EditorRegistry, RegistryEvent, dispatch};

fn record(registry: &EditorRegistry) -> (Rc<RefCell<Vec<RegistryEvent>>>, Subscription) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let subscription = registry.subscribe(move |event| sink.borrow_mut().push(event));
    (events, subscription)
}

#[test]
fn set_handle_notifies_every_subscriber_exactly_once() {
    let registry = EditorRegistry::new();
    let (first, _a) = record(&registry);
    let (second, _b) = record(&registry);

    registry.set_handle(Some(EditorHandle::new(Editor::with_richtext_plugins())));

    assert_eq!(*first.borrow(), vec![RegistryEvent::HandleChanged]);
    assert_eq!(*second.borrow(), vec![RegistryEvent::HandleChanged]);
}

#[test]
fn clearing_the_handle_notifies_and_unmounts() {
    let registry = EditorRegistry::with_handle(EditorHandle::new(Editor::with_richtext_plugins()));
    let (events, _subscription) = record(&registry);

    registry.clear();

    assert!(registry.handle().is_none());
    assert_eq!(*events.borrow(), vec![RegistryEvent::HandleChanged]);
}

#[test]
fn editor_changes_are_forwarded() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    let registry = EditorRegistry::with_handle(handle.clone());
    let (events, _subscription) = record(&registry);

    dispatch(Some(&handle), Command::ToggleBold);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    let RegistryEvent::EditorChanged(change) = events[0] else {
        panic!("expected an editor change, got {:?}", events[0]);
    };
    assert!(change.document);
}

#[test]
fn replaced_handle_is_no_longer_forwarded() {
    let old = EditorHandle::new(Editor::with_richtext_plugins());
    let new = EditorHandle::new(Editor::with_richtext_plugins());
    let registry = EditorRegistry::with_handle(old.clone());
    registry.set_handle(Some(new.clone()));
    assert_eq!(old.listener_count(), 0);
    assert_eq!(new.listener_count(), 1);

    let (events, _subscription) = record(&registry);
    dispatch(Some(&old), Command::ToggleBold);
    assert!(events.borrow().is_empty());

    dispatch(Some(&new), Command::ToggleBold);
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn subscribers_can_read_through_the_registry_during_notification() {
    let registry = EditorRegistry::new();
    let seen = Rc::new(RefCell::new(None));

    let reader = registry.clone();
    let sink = seen.clone();
    let _subscription = registry.subscribe(move |_| {
        let bold = gpui_docs_toolbar::is_active(
            reader.handle().as_ref(),
            gpui_docs_toolbar::Dimension::Bold,
        );
        *sink.borrow_mut() = Some(bold);
    });

    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    registry.set_handle(Some(handle.clone()));
    assert_eq!(*seen.borrow(), Some(false));

    dispatch(Some(&handle), Command::ToggleBold);
    assert_eq!(*seen.borrow(), Some(true));
}

#[test]
fn dropped_subscription_stops_listening() {
    let registry = EditorRegistry::new();
    let (events, subscription) = record(&registry);
    assert_eq!(registry.subscriber_count(), 1);

    drop(subscription);
    assert_eq!(registry.subscriber_count(), 0);

    registry.set_handle(Some(EditorHandle::new(Editor::with_richtext_plugins())));
    assert!(events.borrow().is_empty());
}

#[test]
fn event_stream_queues_handle_swaps_and_editor_changes() {
    let registry = EditorRegistry::new();
    let mut events = registry.events();

    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    registry.set_handle(Some(handle.clone()));
    dispatch(Some(&handle), Command::ToggleBold);

    assert_eq!(block_on(events.next()), Some(RegistryEvent::HandleChanged));
    let Some(RegistryEvent::EditorChanged(change)) = block_on(events.next()) else {
        panic!("expected an editor change");
    };
    assert!(change.document);
    assert_eq!(events.next().now_or_never(), None);
}

#[test]
fn event_stream_follows_the_new_handle_after_a_swap() {
    let old = EditorHandle::new(Editor::with_richtext_plugins());
    let new = EditorHandle::new(Editor::with_richtext_plugins());
    let registry = EditorRegistry::with_handle(old.clone());
    let mut events = registry.events();

    registry.set_handle(Some(new.clone()));
    dispatch(Some(&old), Command::ToggleBold);
    dispatch(Some(&new), Command::ToggleItalic);

    assert_eq!(block_on(events.next()), Some(RegistryEvent::HandleChanged));
    assert!(matches!(
        block_on(events.next()),
        Some(RegistryEvent::EditorChanged(_))
    ));
    assert_eq!(events.next().now_or_never(), None);
}

#[test]
fn dropping_the_event_stream_unsubscribes() {
    let registry = EditorRegistry::new();
    let events = registry.events();
    assert_eq!(registry.subscriber_count(), 1);

    drop(events);
    assert_eq!(registry.subscriber_count(), 0);
}

#[test]
fn event_stream_ends_with_the_registry() {
    let registry = EditorRegistry::new();
    let mut events = registry.events();

    drop(registry);
    assert_eq!(block_on(events.next()), None);
}
