use std::cell::RefCell;
use std::rc::Rc;

use gpui_docs_core::{Change, Editor, EditorHandle};

#[test]
fn update_notifies_each_listener_once_with_merged_change() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    let seen: Rc<RefCell<Vec<Change>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    let _subscription = handle.subscribe(move |change| sink.borrow_mut().push(change));

    handle.update(|editor| {
        editor.chain().focus().toggle_bold().run();
    });

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].document);
    assert!(seen[0].view);
}

#[test]
fn update_without_changes_is_silent() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let _subscription = handle.subscribe(move |_| *sink.borrow_mut() += 1);

    handle.update(|editor| editor.is_focused());
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn listeners_can_read_the_editor_during_notification() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    let observed = Rc::new(RefCell::new(None));

    let reader = handle.clone();
    let sink = observed.clone();
    let _subscription = handle.subscribe(move |_| {
        *sink.borrow_mut() = Some(reader.read().spellcheck());
    });

    handle.update(|editor| editor.set_spellcheck(false));
    assert_eq!(*observed.borrow(), Some(false));
}

#[test]
fn dropping_the_subscription_unsubscribes() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    let count = Rc::new(RefCell::new(0));

    let sink = count.clone();
    let subscription = handle.subscribe(move |_| *sink.borrow_mut() += 1);
    assert_eq!(handle.listener_count(), 1);
    drop(subscription);
    assert_eq!(handle.listener_count(), 0);

    handle.update(|editor| editor.focus());
    assert_eq!(*count.borrow(), 0);

    let sink = count.clone();
    handle.subscribe(move |_| *sink.borrow_mut() += 1).detach();
    handle.update(|editor| editor.blur());
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn clones_share_one_editor() {
    let a = EditorHandle::new(Editor::with_richtext_plugins());
    let b = a.clone();
    let c = EditorHandle::new(Editor::with_richtext_plugins());
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));

    b.update(|editor| editor.set_spellcheck(false));
    assert!(!a.read().spellcheck());
}
