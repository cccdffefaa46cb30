//! Integration Tests for the Demo App
//!
//! These tests mount the demo component tree in a root scope and verify
//! that each write re-renders exactly the components that depend on it,
//! in tree order.

mod common;

use common::{init_tracing, states, App, Component, View};
use strata_core::{RootScope, Runtime};

const ALL: [&str; 7] = [
    "TextInput",
    "EchoInput",
    "TextInput2",
    "TextState1CharacterCount",
    "TextState1CharCountStateByTwo",
    "Texts",
    "SetTexts",
];

const TEXT1_CONSUMERS: [&str; 6] = [
    "TextInput",
    "EchoInput",
    "TextState1CharacterCount",
    "TextState1CharCountStateByTwo",
    "Texts",
    "SetTexts",
];

const TEXT2_CONSUMERS: [&str; 3] = ["TextInput2", "Texts", "SetTexts"];

#[test]
fn components_mount_with_defaults() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();

    let app = App::mount().unwrap();

    assert_eq!(app.names(), ALL);
    assert!(!app.has_pending());
    assert_eq!(app.text("EchoInput"), "Echoing textState1: ");
    assert_eq!(app.text("TextState1CharacterCount"), "textState1 contains 0 characters");
    assert_eq!(app.text("Texts"), "Both texts, splitted by a dash: -");
}

#[test]
fn typing_into_first_input_rerenders_its_consumers() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let mut app = App::mount().unwrap();

    app.set_text1.set("a".to_string()).unwrap();
    assert_eq!(app.flush().unwrap(), TEXT1_CONSUMERS);
    assert_eq!(app.text("EchoInput"), "Echoing textState1: a");
    assert_eq!(app.text("TextState1CharacterCount"), "textState1 contains 1 characters");
    assert_eq!(
        app.text("TextState1CharCountStateByTwo"),
        "textState1 contains 2 characters (multiplied for two)"
    );
    assert_eq!(app.text("Texts"), "Both texts, splitted by a dash: a-");

    app.set_text1.set("ab".to_string()).unwrap();
    assert_eq!(app.flush().unwrap(), TEXT1_CONSUMERS);
    assert_eq!(app.text("EchoInput"), "Echoing textState1: ab");
    assert_eq!(app.text("TextState1CharacterCount"), "textState1 contains 2 characters");
    assert_eq!(
        app.text("TextState1CharCountStateByTwo"),
        "textState1 contains 4 characters (multiplied for two)"
    );
    assert_eq!(app.text("Texts"), "Both texts, splitted by a dash: ab-");
}

#[test]
fn typing_into_second_input_leaves_first_consumers_alone() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let mut app = App::mount().unwrap();

    app.set_text1.set("ab".to_string()).unwrap();
    app.flush().unwrap();

    app.set_text2.set("c".to_string()).unwrap();
    assert_eq!(app.flush().unwrap(), TEXT2_CONSUMERS);
    assert_eq!(app.text("Texts"), "Both texts, splitted by a dash: ab-c");

    app.set_text2.set("cd".to_string()).unwrap();
    assert_eq!(app.flush().unwrap(), TEXT2_CONSUMERS);
    assert_eq!(app.text("Texts"), "Both texts, splitted by a dash: ab-cd");
}

#[test]
fn selector_setter_writes_both_atoms() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let mut app = App::mount().unwrap();
    let s = states();

    app.set_both.set("ef-gh".to_string()).unwrap();

    assert_eq!(Runtime::get(root.id(), &s.text1).unwrap(), "ef");
    assert_eq!(Runtime::get(root.id(), &s.text2).unwrap(), "gh");
    assert_eq!(app.flush().unwrap(), ALL);
    assert_eq!(app.text("TextInput"), "ef");
    assert_eq!(app.text("EchoInput"), "Echoing textState1: ef");
    assert_eq!(app.text("TextInput2"), "Echoing textState2: gh");

    // Only the second atom actually changes.
    app.set_both.set("ef-jk".to_string()).unwrap();
    assert_eq!(app.flush().unwrap(), TEXT2_CONSUMERS);
    assert_eq!(app.text("EchoInput"), "Echoing textState1: ef");
    assert_eq!(app.text("TextInput2"), "Echoing textState2: jk");
}

#[test]
fn consumers_of_unrelated_selectors_are_not_rerendered() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let mut app = App::mount().unwrap();
    let s = states();
    let mut clicks = View::mount("ClickCount", &s.clicks_label, |v: &String| v.clone()).unwrap();

    app.set_text1.set("a".to_string()).unwrap();
    app.set_both.set("ef-gh".to_string()).unwrap();
    assert_eq!(app.flush().unwrap(), ALL);
    assert!(!clicks.is_dirty());
    assert_eq!(clicks.text(), "0 clicks");

    Runtime::set(root.id(), &s.clicks, 1).unwrap();
    assert!(clicks.is_dirty());
    assert!(!app.has_pending());
    assert!(app.flush().unwrap().is_empty());

    clicks.render().unwrap();
    assert_eq!(clicks.text(), "1 clicks");
}

#[test]
fn selector_setter_without_dash_is_a_no_op() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let mut app = App::mount().unwrap();
    let s = states();

    app.set_both.set("nodash".to_string()).unwrap();
    app.set_both.set("too-many-dashes".to_string()).unwrap();

    assert!(!app.has_pending());
    assert!(app.flush().unwrap().is_empty());
    assert_eq!(Runtime::get(root.id(), &s.text1).unwrap(), "");
    assert_eq!(Runtime::get(root.id(), &s.both).unwrap(), "-");
}

#[test]
fn writing_the_same_text_does_not_rerender() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let mut app = App::mount().unwrap();

    app.set_text1.set("same".to_string()).unwrap();
    app.flush().unwrap();

    app.set_text1.set("same".to_string()).unwrap();
    assert!(app.flush().unwrap().is_empty());
}

#[test]
fn unmounting_releases_every_subscription() {
    init_tracing();
    let root = RootScope::new();
    let _entered = root.enter();
    let app = App::mount().unwrap();

    assert_eq!(Runtime::subscriber_count(root.id(), "textState1").unwrap(), 6);
    assert_eq!(Runtime::subscriber_count(root.id(), "textState2").unwrap(), 3);

    drop(app);

    assert_eq!(Runtime::subscriber_count(root.id(), "textState1").unwrap(), 0);
    assert_eq!(Runtime::subscriber_count(root.id(), "textState2").unwrap(), 0);
    assert_eq!(Runtime::subscriber_count(root.id(), "charCountState").unwrap(), 0);
}
