mod common;

use {
    autologin::{ActionExecutor, ClickError, MatchPosition, Rect},
    common::*,
};

#[test]
fn click_translates_to_screen_coordinates() {
    let desktop = FakeDesktop::new(WINDOW_RECT, vec![empty_frame()]);
    let actions = ActionExecutor::new(&desktop, &config());

    actions
        .click_at(&FakeWindow, MatchPosition::new(10, 20))
        .unwrap();

    assert_eq!(desktop.clicks(), vec![(310, 220)]);
    assert_eq!(desktop.count(|e| *e == Event::ButtonUp), 1);
}

#[test]
fn click_outside_of_window_is_rejected() {
    let desktop = FakeDesktop::new(WINDOW_RECT, vec![empty_frame()]);
    let actions = ActionExecutor::new(&desktop, &config());

    // The window is 200x120.
    let err = actions
        .click_at(&FakeWindow, MatchPosition::new(200, 10))
        .unwrap_err();

    assert!(matches!(
        err,
        ClickError::OutOfWindow { position, rect }
            if position == MatchPosition::new(200, 10) && rect == WINDOW_RECT
    ));
    assert!(matches!(
        actions.click_at(&FakeWindow, MatchPosition::new(10, 120)),
        Err(ClickError::OutOfWindow { .. })
    ));
    assert_eq!(desktop.clicks(), vec![]);
    assert_eq!(desktop.count(|e| matches!(e, Event::MovePointer(..))), 0);
}

#[test]
fn click_on_closed_window_is_rejected() {
    let desktop = FakeDesktop::new(WINDOW_RECT, vec![empty_frame()]).close_after_captures(0);
    let actions = ActionExecutor::new(&desktop, &config());

    let err = actions
        .click_at(&FakeWindow, MatchPosition::new(10, 10))
        .unwrap_err();

    assert!(matches!(err, ClickError::WindowInvalid(_)));
    assert_eq!(desktop.events(), vec![]);
}

#[test]
fn click_on_empty_window_is_rejected() {
    let desktop = FakeDesktop::new(Rect::new(300, 200, 300, 200), vec![empty_frame()]);
    let actions = ActionExecutor::new(&desktop, &config());

    let err = actions
        .click_at(&FakeWindow, MatchPosition::new(0, 0))
        .unwrap_err();

    assert!(matches!(err, ClickError::WindowInvalid(_)));
    assert_eq!(desktop.clicks(), vec![]);
}
