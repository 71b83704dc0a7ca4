//! Integration tests for the interactive session.
//!
//! The session is driven line by line with the tokio scheduler, the same way
//! the `himsols session` command drives it from stdin.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use himsols_cli::{Page, Session, Step, TokioResetScheduler};
use himsols_core::{FlowState, SequentialRequestIds};

fn session() -> Session {
    Session::new(
        Box::new(SequentialRequestIds::new()),
        Duration::from_secs(3),
    )
}

fn send(session: &mut Session, scheduler: &mut TokioResetScheduler, line: &str) -> String {
    match session.handle(line, scheduler) {
        Step::Continue(lines) => lines.join("\n"),
        Step::Quit => panic!("session quit on {line:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_contact_page_resets_on_timer() {
    let mut s = session();
    let (mut scheduler, mut resets) = TokioResetScheduler::new();

    send(&mut s, &mut scheduler, "page contact");
    send(&mut s, &mut scheduler, "set name Asha");
    send(&mut s, &mut scheduler, "set mobile 9876543210");
    send(&mut s, &mut scheduler, "set message Need 20 saplings");
    let out = send(&mut s, &mut scheduler, "submit");
    assert!(out.contains("Message Sent Successfully!"));
    assert!(out.contains("Returning to an empty form in 3s"));

    let ticket = resets.recv().await.unwrap();
    let out = s.on_reset(ticket).join("\n");
    assert!(out.contains("message*: "));

    let Page::Form(flow) = s.page() else {
        panic!("expected form page");
    };
    assert_eq!(flow.state(), &FlowState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_contact_page_cancels_timer() {
    let mut s = session();
    let (mut scheduler, mut resets) = TokioResetScheduler::new();

    send(&mut s, &mut scheduler, "page contact");
    for line in ["set name Asha", "set mobile 1", "set message hi", "submit"] {
        send(&mut s, &mut scheduler, line);
    }
    send(&mut s, &mut scheduler, "page cart");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(resets.try_recv().is_err());
    assert!(matches!(s.page(), Page::Cart { .. }));
}

#[tokio::test]
async fn test_cart_page_reloads_demo_cart() {
    let mut s = session();
    let (mut scheduler, _resets) = TokioResetScheduler::new();

    send(&mut s, &mut scheduler, "page cart");
    send(&mut s, &mut scheduler, "rm 1");
    let out = send(&mut s, &mut scheduler, "rm 3");
    assert!(out.contains("Your Cart is Empty"));
    assert!(send(&mut s, &mut scheduler, "submit").contains("Your Cart is Empty"));

    let out = send(&mut s, &mut scheduler, "page cart");
    assert!(out.contains("Total: ₹480 (3 items)"));
    assert_eq!(s.handle("quit", &mut scheduler), Step::Quit);
}

#[tokio::test]
async fn test_service_request_page_header() {
    let mut s = session();
    let (mut scheduler, _resets) = TokioResetScheduler::new();

    let out = send(&mut s, &mut scheduler, "page service-request events");
    assert!(out.contains("serviceType*: events"));
    for line in ["set name Asha", "set mobile 1", "set address Hall 2"] {
        send(&mut s, &mut scheduler, line);
    }
    let out = send(&mut s, &mut scheduler, "submit");
    assert!(out.contains("SR000001"));
}
