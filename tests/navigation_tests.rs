//! Integration tests for the navigation engine
//!
//! Chains, queueing, refusals, redirects and scroll restoration, driven
//! through the public `Navigator` API.

mod common;

use common::*;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use page_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ============================================================================
// Chain ordering
// ============================================================================

#[test]
fn test_global_chains_run_before_route_chains() {
    init_logging();
    let journal = Journal::new();

    let navigator = Navigator::builder()
        .enter_all(recording(&journal, "global enter"))
        .exit_all(recording(&journal, "global exit"))
        .route(
            Route::new("/a")
                .enter(recording(&journal, "a enter 1"))
                .enter(recording(&journal, "a enter 2"))
                .exit(recording(&journal, "a exit")),
        )
        .route(Route::new("/b").enter(recording(&journal, "b enter")))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/a"));
    assert_eq!(journal.entries(), vec!["global enter", "a enter 1", "a enter 2"]);

    journal.clear();
    pollster::block_on(navigator.push("/b"));
    assert_eq!(
        journal.entries(),
        vec!["global exit", "a exit", "global enter", "b enter"]
    );
}

#[test]
fn test_controller_disposed_when_route_is_left() {
    let journal = Journal::new();
    let navigator = Navigator::builder()
        .route(Route::new("/a").enter(attach(&journal, "a")))
        .route(Route::new("/b").enter(attach(&journal, "b")))
        .build()
        .unwrap();

    pollster::block_on(async {
        navigator.start("/a").await;
        assert_eq!(navigator.controller_name().as_deref(), Some("a"));
        navigator.push("/b").await;
    });

    assert_eq!(journal.entries(), vec!["a disposed"]);
    assert_eq!(navigator.controller_name().as_deref(), Some("b"));
}

#[test]
fn test_with_controller_reaches_active_controller() {
    let journal = Journal::new();
    let navigator = Navigator::builder()
        .route(Route::new("/post/:id").enter(attach(&journal, "post")))
        .build()
        .unwrap();

    assert!(navigator.with_controller(|_| ()).is_none());
    pollster::block_on(navigator.start("/post/3"));

    let name = navigator.with_controller(|controller| {
        controller.show_success("Saved");
        controller.name().to_string()
    });
    assert_eq!(name.as_deref(), Some("post"));
    assert_eq!(journal.entries(), vec!["post success: Saved"]);
    assert_eq!(navigator.controller_name().as_deref(), Some("post"));
}

// ============================================================================
// Refusals
// ============================================================================

#[test]
fn test_exit_refusal_keeps_current_page() {
    let journal = Journal::new();
    let navigator = Navigator::builder()
        .route(
            Route::new("/edit")
                .enter(attach(&journal, "editor"))
                .exit(middleware_fn(|_| NavigationAction::deny("Unsaved changes"))),
        )
        .route(Route::new("/b").enter(recording(&journal, "b enter")))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/edit"));
    let result = pollster::block_on(navigator.push("/b"));

    assert_eq!(
        result,
        NavigationResult::Blocked {
            reason: "Unsaved changes".into(),
            redirect: None
        }
    );
    assert_eq!(navigator.current_url().as_deref(), Some("/edit"));
    assert_eq!(navigator.history_len(), 1);
    assert_eq!(navigator.controller_name().as_deref(), Some("editor"));
    assert!(journal.entries().is_empty());
    assert_eq!(navigator.phase(), NavigationPhase::Idle);
}

#[test]
fn test_entry_denial_shows_error_view() {
    let journal = Journal::new();
    let error_journal = journal.clone();
    let session = Rc::new(|privilege: &str| privilege == "posts:list");

    let navigator = Navigator::builder()
        .route(Route::new("/"))
        .route(
            Route::new("/history/:parameters?")
                .enter(PrivilegeGuard::new(session, "snapshots:list"))
                .enter(recording(&journal, "history enter")),
        )
        .error_handlers(ErrorHandlers::new().on_error(move |_| {
            Box::new(RecordingController::new("error-view", &error_journal))
        }))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/"));
    let result = pollster::block_on(navigator.push("/history/"));

    assert!(result.is_blocked());
    assert_eq!(navigator.current_url().as_deref(), Some("/history/"));
    assert_eq!(navigator.controller_name().as_deref(), Some("error-view"));
    assert_eq!(
        journal.entries(),
        vec!["error-view error: You don't have privileges to access this page."]
    );
}

#[test]
fn test_entry_denial_reported_to_attached_controller() {
    let journal = Journal::new();
    let navigator = Navigator::builder()
        .route(
            Route::new("/upload")
                .enter(attach(&journal, "upload"))
                .enter(middleware_fn(|_| NavigationAction::deny("Quota exceeded"))),
        )
        .error_handlers(ErrorHandlers::new().on_error(|_| panic!("error view not expected")))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/upload"));
    assert_eq!(journal.entries(), vec!["upload error: Quota exceeded"]);
}

#[test]
fn test_unmatched_url_uses_not_found_view() {
    let journal = Journal::new();
    let view_journal = journal.clone();
    let navigator = Navigator::builder()
        .route(Route::new("/"))
        .error_handlers(ErrorHandlers::new().on_not_found(move |url| {
            view_journal.record(format!("not found {url}"));
            Box::new(RecordingController::new("not-found", &view_journal))
        }))
        .build()
        .unwrap();

    let result = pollster::block_on(navigator.push("/missing"));
    assert!(result.is_not_found());
    assert_eq!(navigator.controller_name().as_deref(), Some("not-found"));
    assert_eq!(journal.entries(), vec!["not found /missing"]);
    assert_eq!(navigator.current_url().as_deref(), Some("/missing"));
}

#[test]
fn test_catch_all_takes_unmatched_urls() {
    let journal = Journal::new();
    let navigator = Navigator::builder()
        .config(NavigatorConfig::new().require_catch_all(true))
        .route(Route::new("/"))
        .route(Route::catch_all().enter(attach(&journal, "fallback")))
        .build()
        .unwrap();

    assert!(pollster::block_on(navigator.push("/anything/at/all")).is_success());
    assert_eq!(navigator.controller_name().as_deref(), Some("fallback"));
}

#[test]
fn test_missing_catch_all_rejected_when_required() {
    let err = Navigator::builder()
        .config(NavigatorConfig::new().require_catch_all(true))
        .route(Route::new("/"))
        .build()
        .unwrap_err();
    assert_eq!(err, NavigationError::MissingCatchAll);
}

// ============================================================================
// Redirects
// ============================================================================

#[test]
fn test_entry_redirect_replaces_target() {
    let session = Rc::new(|_: &str| false);
    let navigator = Navigator::builder()
        .route(Route::new("/"))
        .route(Route::new("/login"))
        .route(
            Route::new("/admin").enter(PrivilegeGuard::new(session, "admin").with_redirect("/login")),
        )
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/"));
    let result = pollster::block_on(navigator.push("/admin"));

    assert_eq!(result, NavigationResult::Success { url: "/login".into() });
    assert_eq!(navigator.current_url().as_deref(), Some("/login"));
    assert_eq!(navigator.history_len(), 2);
    assert!(pollster::block_on(navigator.back()).is_some_and(|r| r.is_success()));
    assert_eq!(navigator.current_url().as_deref(), Some("/"));
}

#[test]
fn test_exit_redirect_runs_next() {
    let journal = Journal::new();
    let redirected = Rc::new(Cell::new(false));
    let once = redirected.clone();

    let navigator = Navigator::builder()
        .route(Route::new("/draft").exit(middleware_fn(move |_| {
            if once.replace(true) {
                NavigationAction::Continue
            } else {
                NavigationAction::redirect_with_reason("/save", "Saving draft first")
            }
        })))
        .route(Route::new("/save").enter(recording(&journal, "save enter")))
        .route(Route::new("/b").enter(recording(&journal, "b enter")))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/draft"));
    let result = pollster::block_on(navigator.push("/b"));

    assert_eq!(
        result,
        NavigationResult::Blocked {
            reason: "Saving draft first".into(),
            redirect: Some("/save".into())
        }
    );
    assert!(redirected.get());
    assert_eq!(journal.entries(), vec!["save enter"]);
    assert_eq!(navigator.current_url().as_deref(), Some("/save"));
}

#[test]
fn test_redirect_loop_stops_at_configured_depth() {
    let navigator = Navigator::builder()
        .config(NavigatorConfig::new().max_redirect_depth(4))
        .route(Route::new("/ping").enter(middleware_fn(|_| NavigationAction::redirect("/pong"))))
        .route(Route::new("/pong").enter(middleware_fn(|_| NavigationAction::redirect("/ping"))))
        .build()
        .unwrap();

    let result = pollster::block_on(navigator.push("/ping"));
    assert!(matches!(
        result,
        NavigationResult::Error(NavigationError::RedirectLoop { depth: 4, .. })
    ));
    assert_eq!(navigator.phase(), NavigationPhase::Idle);
}

// ============================================================================
// Queueing
// ============================================================================

#[test]
fn test_requests_queue_while_navigation_in_flight() {
    init_logging();
    let (gate, key) = gate();
    let journal = Journal::new();

    let navigator = Navigator::builder()
        .route(Route::new("/"))
        .route(Route::new("/slow").enter(gate).enter(recording(&journal, "slow")))
        .route(Route::new("/b").enter(recording(&journal, "b")))
        .route(Route::new("/c").enter(recording(&journal, "c")))
        .build()
        .unwrap();

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let results = Rc::new(RefCell::new(Vec::new()));

    pool.run_until(navigator.start("/"));

    for url in ["/slow", "/b", "/c"] {
        let navigator = navigator.clone();
        let results = results.clone();
        spawner
            .spawn_local(async move {
                let result = navigator.push(url).await;
                results.borrow_mut().push((url, result));
            })
            .unwrap();
        pool.run_until_stalled();
    }

    assert_eq!(navigator.phase(), NavigationPhase::EnteringNew);
    assert_eq!(navigator.queued(), 2);
    assert_eq!(
        *results.borrow(),
        vec![
            ("/b", NavigationResult::Queued { url: "/b".into() }),
            ("/c", NavigationResult::Queued { url: "/c".into() }),
        ]
    );

    key.open();
    pool.run_until_stalled();

    assert_eq!(journal.entries(), vec!["slow", "b", "c"]);
    assert_eq!(navigator.queued(), 0);
    assert_eq!(navigator.current_url().as_deref(), Some("/c"));
    assert_eq!(navigator.history_len(), 4);
    assert_eq!(
        results.borrow().last(),
        Some(&("/slow", NavigationResult::Success { url: "/slow".into() }))
    );
}

#[test]
fn test_leaving_route_stays_readable_during_exit_chain() {
    let (gate, key) = gate();
    let journal = Journal::new();
    let navigator = Navigator::builder()
        .route(
            Route::new("/items/:parameters?")
                .enter(ParseParameters::new())
                .enter(attach(&journal, "list"))
                .exit(gate),
        )
        .route(Route::new("/about"))
        .build()
        .unwrap();

    let mut pool = LocalPool::new();
    pool.run_until(navigator.start("/items/page=3"));

    let leaving = navigator.clone();
    pool.spawner()
        .spawn_local(async move {
            leaving.push("/about").await;
        })
        .unwrap();
    pool.run_until_stalled();

    assert_eq!(navigator.phase(), NavigationPhase::ExitingOld);
    assert_eq!(navigator.current_url().as_deref(), Some("/items/page=3"));
    assert_eq!(navigator.current_parameters().get("page"), Some("3"));
    assert_eq!(navigator.controller_name().as_deref(), Some("list"));
    assert!(navigator.with_controller(|_| ()).is_none());

    key.open();
    pool.run_until_stalled();

    assert_eq!(navigator.current_url().as_deref(), Some("/about"));
    assert!(navigator.current_parameters().is_empty());
    assert!(navigator.controller_name().is_none());
    assert_eq!(journal.entries(), vec!["list disposed"]);
}

#[test]
fn test_queued_back_moves_from_where_history_ends_up() {
    let (gate, key) = gate();
    let navigator = Navigator::builder()
        .route(Route::new("/a"))
        .route(Route::new("/b").exit(gate))
        .route(Route::new("/c"))
        .build()
        .unwrap();

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    pool.run_until(async {
        navigator.start("/a").await;
        navigator.push("/b").await;
    });

    let forward = navigator.clone();
    spawner
        .spawn_local(async move {
            forward.push("/c").await;
        })
        .unwrap();
    pool.run_until_stalled();

    let back_result = Rc::new(RefCell::new(None));
    let slot = back_result.clone();
    let backward = navigator.clone();
    spawner
        .spawn_local(async move {
            *slot.borrow_mut() = backward.back().await;
        })
        .unwrap();
    pool.run_until_stalled();

    assert!(matches!(
        *back_result.borrow(),
        Some(NavigationResult::Queued { .. })
    ));
    assert_eq!(navigator.queued(), 1);

    key.open();
    pool.run_until_stalled();

    assert_eq!(navigator.current_url().as_deref(), Some("/b"));
    assert_eq!(navigator.history_len(), 3);
    assert!(navigator.can_go_forward());
    assert_eq!(navigator.phase(), NavigationPhase::Idle);
}

// ============================================================================
// Exit confirmation
// ============================================================================

#[tokio::test]
async fn test_confirm_exit_asks_while_dirty() {
    let flag = ExitConfirmation::new();
    let dialog = ScriptedConfirm::new(&[false, true]);

    let navigator = Navigator::builder()
        .route(Route::new("/post/:id/edit").exit(ConfirmExit::new(flag.clone(), dialog.clone())))
        .route(Route::new("/post/:id"))
        .build()
        .unwrap();

    navigator.start("/post/1/edit").await;
    flag.enable();

    let refused = navigator.push("/post/1").await;
    assert_eq!(
        refused,
        NavigationResult::Blocked {
            reason: "Navigation cancelled".into(),
            redirect: None
        }
    );
    assert_eq!(navigator.current_url().as_deref(), Some("/post/1/edit"));

    assert!(navigator.push("/post/1").await.is_success());
    assert_eq!(dialog.asked.get(), 2);
    assert!(!flag.is_enabled());
}

#[tokio::test]
async fn test_confirm_exit_silent_when_clean() {
    let flag = ExitConfirmation::new();
    let dialog = ScriptedConfirm::new(&[]);

    let navigator = Navigator::builder()
        .route(Route::new("/settings").exit(ConfirmExit::new(flag, dialog.clone())))
        .route(Route::new("/"))
        .build()
        .unwrap();

    navigator.start("/settings").await;
    assert!(navigator.push("/").await.is_success());
    assert_eq!(dialog.asked.get(), 0);
}

// ============================================================================
// History and scroll
// ============================================================================

#[test]
fn test_back_and_forward_restore_scroll() {
    let viewport = Rc::new(MemoryViewport::new());
    let navigator = Navigator::builder()
        .viewport(viewport.clone())
        .route(Route::new("/"))
        .route(Route::new("/post/:id"))
        .build()
        .unwrap();

    pollster::block_on(async {
        navigator.start("/").await;
        viewport.scroll_to(ScrollPosition::new(0.0, 400.0));

        navigator.push("/post/1").await;
        assert_eq!(viewport.scroll_position(), ScrollPosition::TOP);
        viewport.scroll_to(ScrollPosition::new(0.0, 120.0));

        navigator.back().await;
        assert_eq!(viewport.scroll_position(), ScrollPosition::new(0.0, 400.0));

        navigator.forward().await;
        assert_eq!(viewport.scroll_position(), ScrollPosition::new(0.0, 120.0));
    });
}

#[test]
fn test_replace_scrolls_to_top() {
    let viewport = Rc::new(MemoryViewport::new());
    let navigator = Navigator::builder()
        .viewport(viewport.clone())
        .route(Route::new("/items/:parameters?"))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/items/"));
    viewport.scroll_to(ScrollPosition::new(0.0, 900.0));
    pollster::block_on(navigator.replace("/items/page=2"));

    assert_eq!(viewport.scroll_position(), ScrollPosition::TOP);
    assert_eq!(navigator.history_len(), 1);
}

#[test]
fn test_scroll_restore_can_be_disabled() {
    let viewport = Rc::new(MemoryViewport::new());
    let navigator = Navigator::builder()
        .config(NavigatorConfig::new().restore_scroll(false))
        .viewport(viewport.clone())
        .route(Route::new("/"))
        .route(Route::new("/about"))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/"));
    viewport.scroll_to(ScrollPosition::new(0.0, 50.0));
    pollster::block_on(navigator.push("/about"));

    assert_eq!(viewport.scroll_count(), 1);
    assert_eq!(viewport.scroll_position().y, 50.0);
}

#[test]
fn test_back_without_history_is_none() {
    let navigator = Navigator::builder().route(Route::new("/")).build().unwrap();
    pollster::block_on(navigator.start("/"));
    assert!(pollster::block_on(navigator.back()).is_none());
    assert!(!navigator.can_go_back());
}

// ============================================================================
// Parameters and named routes
// ============================================================================

#[test]
fn test_parameters_decoded_on_entry() {
    let navigator = Navigator::builder()
        .route(Route::new("/user/:name/history/:parameters?").enter(ParseParameters::new()))
        .build()
        .unwrap();

    pollster::block_on(navigator.start("/user/ann%20lee/history/page=2;query=tag%3Ared"));
    let params = navigator.current_parameters();

    assert_eq!(params.get("name"), Some("ann lee"));
    assert_eq!(params.get("page"), Some("2"));
    assert_eq!(params.get("query"), Some("tag:red"));
}

#[test]
fn test_url_for_named_route() {
    let navigator = Navigator::builder()
        .route(Route::new("/post/:id").name("post"))
        .build()
        .unwrap();

    let url = navigator.url_for("post", &RouteParams::new().with("id", "7"));
    assert_eq!(url.as_deref(), Some("/post/7"));
}

#[test]
fn test_custom_history_backend_is_used() {
    let navigator = Navigator::builder()
        .history(MemoryHistory::new())
        .route(Route::new("/"))
        .route(Route::new("/a"))
        .build()
        .unwrap();

    pollster::block_on(async {
        navigator.start("/").await;
        navigator.push("/a").await;
    });
    assert_eq!(navigator.history_len(), 2);
    assert!(navigator.can_go_back());
}
