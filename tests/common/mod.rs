//! Test utilities for navigation tests
//!
//! Provides recording middleware and controllers, a gate for holding a
//! navigation in flight, and a fake page backend answered by hand.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use page_navigator::*;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

/// Route log output to the test harness. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Journal
// ============================================================================

/// Ordered record of what ran, shared between fixtures.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Entries starting with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// Middleware that records `label` and continues.
pub fn recording(journal: &Journal, label: &'static str) -> impl RouteMiddleware {
    let journal = journal.clone();
    middleware_fn(move |_| {
        journal.record(label);
        NavigationAction::Continue
    })
    .named(label)
}

// ============================================================================
// Controllers
// ============================================================================

/// Controller recording the messages it is asked to show.
pub struct RecordingController {
    name: String,
    journal: Journal,
}

impl RecordingController {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
        }
    }
}

impl RouteController for RecordingController {
    fn name(&self) -> &str {
        &self.name
    }

    fn show_error(&mut self, message: &str) {
        self.journal.record(format!("{} error: {}", self.name, message));
    }

    fn show_success(&mut self, message: &str) {
        self.journal.record(format!("{} success: {}", self.name, message));
    }

    fn dispose(&mut self) {
        self.journal.record(format!("{} disposed", self.name));
    }
}

/// Entry middleware attaching a [`RecordingController`] named `name`.
pub fn attach(journal: &Journal, name: &'static str) -> impl RouteMiddleware {
    let journal = journal.clone();
    middleware_fn(move |ctx| {
        ctx.attach(RecordingController::new(name, &journal));
        NavigationAction::Continue
    })
}

// ============================================================================
// Gate
// ============================================================================

/// Middleware that holds the navigation until opened, once.
pub struct Gate {
    receiver: RefCell<Option<oneshot::Receiver<()>>>,
}

/// Handle opening a [`Gate`].
pub struct GateKey(oneshot::Sender<()>);

impl GateKey {
    pub fn open(self) {
        self.0.send(()).ok();
    }
}

pub fn gate() -> (Gate, GateKey) {
    let (tx, rx) = oneshot::channel();
    (
        Gate {
            receiver: RefCell::new(Some(rx)),
        },
        GateKey(tx),
    )
}

impl RouteMiddleware for Gate {
    fn handle<'a>(&'a self, _ctx: &'a mut NavigationContext) -> LocalBoxFuture<'a, NavigationAction> {
        let receiver = self.receiver.borrow_mut().take();
        async move {
            if let Some(receiver) = receiver {
                receiver.await.ok();
            }
            NavigationAction::Continue
        }
        .boxed_local()
    }

    fn name(&self) -> &str {
        "Gate"
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// Confirmation dialog answering from a script of replies.
#[derive(Default)]
pub struct ScriptedConfirm {
    replies: RefCell<Vec<bool>>,
    pub asked: Cell<usize>,
}

impl ScriptedConfirm {
    pub fn new(replies: &[bool]) -> Rc<Self> {
        Rc::new(Self {
            replies: RefCell::new(replies.iter().rev().copied().collect()),
            asked: Cell::new(0),
        })
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm<'a>(&'a self, _message: &'a str) -> LocalBoxFuture<'a, bool> {
        self.asked.set(self.asked.get() + 1);
        let reply = self.replies.borrow_mut().pop().unwrap_or(false);
        futures::future::ready(reply).boxed_local()
    }
}

// ============================================================================
// Page backend
// ============================================================================

type Reply = oneshot::Sender<Result<PageResult<String>, FetchError>>;

/// Fake list endpoint. Every fetch waits until the test answers it.
#[derive(Clone, Default)]
pub struct Backend {
    pending: Rc<RefCell<Vec<(u32, Reply)>>>,
    requested: Rc<RefCell<Vec<u32>>>,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(&self, page: u32) -> impl Future<Output = Result<PageResult<String>, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((page, tx));
        self.requested.borrow_mut().push(page);
        async move {
            rx.await
                .unwrap_or_else(|_| Err(FetchError::new("Request cancelled")))
        }
    }

    /// Every page requested so far, in order.
    pub fn requested(&self) -> Vec<u32> {
        self.requested.borrow().clone()
    }

    /// Pages still waiting for an answer.
    pub fn pending(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|(page, _)| *page).collect()
    }

    /// Answer the oldest fetch of `page` with one item per page.
    pub fn reply(&self, page: u32, total_pages: u32) {
        self.answer(
            page,
            Ok(PageResult {
                items: vec![format!("item {page}")],
                total_pages,
                current_page: page,
            }),
        );
    }

    pub fn fail(&self, page: u32, message: &str) {
        self.answer(page, Err(FetchError::new(message)));
    }

    fn answer(&self, page: u32, result: Result<PageResult<String>, FetchError>) {
        let index = self
            .pending
            .borrow()
            .iter()
            .position(|(p, _)| *p == page)
            .unwrap_or_else(|| panic!("no pending request for page {page}"));
        let (_, tx) = self.pending.borrow_mut().remove(index);
        tx.send(result).ok();
    }
}

/// A list view that records its own disposal.
pub struct ListView {
    pub page: u32,
    pub journal: Journal,
}

impl ViewHandle for ListView {
    fn dispose(&mut self) {
        self.journal.record(format!("dispose {}", self.page));
    }
}
