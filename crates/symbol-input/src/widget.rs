//! The symbol input event loop.
//!
//! One input is one tokio task. The task owns the session, both debounce
//! timers and every in-flight lookup, and is the only place visible state
//! changes. Text events arrive over a channel; lookups run as futures
//! polled by the same loop, so a slow response never blocks typing and is
//! dropped on arrival if a newer keystroke superseded it.
//!
//! Dropping the [`SymbolInputHandle`] closes the channel; the loop then
//! exits and its timers and in-flight lookups are dropped with it.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tradejournal_market_data::{SearchCandidate, StockData, Trend};

use crate::config::{InputFlags, SymbolInputConfig};
use crate::engine::{ResolutionEngine, ValidationResult};
use crate::errors::{Result, SymbolInputError};
use crate::reconcile::{InputState, ValidationApplied, ValidationStatus};
use crate::scheduler::DebounceScheduler;
use crate::session::{PendingRequest, RequestKind, SessionToken};

/// Shown by forms when a required symbol field is left empty.
pub const REQUIRED_MESSAGE: &str = "Stock symbol is required";

/// Callbacks into the surrounding form.
///
/// Called from the input's event loop; implementations must not block.
pub trait SymbolInputListener: Send + Sync {
    /// Fired on every text event with `None`, and again with the price
    /// data once the symbol is confirmed.
    fn on_change(&self, symbol: &str, stock: Option<&StockData>);

    /// Fired once per confirmation when `auto_fetch_price` is set.
    fn on_price_update(&self, _price: Decimal) {}
}

/// Listener that ignores every callback.
pub struct NoopListener;

impl SymbolInputListener for NoopListener {
    fn on_change(&self, _symbol: &str, _stock: Option<&StockData>) {}
}

/// Visible state of the input, published after every event.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSnapshot {
    pub text: String,
    pub token: SessionToken,
    pub candidates: Vec<SearchCandidate>,
    pub dropdown_open: bool,
    pub searching: bool,
    pub validating: bool,
    pub status: ValidationStatus,
    pub flags: InputFlags,
}

impl InputSnapshot {
    fn initial(flags: InputFlags) -> Self {
        Self {
            text: String::new(),
            token: SessionToken::default(),
            candidates: Vec::new(),
            dropdown_open: false,
            searching: false,
            validating: false,
            status: ValidationStatus::Idle,
            flags,
        }
    }

    pub fn validation(&self) -> Option<ValidationResult> {
        self.status.as_result()
    }

    /// Price next to the field; only with `show_price` and a confirmed symbol.
    pub fn displayed_price(&self) -> Option<Decimal> {
        if !self.flags.show_price {
            return None;
        }
        self.status.confirmed().map(|valid| valid.price)
    }

    pub fn trend(&self) -> Option<Trend> {
        self.status.confirmed().map(|valid| valid.trend())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.status.error_message()
    }

    pub fn required_error(&self) -> Option<&'static str> {
        if self.flags.required && self.text.trim().is_empty() {
            Some(REQUIRED_MESSAGE)
        } else {
            None
        }
    }
}

enum Command {
    SetText(String),
    Select(String),
    Dismiss,
}

enum Completion {
    Search {
        request: PendingRequest,
        candidates: Vec<SearchCandidate>,
    },
    Validate {
        request: PendingRequest,
        result: Option<ValidationResult>,
    },
}

enum Step {
    Command(Command),
    Closed,
    Completed(Completion),
    TimersDue,
}

struct InputWorker {
    scheduler: DebounceScheduler,
    state: InputState,
    engine: Arc<ResolutionEngine>,
    listener: Arc<dyn SymbolInputListener>,
    flags: InputFlags,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    publisher: watch::Sender<InputSnapshot>,
}

impl InputWorker {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        debug!("Symbol input started (service: {})", self.engine.service_id());

        loop {
            let deadline = self.scheduler.next_deadline();

            let step = tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => Step::Command(command),
                    None => Step::Closed,
                },
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    Step::Completed(done)
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Step::TimersDue
                }
            };

            match step {
                Step::Closed => break,
                Step::Command(command) => self.handle_command(command),
                Step::Completed(done) => self.handle_completion(done),
                Step::TimersDue => {
                    for request in self.scheduler.take_due(Instant::now()) {
                        self.dispatch(request);
                    }
                }
            }

            self.publish();
        }

        debug!(
            "Symbol input stopped, dropping {} in-flight request(s)",
            self.in_flight.len()
        );
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetText(text) => {
                let change = self.scheduler.on_text_changed(&text.to_uppercase());
                self.state.on_edit(change.clear_candidates);
                if change.is_empty {
                    debug!("Symbol field cleared ({})", change.token);
                }
                self.listener
                    .on_change(self.scheduler.session().raw_text(), None);
            }
            Command::Select(symbol) => {
                let symbol = symbol.trim().to_uppercase();
                let request = self.scheduler.on_commit_selection(&symbol);
                self.state.on_commit();
                self.listener.on_change(&symbol, None);
                if let Some(request) = request {
                    self.dispatch(request);
                }
            }
            Command::Dismiss => self.state.dismiss(),
        }
    }

    fn dispatch(&mut self, request: PendingRequest) {
        debug!(
            "Dispatching {} for '{}' ({})",
            request.kind, request.query, request.token
        );
        self.state.begin(&request);

        let engine = Arc::clone(&self.engine);
        let lookup: BoxFuture<'static, Completion> = match request.kind {
            RequestKind::Search => Box::pin(async move {
                let candidates = engine.search(&request.query).await;
                Completion::Search {
                    request,
                    candidates,
                }
            }),
            RequestKind::Validate => Box::pin(async move {
                let result = engine.validate(&request.query).await;
                Completion::Validate { request, result }
            }),
        };
        self.in_flight.push(lookup);
    }

    fn handle_completion(&mut self, done: Completion) {
        let current = self.scheduler.session().token();

        match done {
            Completion::Search {
                request,
                candidates,
            } => {
                if !self.state.apply_search(current, &request, candidates) {
                    debug!(
                        "Discarding stale search for '{}' ({}, current {})",
                        request.query, request.token, current
                    );
                }
            }
            Completion::Validate { request, result } => {
                match self.state.apply_validation(current, &request, result) {
                    ValidationApplied::Confirmed(valid) => {
                        let data = valid.to_stock_data();
                        self.listener.on_change(&request.query, Some(&data));
                        if self.flags.auto_fetch_price {
                            self.listener.on_price_update(valid.price);
                        }
                    }
                    ValidationApplied::Rejected => {
                        debug!("'{}' rejected ({})", request.query, request.token);
                    }
                    ValidationApplied::Cleared | ValidationApplied::Unchanged => {}
                    ValidationApplied::Stale => {
                        debug!(
                            "Discarding stale validation for '{}' ({}, current {})",
                            request.query, request.token, current
                        );
                    }
                }
            }
        }
    }

    fn snapshot(&self) -> InputSnapshot {
        let session = self.scheduler.session();
        InputSnapshot {
            text: session.raw_text().to_string(),
            token: session.token(),
            candidates: self.state.candidates().to_vec(),
            dropdown_open: self.state.dropdown_open(),
            searching: self.state.is_searching(),
            validating: self.state.is_validating(),
            status: self.state.status().clone(),
            flags: self.flags,
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.publisher.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Entry point for creating inputs.
pub struct SymbolInput;

impl SymbolInput {
    /// Start an input on the current tokio runtime.
    pub fn spawn(
        engine: ResolutionEngine,
        config: SymbolInputConfig,
        listener: Arc<dyn SymbolInputListener>,
    ) -> SymbolInputHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(InputSnapshot::initial(config.flags));

        let worker = InputWorker {
            scheduler: DebounceScheduler::new(&config),
            state: InputState::new(),
            engine: Arc::new(engine),
            listener,
            flags: config.flags,
            in_flight: FuturesUnordered::new(),
            publisher,
        };
        let task = tokio::spawn(worker.run(commands_rx));

        SymbolInputHandle {
            commands: commands_tx,
            snapshots,
            task,
            flags: config.flags,
        }
    }
}

/// Owner of a running input.
pub struct SymbolInputHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<InputSnapshot>,
    task: JoinHandle<()>,
    flags: InputFlags,
}

impl SymbolInputHandle {
    /// New field value after a keystroke.
    pub fn set_text(&self, text: impl Into<String>) -> Result<()> {
        if self.flags.disabled {
            return Err(SymbolInputError::Disabled);
        }
        self.send(Command::SetText(text.into()))
    }

    /// Pick a symbol from the candidate list.
    pub fn select_candidate(&self, symbol: impl Into<String>) -> Result<()> {
        if self.flags.disabled {
            return Err(SymbolInputError::Disabled);
        }
        self.send(Command::Select(symbol.into()))
    }

    /// Close the candidate list, e.g. on a click outside the field.
    pub fn dismiss(&self) -> Result<()> {
        self.send(Command::Dismiss)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InputSnapshot> {
        self.snapshots.clone()
    }

    pub fn flags(&self) -> InputFlags {
        self.flags
    }

    /// Stop the input and wait for its loop to exit.
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            warn!("Symbol input task ended abnormally: {}", e);
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SymbolInputError::Closed)
    }
}
