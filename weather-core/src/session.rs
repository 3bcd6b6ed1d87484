//! Async event loop that owns a [`Controller`] and carries out its effects.
//!
//! One task owns the controller. User events arrive on one channel; fetch
//! results and blur timers come back on another. Overlapping fetches are
//! neither deduplicated nor cancelled, so whichever resolves last wins.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    controller::{Controller, Effect, Event, Phase, Resolution, ViewState},
    error::SessionClosed,
    model::WeatherRequest,
    provider::WeatherProvider,
};

pub struct Session {
    controller: Controller,
    provider: Arc<dyn WeatherProvider>,
    events: mpsc::UnboundedReceiver<Event>,
    resolutions_tx: mpsc::UnboundedSender<Resolution>,
    resolutions_rx: mpsc::UnboundedReceiver<Resolution>,
}

/// Cloneable front end to a running [`Session`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<Event>,
    view: watch::Receiver<ViewState>,
    sent: Arc<AtomicU64>,
}

impl Session {
    /// Start the event loop on the current tokio runtime.
    pub fn spawn(
        controller: Controller,
        provider: Arc<dyn WeatherProvider>,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (resolutions_tx, resolutions_rx) = mpsc::unbounded_channel();

        let handle = SessionHandle {
            events: events_tx,
            view: controller.subscribe(),
            sent: Arc::new(AtomicU64::new(controller.view().handled)),
        };

        let session = Session { controller, provider, events, resolutions_tx, resolutions_rx };
        let task = tokio::spawn(session.run());

        (handle, task)
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => {
                        if let Some(effect) = self.controller.handle(event) {
                            self.perform(effect);
                        }
                    }
                    None => break,
                },
                Some(resolution) = self.resolutions_rx.recv() => {
                    self.controller.resolve(resolution);
                }
            }
        }

        debug!("all session handles dropped, stopping");
    }

    fn perform(&self, effect: Effect) {
        let tx = self.resolutions_tx.clone();

        match effect {
            Effect::Fetch { ticket, query } => {
                let provider = Arc::clone(&self.provider);
                tokio::spawn(async move {
                    let result = provider.current(&WeatherRequest::new(query)).await;
                    // Receiver only goes away when the session stops.
                    let _ = tx.send(Resolution::Fetched { ticket, result });
                });
            }
            Effect::HideSuggestionsAfter { delay, generation } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Resolution::BlurGraceElapsed { generation });
                });
            }
        }
    }
}

impl SessionHandle {
    /// Queue an event. Returns its sequence number for [`SessionHandle::settle`].
    pub fn send(&self, event: Event) -> Result<u64, SessionClosed> {
        let seq = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.send(event).map_err(|_| SessionClosed)?;
        Ok(seq)
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Wait until event `seq` has been handled and no fetch is outstanding.
    ///
    /// A fetch that never resolves keeps this waiting.
    pub async fn settle(&self, seq: u64) -> Result<ViewState, SessionClosed> {
        let mut view = self.view.clone();
        let settled = view
            .wait_for(|v| v.handled >= seq && v.phase != Phase::Searching && v.pending_fetches == 0)
            .await
            .map_err(|_| SessionClosed)?;
        Ok(settled.clone())
    }

    /// Set the query and search it, then wait for the outcome.
    pub async fn search(&self, query: impl Into<String>) -> Result<ViewState, SessionClosed> {
        self.send(Event::Input(query.into()))?;
        let seq = self.send(Event::Search)?;
        self.settle(seq).await
    }

    /// Pick a suggestion, then wait for the search it triggers.
    pub async fn select(&self, suggestion: impl Into<String>) -> Result<ViewState, SessionClosed> {
        let seq = self.send(Event::SelectSuggestion(suggestion.into()))?;
        self.settle(seq).await
    }
}
