//! Search-and-display controller.
//!
//! The controller is a synchronous state machine. It never performs I/O itself:
//! user events and resolutions go in, an optional [`Effect`] comes out, and the
//! caller (normally [`crate::session::Session`]) carries the effect out and feeds
//! its outcome back as a [`Resolution`]. Every change is published as a
//! [`ViewState`] snapshot on a `watch` channel.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    error::FetchError, model::WeatherResult, presentation::PresentationToken, suggest::Catalog,
};

/// How long suggestions stay visible after the input loses focus, so a click
/// on a suggestion can still land.
pub const BLUR_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Typing,
    Searching,
    Displaying,
}

/// Discrete user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The input text changed to this value.
    Input(String),
    Focus,
    Blur,
    /// Explicit search with the current query.
    Search,
    /// A suggestion was picked; it becomes the query and is searched at once.
    SelectSuggestion(String),
}

/// Outcome of a previously emitted [`Effect`].
#[derive(Debug)]
pub enum Resolution {
    Fetched { ticket: u64, result: Result<WeatherResult, FetchError> },
    BlurGraceElapsed { generation: u64 },
}

/// Work the controller asks its driver to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { ticket: u64, query: String },
    HideSuggestionsAfter { delay: Duration, generation: u64 },
}

/// Immutable snapshot handed to renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub query: String,
    pub suggestions: Vec<String>,
    pub show_suggestions: bool,
    pub weather: Option<WeatherResult>,
    pub presentation: PresentationToken,
    pub show_welcome: bool,
    pub phase: Phase,
    pub pending_fetches: usize,
    /// Number of [`Event`]s processed so far.
    pub handled: u64,
}

pub struct Controller {
    catalog: Arc<Catalog>,
    query: String,
    suggestions: Vec<String>,
    show_suggestions: bool,
    focused: bool,
    blur_generation: u64,
    weather: Option<WeatherResult>,
    show_welcome: bool,
    phase: Phase,
    next_ticket: u64,
    pending: usize,
    handled: u64,
    view: watch::Sender<ViewState>,
}

impl Controller {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let initial = ViewState { show_welcome: true, ..ViewState::default() };
        let (view, _) = watch::channel(initial);

        Self {
            catalog,
            query: String::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            focused: false,
            blur_generation: 0,
            weather: None,
            show_welcome: true,
            phase: Phase::Idle,
            next_ticket: 0,
            pending: 0,
            handled: 0,
            view,
        }
    }

    /// Receive a fresh [`ViewState`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        debug!(?event, phase = ?self.phase, "handling event");
        self.handled += 1;

        let effect = match event {
            Event::Input(text) => {
                self.set_query(text);
                self.focused = true;
                self.show_suggestions = !self.suggestions.is_empty();
                if self.phase != Phase::Searching {
                    self.phase = Phase::Typing;
                }
                None
            }
            Event::Focus => {
                self.focused = true;
                self.show_suggestions = !self.suggestions.is_empty();
                None
            }
            Event::Blur => {
                self.focused = false;
                self.blur_generation += 1;
                Some(Effect::HideSuggestionsAfter {
                    delay: BLUR_GRACE,
                    generation: self.blur_generation,
                })
            }
            Event::Search => self.search(),
            Event::SelectSuggestion(suggestion) => {
                self.set_query(suggestion);
                self.show_suggestions = false;
                self.search()
            }
        };

        self.publish();
        effect
    }

    pub fn resolve(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Fetched { ticket, result } => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(weather) => {
                        debug!(ticket, city = %weather.city, "fetch succeeded");
                        self.weather = Some(weather);
                        self.show_welcome = false;
                        self.phase = Phase::Displaying;
                    }
                    Err(err) => {
                        warn!(ticket, query = %self.query, error = %err, "weather fetch failed");
                        if self.pending == 0 {
                            self.phase = if self.weather.is_some() {
                                Phase::Displaying
                            } else {
                                Phase::Typing
                            };
                        }
                    }
                }
            }
            Resolution::BlurGraceElapsed { generation } => {
                if generation == self.blur_generation && !self.focused {
                    self.show_suggestions = false;
                }
            }
        }

        self.publish();
    }

    fn set_query(&mut self, query: String) {
        self.suggestions = self.catalog.suggest(&query);
        self.query = query;
    }

    fn search(&mut self) -> Option<Effect> {
        self.show_suggestions = false;

        if self.query.is_empty() {
            debug!("ignoring search with empty query");
            return None;
        }

        self.next_ticket += 1;
        self.pending += 1;
        self.phase = Phase::Searching;

        Some(Effect::Fetch { ticket: self.next_ticket, query: self.query.clone() })
    }

    fn publish(&self) {
        let presentation =
            self.weather.as_ref().map(WeatherResult::presentation).unwrap_or_default();

        self.view.send_replace(ViewState {
            query: self.query.clone(),
            suggestions: self.suggestions.clone(),
            show_suggestions: self.show_suggestions && !self.suggestions.is_empty(),
            weather: self.weather.clone(),
            presentation,
            show_welcome: self.show_welcome,
            phase: self.phase,
            pending_fetches: self.pending,
            handled: self.handled,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::new(Arc::new(Catalog::default()))
    }

    fn sunny_22() -> WeatherResult {
        WeatherResult {
            city: "Delhi".into(),
            country: Some("India".into()),
            temperature_c: 22.0,
            humidity_pct: 30,
            wind_mph: 4.0,
            gust_mph: 6.5,
            visibility_miles: 3.0,
            condition_text: "Sunny".into(),
            icon_url: "https://cdn.weatherapi.com/weather/64x64/day/113.png".into(),
            observed_at: None,
        }
    }

    fn failure() -> FetchError {
        FetchError::Parse(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
    }

    fn fetch_ticket(effect: Option<Effect>) -> u64 {
        match effect {
            Some(Effect::Fetch { ticket, .. }) => ticket,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle_with_welcome() {
        let view = controller().view();
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.show_welcome);
        assert!(view.weather.is_none());
        assert!(!view.show_suggestions);
    }

    #[test]
    fn input_recomputes_suggestions_and_shows_them() {
        let mut c = controller();
        assert_eq!(c.handle(Event::Input("del".into())), None);

        let view = c.view();
        assert_eq!(view.phase, Phase::Typing);
        assert_eq!(view.suggestions, vec!["Philadelphia", "Delhi"]);
        assert!(view.show_suggestions);
    }

    #[test]
    fn unmatched_input_hides_suggestions() {
        let mut c = controller();
        c.handle(Event::Input("del".into()));
        c.handle(Event::Input("delx".into()));

        let view = c.view();
        assert!(view.suggestions.is_empty());
        assert!(!view.show_suggestions);
    }

    #[test]
    fn clearing_input_clears_suggestions() {
        let mut c = controller();
        c.handle(Event::Input("san".into()));
        c.handle(Event::Input(String::new()));

        let view = c.view();
        assert!(view.suggestions.is_empty());
        assert!(!view.show_suggestions);
    }

    #[test]
    fn search_with_empty_query_emits_nothing() {
        let mut c = controller();
        assert_eq!(c.handle(Event::Search), None);
        assert_eq!(c.view().phase, Phase::Idle);

        assert_eq!(c.handle(Event::SelectSuggestion(String::new())), None);
        assert_eq!(c.view().pending_fetches, 0);
    }

    #[test]
    fn search_hides_suggestions_and_requests_fetch() {
        let mut c = controller();
        c.handle(Event::Input("Chen".into()));
        assert!(c.view().show_suggestions);

        let effect = c.handle(Event::Search);
        assert_eq!(effect, Some(Effect::Fetch { ticket: 1, query: "Chen".into() }));

        let view = c.view();
        assert_eq!(view.phase, Phase::Searching);
        assert!(!view.show_suggestions);
        assert_eq!(view.query, "Chen");
    }

    #[test]
    fn selecting_suggestion_sets_query_and_searches() {
        let mut c = controller();
        c.handle(Event::Input("jai".into()));

        let effect = c.handle(Event::SelectSuggestion("Jaipur".into()));
        assert_eq!(effect, Some(Effect::Fetch { ticket: 1, query: "Jaipur".into() }));

        let view = c.view();
        assert_eq!(view.query, "Jaipur");
        assert!(!view.show_suggestions);
    }

    #[test]
    fn selecting_suggestion_hides_even_when_not_shown() {
        let mut c = controller();
        c.handle(Event::Input("jai".into()));
        c.handle(Event::Blur);
        c.resolve(Resolution::BlurGraceElapsed { generation: 1 });
        assert!(!c.view().show_suggestions);

        c.handle(Event::SelectSuggestion("Jaipur".into()));
        let view = c.view();
        assert_eq!(view.query, "Jaipur");
        assert!(!view.show_suggestions);
    }

    #[test]
    fn successful_fetch_displays_result() {
        let mut c = controller();
        c.handle(Event::Input("Delhi".into()));
        let ticket = fetch_ticket(c.handle(Event::Search));

        c.resolve(Resolution::Fetched { ticket, result: Ok(sunny_22()) });

        let view = c.view();
        assert_eq!(view.phase, Phase::Displaying);
        assert!(!view.show_welcome);
        assert_eq!(view.weather.as_ref().map(|w| w.temperature_c), Some(22.0));
        assert_eq!(view.presentation, PresentationToken::Sunny);
    }

    #[test]
    fn failed_fetch_before_any_result_keeps_welcome() {
        let mut c = controller();
        c.handle(Event::Input("Nowhere".into()));
        let ticket = fetch_ticket(c.handle(Event::Search));

        c.resolve(Resolution::Fetched { ticket, result: Err(failure()) });

        let view = c.view();
        assert!(view.show_welcome);
        assert!(view.weather.is_none());
        assert_eq!(view.phase, Phase::Typing);
        assert_eq!(view.presentation, PresentationToken::Default);
    }

    #[test]
    fn failed_fetch_keeps_previous_result() {
        let mut c = controller();
        c.handle(Event::Input("Delhi".into()));
        let first = fetch_ticket(c.handle(Event::Search));
        c.resolve(Resolution::Fetched { ticket: first, result: Ok(sunny_22()) });

        c.handle(Event::Input("Nowhere".into()));
        let second = fetch_ticket(c.handle(Event::Search));
        c.resolve(Resolution::Fetched { ticket: second, result: Err(failure()) });

        let view = c.view();
        assert_eq!(view.phase, Phase::Displaying);
        assert!(!view.show_welcome);
        assert_eq!(view.weather, Some(sunny_22()));
        assert_eq!(view.query, "Nowhere");
    }

    #[test]
    fn last_resolved_fetch_wins() {
        let mut c = controller();
        c.handle(Event::Input("Delhi".into()));
        let first = fetch_ticket(c.handle(Event::Search));
        c.handle(Event::Input("Mumbai".into()));
        let second = fetch_ticket(c.handle(Event::Search));
        assert_eq!(c.view().pending_fetches, 2);

        let mumbai = WeatherResult { city: "Mumbai".into(), ..sunny_22() };
        c.resolve(Resolution::Fetched { ticket: second, result: Ok(mumbai) });
        c.resolve(Resolution::Fetched { ticket: first, result: Ok(sunny_22()) });

        let view = c.view();
        assert_eq!(view.weather.map(|w| w.city), Some("Delhi".to_string()));
        assert_eq!(view.pending_fetches, 0);
    }

    #[test]
    fn input_while_searching_keeps_searching_phase() {
        let mut c = controller();
        c.handle(Event::Input("Delhi".into()));
        c.handle(Event::Search);
        c.handle(Event::Input("Delhi ".into()));
        assert_eq!(c.view().phase, Phase::Searching);
    }

    #[test]
    fn blur_hides_suggestions_only_after_grace() {
        let mut c = controller();
        c.handle(Event::Input("san".into()));

        let effect = c.handle(Event::Blur);
        assert_eq!(effect, Some(Effect::HideSuggestionsAfter { delay: BLUR_GRACE, generation: 1 }));
        assert!(c.view().show_suggestions);

        c.resolve(Resolution::BlurGraceElapsed { generation: 1 });
        assert!(!c.view().show_suggestions);
    }

    #[test]
    fn stale_blur_timer_is_ignored_after_refocus() {
        let mut c = controller();
        c.handle(Event::Input("san".into()));
        c.handle(Event::Blur);
        c.handle(Event::Focus);

        c.resolve(Resolution::BlurGraceElapsed { generation: 1 });
        assert!(c.view().show_suggestions);
    }

    #[test]
    fn focus_shows_suggestions_only_when_present() {
        let mut c = controller();
        c.handle(Event::Focus);
        assert!(!c.view().show_suggestions);
    }

    #[test]
    fn subscribers_see_each_change() {
        let mut c = controller();
        let mut rx = c.subscribe();
        assert!(!rx.has_changed().expect("sender alive"));

        c.handle(Event::Input("Kan".into()));
        assert!(rx.has_changed().expect("sender alive"));

        let view = rx.borrow_and_update().clone();
        assert_eq!(view.suggestions, vec!["Kangra"]);
        assert_eq!(view.handled, 1);
    }

    #[test]
    fn resolutions_do_not_count_as_handled_events() {
        let mut c = controller();
        c.handle(Event::Input("Delhi".into()));
        let ticket = fetch_ticket(c.handle(Event::Search));
        c.resolve(Resolution::Fetched { ticket, result: Ok(sunny_22()) });
        assert_eq!(c.view().handled, 2);
    }
}
