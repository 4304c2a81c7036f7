//! Search orchestration: validation gate, lookup, view-state transitions.
//!
//! The lookups themselves are plain async functions over an [`AppContext`].
//! [`Controller`] is the adapter that owns the render target and the memo
//! store, and is the only place where state is mutated.

use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::SearchError,
    geolocation::{Locator, PositionOptions, acquire_position},
    memo::{LAST_CITY_KEY, MemoStore},
    model::WeatherReport,
    provider::WeatherProvider,
    validate::{self, CityName, InputClass},
};

/// Collaborators needed to answer a search.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub provider: Arc<dyn WeatherProvider>,
    pub locator: Arc<dyn Locator>,
    pub position_options: PositionOptions,
}

impl AppContext {
    pub fn new(provider: Arc<dyn WeatherProvider>, locator: Arc<dyn Locator>) -> Self {
        Self { provider, locator, position_options: PositionOptions::default() }
    }
}

/// Validates `raw` and looks it up. Invalid input never reaches the provider.
pub async fn lookup_city(
    ctx: &AppContext,
    raw: &str,
) -> Result<(CityName, WeatherReport), SearchError> {
    let city = validate::validate(raw)?;

    let report = ctx
        .provider
        .fetch_by_city(&city)
        .await
        .map_err(|e| SearchError::fetch(city.as_str(), e))?;

    Ok((city, report))
}

/// Looks up the weather at the device position.
pub async fn lookup_here(ctx: &AppContext) -> Result<WeatherReport, SearchError> {
    let coords = acquire_position(ctx.locator.as_ref(), &ctx.position_options).await?;

    ctx.provider
        .fetch_by_coordinates(coords)
        .await
        .map_err(|e| SearchError::fetch("your location", e))
}

/// What the render target is asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Report(WeatherReport),
    Error(String),
}

pub trait Renderer: Send + Debug {
    fn render(&mut self, view: &View);
}

/// How a user action ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Shown,
    /// Input failed validation; nothing was fetched.
    Rejected,
    Failed(SearchError),
    /// A newer action started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug)]
struct Surface<R, S> {
    renderer: R,
    store: S,
}

/// Owns the mutable handles and applies latest-request-wins to every action.
#[derive(Debug)]
pub struct Controller<R, S> {
    ctx: AppContext,
    surface: Mutex<Surface<R, S>>,
    generation: AtomicU64,
}

impl<R: Renderer, S: MemoStore> Controller<R, S> {
    pub fn new(ctx: AppContext, renderer: R, store: S) -> Self {
        Self {
            ctx,
            surface: Mutex::new(Surface { renderer, store }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// City to prefill the input with, if a previous search succeeded.
    pub async fn restore_last_city(&self) -> Option<String> {
        self.surface.lock().await.store.get(LAST_CITY_KEY)
    }

    /// Live styling hint for the input field; agrees with the search gate.
    pub fn input_feedback(&self, raw: &str) -> InputClass {
        validate::classify(raw)
    }

    pub async fn search(&self, raw: &str) -> Outcome {
        let ticket = self.begin();

        // Rejection happens before the loading state, as no request is made.
        let city = match validate::validate(raw) {
            Ok(city) => city,
            Err(err) => {
                debug!(input = raw, error = ?err, "search input rejected");
                return self.finish(ticket, Err(err.into()), None).await;
            }
        };

        self.show(ticket, View::Loading).await;
        let result = lookup_city(&self.ctx, city.as_str()).await.map(|(_, report)| report);
        self.finish(ticket, result, Some(city)).await
    }

    pub async fn use_my_location(&self) -> Outcome {
        let ticket = self.begin();
        self.show(ticket, View::Loading).await;

        let result = lookup_here(&self.ctx).await;
        self.finish(ticket, result, None).await
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    async fn show(&self, ticket: u64, view: View) {
        let mut surface = self.surface.lock().await;
        if self.is_current(ticket) {
            surface.renderer.render(&view);
        }
    }

    async fn finish(
        &self,
        ticket: u64,
        result: Result<WeatherReport, SearchError>,
        remember: Option<CityName>,
    ) -> Outcome {
        let mut surface = self.surface.lock().await;

        if !self.is_current(ticket) {
            debug!(ticket, "dropping result of superseded search");
            return Outcome::Superseded;
        }

        match result {
            Ok(report) => {
                if report.is_degraded() {
                    info!(
                        location = %report.current.location_name,
                        "showing conditions without forecast"
                    );
                }
                surface.renderer.render(&View::Report(report));

                if let Some(city) = remember {
                    if let Err(err) = surface.store.set(LAST_CITY_KEY, city.as_str()) {
                        warn!(error = %err, "failed to remember last city");
                    }
                }
                Outcome::Shown
            }
            Err(err) => {
                surface.renderer.render(&View::Error(err.user_message()));
                match err {
                    SearchError::Validation(_) => Outcome::Rejected,
                    other => Outcome::Failed(other),
                }
            }
        }
    }

    pub fn into_parts(self) -> (R, S) {
        let surface = self.surface.into_inner();
        (surface.renderer, surface.store)
    }
}
