//! Resolver → fetcher → presenter flow for startup and search.

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{debug, error};

use crate::{
    error::FetchError,
    location::{Geolocator, LocationQuery, resolve_startup},
    present::{DashboardView, present_astronomy, present_forecast},
    provider::WeatherSource,
};

/// Shown to the user when the forecast cannot be fetched.
pub const FORECAST_ALERT: &str = "Failed to fetch weather data. Please try again later.";

/// Identifies one refresh. Later refreshes get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: AtomicU64,
}

impl RequestTokens {
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// Calendar date sent with astronomy requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AstronomyDate {
    /// Today according to the caller's clock, not the location's.
    #[default]
    CallerToday,
    Fixed(NaiveDate),
}

impl AstronomyDate {
    pub fn resolve(&self) -> NaiveDate {
        match self {
            AstronomyDate::CallerToday => Local::now().date_naive(),
            AstronomyDate::Fixed(date) => *date,
        }
    }
}

/// What happened to one section of a refresh.
#[derive(Debug)]
pub enum SectionOutcome {
    Applied,
    /// A newer refresh was issued before this one resolved; results dropped.
    Stale,
    Failed(FetchError),
}

impl SectionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SectionOutcome::Applied)
    }
}

#[derive(Debug)]
pub struct RefreshReport {
    pub token: RequestToken,
    pub query: LocationQuery,
    pub forecast: SectionOutcome,
    pub astronomy: SectionOutcome,
}

impl RefreshReport {
    /// Only forecast failures are surfaced to the user.
    pub fn alert(&self) -> Option<&'static str> {
        match self.forecast {
            SectionOutcome::Failed(_) => Some(FORECAST_ALERT),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    source: Box<dyn WeatherSource>,
    fallback: LocationQuery,
    astronomy_date: AstronomyDate,
    tokens: RequestTokens,
    view: Mutex<DashboardView>,
}

impl Dashboard {
    pub fn new(source: Box<dyn WeatherSource>, fallback: LocationQuery) -> Self {
        Self {
            source,
            fallback,
            astronomy_date: AstronomyDate::default(),
            tokens: RequestTokens::default(),
            view: Mutex::new(DashboardView::default()),
        }
    }

    pub fn with_astronomy_date(mut self, date: AstronomyDate) -> Self {
        self.astronomy_date = date;
        self
    }

    pub fn with_view(mut self, view: DashboardView) -> Self {
        self.view = Mutex::new(view);
        self
    }

    /// Current state of the view-model.
    pub fn view(&self) -> DashboardView {
        self.view.lock().clone()
    }

    /// Initial load: geolocate (or fall back) and refresh.
    pub async fn load(&self, geolocator: &dyn Geolocator) -> RefreshReport {
        let query = resolve_startup(geolocator, &self.fallback).await;
        self.refresh(query).await
    }

    /// `None` for blank input, in which case nothing is fetched.
    pub fn search(&self, input: &str) -> Option<impl Future<Output = RefreshReport> + '_> {
        LocationQuery::from_search(input).map(|query| self.refresh(query))
    }

    /// Fetches forecast and astronomy concurrently and applies whatever
    /// arrives, unless a newer refresh has been issued in the meantime.
    ///
    /// The token is issued when this is called, not when the future is first polled.
    pub fn refresh(&self, query: LocationQuery) -> impl Future<Output = RefreshReport> + '_ {
        let token = self.tokens.issue();
        let date = self.astronomy_date.resolve();
        debug!(?token, %query, %date, "refresh issued");

        async move {
            let (forecast, astronomy) = tokio::join!(
                self.source.fetch_forecast(&query),
                self.source.fetch_astronomy(&query, date),
            );

            let forecast = match forecast {
                Ok(snapshot) => self.apply(token, |view| present_forecast(view, &snapshot)),
                Err(err) => {
                    error!(error = %err, %query, "Error fetching weather data");
                    self.failed(token, err)
                }
            };

            let astronomy = match astronomy {
                Ok(astro) => self.apply(token, |view| present_astronomy(view, &astro)),
                Err(err) => {
                    error!(error = %err, %query, "Error fetching moon data");
                    self.failed(token, err)
                }
            };

            RefreshReport { token, query, forecast, astronomy }
        }
    }

    fn apply(&self, token: RequestToken, write: impl FnOnce(&mut DashboardView)) -> SectionOutcome {
        let mut view = self.view.lock();
        if !self.tokens.is_current(token) {
            debug!(?token, "discarding stale result");
            return SectionOutcome::Stale;
        }
        write(&mut view);
        SectionOutcome::Applied
    }

    fn failed(&self, token: RequestToken, err: FetchError) -> SectionOutcome {
        if self.tokens.is_current(token) {
            SectionOutcome::Failed(err)
        } else {
            SectionOutcome::Stale
        }
    }
}
