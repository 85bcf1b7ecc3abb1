//! Request side of the dashboard: route selection, fetch → transform, and the
//! `Idle → Loading → Ready | Failed` state machine.

use chrono::{DateTime, FixedOffset, Utc, Weekday};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    clock::{Clock, weekday_from_index},
    forecast::Aggregator,
    model::{HourViewModel, Location, TodayViewModel, WeekViewModel},
    provider::{FetchError, WeatherSource},
};

/// What the user sees in place of the dashboard when a fetch fails.
pub const FAILURE_MESSAGE: &str = "Something went wrong";

const WEEKDAY_NAMES: [&str; 7] =
    ["sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday"];

/// Which side panel to show next to today's details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Week,
    Day(Weekday),
}

impl Route {
    /// Parses a path segment such as `/monday`. Anything that is not a
    /// weekday name selects the week view.
    pub fn from_segment(segment: &str) -> Self {
        let name = segment.trim().trim_matches('/').to_lowercase();
        WEEKDAY_NAMES
            .iter()
            .position(|day| *day == name)
            .and_then(|idx| u8::try_from(idx).ok())
            .and_then(weekday_from_index)
            .map_or(Route::Week, Route::Day)
    }

    pub fn segment(&self) -> &'static str {
        match self {
            Route::Week => "",
            Route::Day(day) => weekday_name(*day),
        }
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_sunday() as usize]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Week(WeekViewModel),
    Hours(HourViewModel),
}

/// Everything one render cycle needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub utc_clock: String,
    pub today: TodayViewModel,
    pub panel: Panel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { generation: u64 },
    Ready(Box<Snapshot>),
    Failed(String),
}

/// Handle for one in-flight request. Only the most recently issued ticket may
/// settle the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    route: Route,
}

impl Ticket {
    pub fn route(&self) -> Route {
        self.route
    }
}

#[derive(Debug)]
pub struct Dashboard<S> {
    source: S,
    aggregator: Aggregator,
    location: Location,
    city: Option<String>,
    offset: Option<FixedOffset>,
    generation: u64,
    state: LoadState,
}

impl<S: WeatherSource> Dashboard<S> {
    pub fn new(source: S, aggregator: Aggregator, location: Location) -> Self {
        Self {
            source,
            aggregator,
            location,
            city: None,
            offset: None,
            generation: 0,
            state: LoadState::Idle,
        }
    }

    /// Display label overriding the provider's city name.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Fixed UTC offset overriding the provider-reported one.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Starts a request, superseding any still in flight.
    pub fn begin(&mut self, route: Route) -> Ticket {
        self.generation += 1;
        self.state = LoadState::Loading { generation: self.generation };
        Ticket { generation: self.generation, route }
    }

    /// Settles the request behind `ticket`. Returns `false` and leaves the
    /// state untouched when a newer request has been issued since.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Snapshot, FetchError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded result"
            );
            return false;
        }

        self.state = match result {
            Ok(snapshot) => LoadState::Ready(Box::new(snapshot)),
            Err(err) => {
                warn!(error = %err, route = ?ticket.route, "weather fetch failed");
                LoadState::Failed(FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    pub async fn load(&mut self, route: Route) -> &LoadState {
        let ticket = self.begin(route);
        let result = self.fetch_snapshot(route, Utc::now()).await;
        self.finish(ticket, result);
        &self.state
    }

    /// Fetches and transforms without touching the state machine.
    pub async fn fetch_snapshot(
        &self,
        route: Route,
        now: DateTime<Utc>,
    ) -> Result<Snapshot, FetchError> {
        let payload = self.source.fetch_forecast(&self.location).await?;

        let offset = self
            .offset
            .or_else(|| payload.utc_offset_secs.and_then(FixedOffset::east_opt))
            .unwrap_or_else(Clock::local_offset);
        let clock = Clock::fixed(now, offset);
        let aggregator = self.aggregator.clone().with_offset(offset);

        let city = self.city.clone().unwrap_or_else(|| payload.current.city_label.clone());
        let today = aggregator.today_view(&city, payload.current, &payload.series, &clock);

        let panel = match route {
            Route::Week => Panel::Week(aggregator.week_view(&city, &payload.series)),
            Route::Day(day) => {
                let start = clock.weekday_offset_epoch(day);
                let series = self.source.fetch_hourly(&self.location, start).await?;
                Panel::Hours(aggregator.hour_view(&city, weekday_name(day), &series))
            }
        };

        Ok(Snapshot { utc_clock: clock.utc_display_string(), today, panel })
    }
}
