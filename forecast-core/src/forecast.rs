//! Turns raw provider series into the dashboard's day and hour view models.
//!
//! Samples are placed on the city's local calendar using the aggregator's UTC
//! offset. A day is represented by the sample nearest to local noon; when two
//! samples are equally near, the earlier one wins.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use tracing::debug;

use crate::{
    catalog::DescriptionCatalog,
    clock::{Clock, date_label, local_datetime},
    icons::IconResolver,
    model::{
        CurrentConditions, DayForecast, HourForecast, HourViewModel, RawCurrentWeather,
        RawWeatherSample, TodayViewModel, WeekViewModel,
    },
};

/// How many days after today the "today" view lists.
pub const UPCOMING_DAYS: usize = 4;
pub const WEEK_DAYS: usize = 7;

const NOON_SECS: i64 = 12 * 60 * 60;

#[derive(Debug, Clone)]
struct Stamped<'a> {
    at: DateTime<FixedOffset>,
    sample: &'a RawWeatherSample,
}

impl Stamped<'_> {
    fn distance_from_noon(&self) -> i64 {
        (i64::from(self.at.num_seconds_from_midnight()) - NOON_SECS).abs()
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    catalog: Arc<DescriptionCatalog>,
    icons: IconResolver,
    offset: FixedOffset,
}

impl Aggregator {
    /// Aggregator working in UTC until [`Self::with_offset`] says otherwise.
    pub fn new(catalog: Arc<DescriptionCatalog>, icons: IconResolver) -> Self {
        Self { catalog, icons, offset: Utc.fix() }
    }

    pub fn openweather(icons: IconResolver) -> Self {
        Self::new(Arc::new(DescriptionCatalog::openweather()), icons)
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn catalog(&self) -> &DescriptionCatalog {
        &self.catalog
    }

    /// Upcoming days after `current_date_label`, one noon-nearest sample each,
    /// at most [`UPCOMING_DAYS`]. Days before `now_epoch`'s local date are
    /// never upcoming and are skipped too.
    pub fn build_today_forecast(
        &self,
        series: &[RawWeatherSample],
        current_date_label: &str,
        now_epoch: i64,
    ) -> Vec<DayForecast> {
        let today = local_datetime(now_epoch, self.offset).map(|dt| dt.date_naive());

        let upcoming = self.stamp(series).into_iter().filter(|s| {
            let date = s.at.date_naive();
            date_label(date) != current_date_label && today.is_none_or(|t| date >= t)
        });

        self.representatives(upcoming, UPCOMING_DAYS)
    }

    /// One noon-nearest sample per day, today included, at most [`WEEK_DAYS`].
    pub fn build_week_forecast(&self, series: &[RawWeatherSample]) -> Vec<DayForecast> {
        self.representatives(self.stamp(series), WEEK_DAYS)
    }

    /// Every sample of an already day-scoped series, in time order.
    pub fn build_hour_forecast(&self, series: &[RawWeatherSample]) -> Vec<HourForecast> {
        let mut stamped = self.stamp(series);
        stamped.sort_by_key(|s| s.at);

        stamped
            .into_iter()
            .map(|s| HourForecast {
                time_label: s.at.format("%H:%M").to_string(),
                temperature: s.sample.temperature,
                label: self.catalog.describe(s.sample.condition_code.as_deref()).to_string(),
                icon_ref: self.icons.resolve(s.sample.icon_code.as_deref()),
            })
            .collect()
    }

    pub fn current_conditions(&self, current: &RawCurrentWeather) -> CurrentConditions {
        CurrentConditions {
            temperature: current.temperature,
            label: self.catalog.describe(current.condition_code.as_deref()).to_string(),
            icon_ref: self.icons.resolve(current.icon_code.as_deref()),
            air: current.air,
        }
    }

    pub fn today_view(
        &self,
        city: &str,
        current: RawCurrentWeather,
        series: &[RawWeatherSample],
        clock: &Clock,
    ) -> TodayViewModel {
        TodayViewModel {
            city: city.to_string(),
            date_label: clock.day_month_label(None),
            conditions: self.current_conditions(&current),
            upcoming: self.build_today_forecast(
                series,
                &clock.current_date_label(),
                clock.now_epoch(),
            ),
            current,
        }
    }

    pub fn week_view(&self, city: &str, series: &[RawWeatherSample]) -> WeekViewModel {
        WeekViewModel { city: city.to_string(), days: self.build_week_forecast(series) }
    }

    pub fn hour_view(
        &self,
        city: &str,
        weekday: &str,
        series: &[RawWeatherSample],
    ) -> HourViewModel {
        HourViewModel {
            city: city.to_string(),
            weekday: weekday.to_string(),
            hours: self.build_hour_forecast(series),
        }
    }

    fn stamp<'a>(&self, series: &'a [RawWeatherSample]) -> Vec<Stamped<'a>> {
        let stamped: Vec<_> = series
            .iter()
            .filter_map(|sample| {
                let at = sample.timestamp.and_then(|ts| local_datetime(ts, self.offset))?;
                Some(Stamped { at, sample })
            })
            .collect();

        let dropped = series.len() - stamped.len();
        if dropped > 0 {
            debug!(dropped, total = series.len(), "skipping samples without a usable timestamp");
        }

        stamped
    }

    fn representatives<'a>(
        &self,
        samples: impl IntoIterator<Item = Stamped<'a>>,
        limit: usize,
    ) -> Vec<DayForecast> {
        let mut days: BTreeMap<NaiveDate, Vec<Stamped<'a>>> = BTreeMap::new();
        for s in samples {
            days.entry(s.at.date_naive()).or_default().push(s);
        }

        days.into_iter()
            .filter_map(|(date, group)| {
                let pick = group.iter().min_by_key(|s| (s.distance_from_noon(), s.at))?;
                Some(self.day_forecast(date, pick.sample))
            })
            .take(limit)
            .collect()
    }

    fn day_forecast(&self, date: NaiveDate, sample: &RawWeatherSample) -> DayForecast {
        DayForecast {
            date_label: date_label(date),
            temperature: sample.temperature,
            label: self.catalog.describe(sample.condition_code.as_deref()).to_string(),
            icon_ref: self.icons.resolve(sample.icon_code.as_deref()),
        }
    }
}
