use chrono::Weekday;
use tracing::{info, warn};

use crate::{
    error::FetchError,
    model::{Conditions, Location, Timeline, Units},
    panels::{self, CelestialPanel, ChartBar, ForecastCard, ForecastRange, RainChance},
    provider::WeatherProvider,
};

/// Top-level dashboard state: the current location, the last fetch
/// outcome and which day of the combined timeline is shown in detail.
#[derive(Debug, Clone)]
pub struct Dashboard {
    location: Location,
    units: Units,
    loading: bool,
    error: Option<String>,
    timeline: Option<Timeline>,
    selected: usize,
    range: ForecastRange,
}

impl Dashboard {
    pub fn new(location: Location, units: Units) -> Self {
        Self {
            location,
            units,
            loading: false,
            error: None,
            timeline: None,
            selected: 0,
            range: ForecastRange::default(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last successful timeline, if the last fetch succeeded.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn range(&self) -> ForecastRange {
        self.range
    }

    /// Switch to a new location. The selection returns to today because
    /// the old index refers to another city's timeline.
    ///
    /// Returns `false` when the location did not change; nothing is reset
    /// in that case.
    pub fn set_location(&mut self, location: Location) -> bool {
        if location == self.location {
            return false;
        }
        info!(from = %self.location, to = %location, "location changed");
        self.location = location;
        self.selected = 0;
        true
    }

    /// Fetch the current location and replace the timeline wholesale.
    ///
    /// On failure the stale timeline is dropped, so no day cards render
    /// next to the error.
    pub async fn refresh(&mut self, provider: &dyn WeatherProvider) -> Result<(), FetchError> {
        self.begin_fetch();
        let result = provider.fetch_weather(&self.location).await;
        self.finish_fetch(result)
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record a fetch outcome. The error is also returned so callers can
    /// log or propagate it.
    pub fn finish_fetch(&mut self, result: Result<Timeline, FetchError>) -> Result<(), FetchError> {
        self.loading = false;

        match result {
            Ok(timeline) => {
                self.timeline = Some(timeline);
                self.error = None;
                if self.selected >= self.day_count() {
                    self.selected = 0;
                }
                self.apply_pinned_day();
                Ok(())
            }
            Err(err) => {
                warn!(location = %self.location, error = %err, "weather fetch failed");
                self.timeline = None;
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Number of entries in the combined timeline, 0 before the first
    /// successful fetch.
    pub fn day_count(&self) -> usize {
        self.timeline.as_ref().map_or(0, Timeline::combined_len)
    }

    /// Show day `index` in detail and return it.
    ///
    /// Out-of-range indices return `None` and leave the selection alone.
    /// Selecting the already selected day changes nothing.
    pub fn select_day(&mut self, index: usize) -> Option<&Conditions> {
        let timeline = self.timeline.as_ref()?;
        let day = timeline.day(index)?;
        self.selected = index;
        if self.range.pinned_day().is_some_and(|pinned| pinned != index) {
            self.range = ForecastRange::Week;
        }
        Some(day)
    }

    /// Switch the card strip between today, tomorrow and the whole week.
    /// Today and tomorrow also move the selection, immediately or once
    /// the next fetch brings that day in.
    pub fn set_range(&mut self, range: ForecastRange) {
        self.range = range;
        self.apply_pinned_day();
    }

    fn apply_pinned_day(&mut self) {
        if let Some(pinned) = self.range.pinned_day()
            && pinned < self.day_count()
        {
            self.selected = pinned;
        }
    }

    pub fn selected_day(&self) -> Option<&Conditions> {
        self.timeline.as_ref()?.day(self.selected)
    }

    pub fn celestial(&self) -> Option<CelestialPanel> {
        CelestialPanel::from_day(self.selected_day(), self.units)
    }

    pub fn rain_chance(&self) -> Option<RainChance> {
        RainChance::from_day(self.selected_day())
    }

    /// Empty while loading or after a failed fetch.
    pub fn cards(&self, today: Weekday) -> Vec<ForecastCard> {
        self.timeline.as_ref().map_or_else(Vec::new, |t| {
            panels::forecast_cards(t, today, self.selected, self.range, self.units)
        })
    }

    pub fn chart(&self, today: Weekday) -> Vec<ChartBar> {
        self.timeline.as_ref().map_or_else(Vec::new, |t| {
            panels::temperature_chart(t, today, self.selected)
        })
    }
}
