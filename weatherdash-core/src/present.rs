//! View-model of the dashboard and the presenters that fill it.
//!
//! Presenters only ever write into slots that exist. A view built with fewer
//! slots than there is data for silently drops the extra records.

use serde::Serialize;
use tracing::warn;

use crate::{
    countdown::Countdown,
    format::{self, parse_time_of_day},
    forecast::{UPCOMING_HOURS, next_hours, order_week},
    model::{AstronomyInfo, WeatherSnapshot},
    moon::MoonPhase,
};

pub const HOURLY_SLOTS: usize = 1 + UPCOMING_HOURS;
pub const WEEKLY_SLOTS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub current: CurrentPanel,
    pub hourly: Vec<HourSlot>,
    pub weekly: Vec<DaySlot>,
    pub moon: MoonPanel,
    pub sun: SunPanel,
}

impl DashboardView {
    pub fn with_slots(hourly: usize, weekly: usize) -> Self {
        Self {
            current: CurrentPanel::default(),
            hourly: vec![HourSlot::default(); hourly],
            weekly: vec![DaySlot::default(); weekly],
            moon: MoonPanel::default(),
            sun: SunPanel::default(),
        }
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::with_slots(HOURLY_SLOTS, WEEKLY_SLOTS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub city: Option<String>,
    pub time: Option<String>,
    pub temperature: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourSlot {
    pub label: Option<String>,
    pub temperature: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaySlot {
    pub weekday: Option<String>,
    pub max: Option<String>,
    pub min: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoonPanel {
    pub phase: Option<String>,
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SunPanel {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub status: Option<String>,
    pub timer: Option<String>,
}

/// Current, hourly and weekly sections.
pub fn present_forecast(view: &mut DashboardView, snapshot: &WeatherSnapshot) {
    present_current(&mut view.current, snapshot);
    present_hourly(&mut view.hourly, snapshot);
    present_weekly(&mut view.weekly, snapshot);
}

/// Moon and sun sections.
pub fn present_astronomy(view: &mut DashboardView, astro: &AstronomyInfo) {
    present_moon(&mut view.moon, astro);
    present_sun(&mut view.sun, astro);
}

pub fn present_current(panel: &mut CurrentPanel, snapshot: &WeatherSnapshot) {
    panel.city = Some(snapshot.location_name.clone());
    panel.time = Some(format::clock_label(snapshot.local_time));
    panel.temperature = Some(format::celsius(snapshot.current.temperature_c));
    panel.icon = Some(format::icon_url(&snapshot.current.icon));
}

/// Slot 0 is the live reading; the rest are the upcoming hours. Slots left
/// over when fewer hours are available are cleared.
pub fn present_hourly(slots: &mut [HourSlot], snapshot: &WeatherSnapshot) {
    slots.fill(HourSlot::default());
    let Some((now_slot, rest)) = slots.split_first_mut() else {
        return;
    };

    now_slot.label = Some("Now".to_string());
    now_slot.temperature = Some(format::degrees(snapshot.current.temperature_c));
    now_slot.icon = Some(format::icon_url(&snapshot.current.icon));

    let upcoming = next_hours(snapshot.hours(), snapshot.current.last_updated, UPCOMING_HOURS);
    for (slot, hour) in rest.iter_mut().zip(upcoming) {
        slot.label = Some(format::hour_label(hour.time));
        slot.temperature = Some(format::degrees(hour.temperature_c));
        slot.icon = Some(format::icon_url(&hour.icon));
    }
}

pub fn present_weekly(slots: &mut [DaySlot], snapshot: &WeatherSnapshot) {
    slots.fill(DaySlot::default());
    let days = order_week(&snapshot.days, snapshot.local_time.date());
    for (slot, day) in slots.iter_mut().zip(days) {
        slot.weekday = Some(format::weekday_label(day.date));
        slot.max = Some(format::degrees(day.max_temp_c));
        slot.min = Some(format::degrees(day.min_temp_c));
        slot.icon = Some(format::icon_url(&day.icon));
    }
}

/// Unknown phase names keep whatever image was shown before.
pub fn present_moon(panel: &mut MoonPanel, astro: &AstronomyInfo) {
    panel.phase = Some(astro.moon_phase.clone());
    panel.moonrise = Some(astro.moonrise.clone());
    panel.moonset = Some(astro.moonset.clone());

    if let Some(phase) = MoonPhase::from_name(&astro.moon_phase) {
        panel.image = Some(phase.image_path());
        panel.image_alt = Some(phase.name().to_string());
    }
}

pub fn present_sun(panel: &mut SunPanel, astro: &AstronomyInfo) {
    panel.sunrise = Some(sun_time(&astro.sunrise));
    panel.sunset = Some(sun_time(&astro.sunset));

    match Countdown::from_astronomy(astro) {
        Ok(countdown) => {
            panel.status = Some(countdown.label().to_string());
            panel.timer = Some(countdown.formatted());
        }
        Err(err) => {
            panel.status = None;
            panel.timer = None;
            warn!(
                error = %err,
                sunrise = %astro.sunrise,
                sunset = %astro.sunset,
                "cannot compute sun countdown"
            );
        }
    }
}

fn sun_time(raw: &str) -> String {
    parse_time_of_day(raw).map(format::sun_time_label).unwrap_or_else(|_| raw.to_string())
}
