use crate::errors::TrackerError;
use crate::models::{Event, WeekDay, WeekResponse, time_based_id};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::info;

const DEFAULT_PROJECT: &str = "Unassigned";
const DEFAULT_TIME: &str = "1h";

#[derive(Debug, Clone, Default)]
pub struct Calendar {
    events: Vec<Event>,
}

impl Calendar {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn add_event(
        &mut self,
        title: &str,
        project: Option<&str>,
        time: Option<&str>,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<&Event, TrackerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::EmptyEventTitle);
        }
        let or_default = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        let id = time_based_id(now, |id| self.events.iter().any(|e| e.id == id));
        info!(event = %id, %date, "event added");
        self.events.push(Event {
            id,
            title: title.to_string(),
            date,
            project: or_default(project, DEFAULT_PROJECT),
            time: or_default(time, DEFAULT_TIME),
        });
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn remove_event(&mut self, event_id: &str) -> Result<Event, TrackerError> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| TrackerError::UnknownEvent(event_id.to_string()))?;
        Ok(self.events.remove(index))
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect()
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.date == date)
    }

    /// Monday-first week around `selected`, plus the selected day's events.
    pub fn week(&self, selected: NaiveDate, today: NaiveDate) -> WeekResponse {
        let days = week_of(selected)
            .into_iter()
            .map(|date| WeekDay {
                date: date.to_string(),
                weekday: date.format("%a").to_string(),
                has_events: self.has_events(date),
                is_today: date == today,
            })
            .collect();

        WeekResponse {
            month: selected.format("%B %Y").to_string(),
            days,
            selected: selected.to_string(),
            events: self.events_on(selected),
        }
    }
}

pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}
