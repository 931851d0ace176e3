//! Flat-file calendar store.
//!
//! Persistence format, one line per event, sorted by date on every rewrite:
//!
//! ```text
//! YYYY-MM-DD:description@HH:MM-HH:MM
//! ```
//!
//! The whole file is loaded into memory once at session start; every
//! mutation rewrites the full set back to disk (read-modify-write-whole-file,
//! not append).

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use maxwell_core::Result;

/// One calendar event. Events are keyed by date in the store; `start < stop`
/// is enforced on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub description: String,
    pub start: NaiveTime,
    pub stop: NaiveTime,
}

/// In-memory calendar cache backed by a flat file.
///
/// Duplicate events are kept (add is not idempotent); deletion matches the
/// description exactly and removes every match on the date.
#[derive(Debug)]
pub struct CalendarStore {
    path: PathBuf,
    events: BTreeMap<NaiveDate, Vec<CalendarEvent>>,
}

impl CalendarStore {
    /// Opens the store, loading any existing events. Malformed lines are
    /// skipped rather than failing the load.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut events: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();

        if let Ok(content) = std::fs::read_to_string(&path) {
            for line in content.lines() {
                match parse_line(line) {
                    Some((date, event)) => events.entry(date).or_default().push(event),
                    None => {
                        if !line.trim().is_empty() {
                            tracing::warn!(line, "skipping malformed calendar line");
                        }
                    }
                }
            }
        }

        Self { path, events }
    }

    /// Adds an event and persists the full set. The caller validates
    /// `start < stop` and reports it conversationally; the store only
    /// guards its own invariant.
    pub fn add_event(
        &mut self,
        date: NaiveDate,
        description: impl Into<String>,
        start: NaiveTime,
        stop: NaiveTime,
    ) -> Result<()> {
        debug_assert!(start < stop);
        self.events.entry(date).or_default().push(CalendarEvent {
            description: description.into(),
            start,
            stop,
        });
        self.save()
    }

    /// Events on a date, sorted by start time.
    pub fn events_for(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        let mut events = self.events.get(&date).cloned().unwrap_or_default();
        events.sort_by_key(|e| e.start);
        events
    }

    /// Removes every event on `date` whose description matches exactly,
    /// persisting if anything was removed. Returns the number removed.
    pub fn delete_events(&mut self, date: NaiveDate, description: &str) -> Result<usize> {
        let Some(day) = self.events.get_mut(&date) else {
            return Ok(0);
        };
        let before = day.len();
        day.retain(|e| e.description != description);
        let removed = before - day.len();
        if day.is_empty() {
            self.events.remove(&date);
        }
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Whether any event exists on the given date.
    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.events.contains_key(&date)
    }

    /// Rewrites the whole store to disk, sorted by date.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for (date, events) in &self.events {
            for event in events {
                out.push_str(&format!(
                    "{}:{}@{}-{}\n",
                    date.format("%Y-%m-%d"),
                    event.description,
                    event.start.format("%H:%M"),
                    event.stop.format("%H:%M"),
                ));
            }
        }
        std::fs::write(&self.path, out)?;
        Ok(())
    }
}

fn parse_line(line: &str) -> Option<(NaiveDate, CalendarEvent)> {
    let line = line.trim();
    let (date_str, event_data) = line.split_once(':')?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
    let (description, times) = event_data.split_once('@')?;
    let (start_str, stop_str) = times.split_once('-')?;
    let start = NaiveTime::parse_from_str(start_str, "%H:%M").ok()?;
    let stop = NaiveTime::parse_from_str(stop_str, "%H:%M").ok()?;
    Some((
        date,
        CalendarEvent {
            description: description.trim().to_string(),
            start,
            stop,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_add_then_get() {
        let temp = TempDir::new().unwrap();
        let mut store = CalendarStore::open(temp.path().join("calendar_events.txt"));

        store
            .add_event(date("2025-01-01"), "Meeting", time("09:00"), time("10:00"))
            .unwrap();

        let events = store.events_for(date("2025-01-01"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Meeting");
    }

    #[test]
    fn test_events_sorted_by_start_time() {
        let temp = TempDir::new().unwrap();
        let mut store = CalendarStore::open(temp.path().join("cal.txt"));
        store
            .add_event(date("2025-01-01"), "Late", time("15:00"), time("16:00"))
            .unwrap();
        store
            .add_event(date("2025-01-01"), "Early", time("08:00"), time("09:00"))
            .unwrap();

        let events = store.events_for(date("2025-01-01"));
        assert_eq!(events[0].description, "Early");
        assert_eq!(events[1].description, "Late");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let temp = TempDir::new().unwrap();
        let mut store = CalendarStore::open(temp.path().join("cal.txt"));
        for _ in 0..2 {
            store
                .add_event(date("2025-01-01"), "Standup", time("09:00"), time("09:15"))
                .unwrap();
        }
        assert_eq!(store.events_for(date("2025-01-01")).len(), 2);
    }

    #[test]
    fn test_delete_removes_exact_matches_only() {
        let temp = TempDir::new().unwrap();
        let mut store = CalendarStore::open(temp.path().join("cal.txt"));
        store
            .add_event(date("2025-01-01"), "Meeting", time("09:00"), time("10:00"))
            .unwrap();
        store
            .add_event(date("2025-01-01"), "Lunch", time("12:00"), time("13:00"))
            .unwrap();

        assert_eq!(
            store.delete_events(date("2025-01-01"), "Nonexistent").unwrap(),
            0
        );
        assert_eq!(store.events_for(date("2025-01-01")).len(), 2);

        assert_eq!(store.delete_events(date("2025-01-01"), "Meeting").unwrap(), 1);
        let remaining = store.events_for(date("2025-01-01"));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].description, "Lunch");
    }

    #[test]
    fn test_persistence_format_sorted_by_date() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cal.txt");
        let mut store = CalendarStore::open(&path);
        store
            .add_event(date("2025-03-05"), "Later", time("10:00"), time("11:00"))
            .unwrap();
        store
            .add_event(date("2025-01-01"), "Sooner", time("09:00"), time("10:00"))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "2025-01-01:Sooner@09:00-10:00\n2025-03-05:Later@10:00-11:00\n"
        );
    }

    #[test]
    fn test_reload_round_trip_and_malformed_lines_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cal.txt");
        std::fs::write(
            &path,
            "2025-01-01:Meeting@09:00-10:00\nnot a calendar line\n2025-01-02:bad time@9am-10am\n",
        )
        .unwrap();

        let store = CalendarStore::open(&path);
        assert_eq!(store.events_for(date("2025-01-01")).len(), 1);
        assert!(store.events_for(date("2025-01-02")).is_empty());
    }
}
