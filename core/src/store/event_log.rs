//! Store methods for the signal/event log.

use super::PlantStore;
use crate::{error::SimResult, event::EventLogEntry, types::Tick};
use rusqlite::params;

impl PlantStore {
    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, tick, lifetime, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.session_id,
                entry.tick as i64,
                entry.lifetime,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    /// Events one engine session logged at `tick`.
    pub fn events_for_tick(&self, session_id: &str, tick: Tick) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, tick, lifetime, event_type, payload
             FROM event_log WHERE session_id = ?1 AND tick = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![session_id, tick as i64], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    session_id: row.get(1)?,
                    tick:       row.get::<_, i64>(2)? as u64,
                    lifetime:   row.get(3)?,
                    event_type: row.get(4)?,
                    payload:    row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, event_type: Option<&str>) -> SimResult<i64> {
        let count: i64 = match event_type {
            Some(t) => self.conn.query_row(
                "SELECT COUNT(*) FROM event_log WHERE event_type = ?1",
                params![t],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*) FROM event_log",
                [],
                |row| row.get(0),
            )?,
        };
        Ok(count)
    }

    /// Most recent `limit` entries, newest first.
    pub fn recent_events(&self, limit: usize) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, tick, lifetime, event_type, payload
             FROM event_log ORDER BY id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    session_id: row.get(1)?,
                    tick:       row.get::<_, i64>(2)? as u64,
                    lifetime:   row.get(3)?,
                    event_type: row.get(4)?,
                    payload:    row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
