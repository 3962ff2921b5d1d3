//! Store methods for the key-value save slot.

use super::PlantStore;
use crate::error::SimResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

impl PlantStore {
    /// Overwrite the slot wholesale.
    pub fn save_state(&self, slot_key: &str, state_json: &str, saved_at: DateTime<Utc>) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO save_slot (slot_key, state_json, saved_at)
             VALUES (?1, ?2, ?3)",
            params![slot_key, state_json, saved_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load_state(&self, slot_key: &str) -> SimResult<Option<String>> {
        let json = self
            .conn
            .query_row(
                "SELECT state_json FROM save_slot WHERE slot_key = ?1",
                params![slot_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(json)
    }

    /// When the slot was last written. None if empty or unparseable.
    pub fn saved_at(&self, slot_key: &str) -> SimResult<Option<DateTime<Utc>>> {
        let raw = self
            .conn
            .query_row(
                "SELECT saved_at FROM save_slot WHERE slot_key = ?1",
                params![slot_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    pub fn clear_state(&self, slot_key: &str) -> SimResult<()> {
        self.conn.execute(
            "DELETE FROM save_slot WHERE slot_key = ?1",
            params![slot_key],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PlantStore {
        let store = PlantStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn save_overwrites_the_slot() {
        let store = store();
        let now = Utc::now();
        store.save_state("slot", r#"{"a":1}"#, now).unwrap();
        store.save_state("slot", r#"{"a":2}"#, now).unwrap();
        assert_eq!(store.load_state("slot").unwrap().as_deref(), Some(r#"{"a":2}"#));
    }

    #[test]
    fn empty_slot_loads_none() {
        let store = store();
        assert_eq!(store.load_state("slot").unwrap(), None);
        assert_eq!(store.saved_at("slot").unwrap(), None);
    }

    #[test]
    fn clear_removes_the_slot() {
        let store = store();
        store.save_state("slot", "{}", Utc::now()).unwrap();
        assert!(store.saved_at("slot").unwrap().is_some());
        store.clear_state("slot").unwrap();
        assert_eq!(store.load_state("slot").unwrap(), None);
    }
}
