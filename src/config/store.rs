use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Contents of `sessions.toml`: every recorded session, oldest first.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SessionStore {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl SessionStore {
    /// Append a record, returning its id.
    pub fn append(&mut self, record: SessionRecord) -> String {
        let id = record.id.clone();
        self.sessions.push(record);
        id
    }

    /// Ids are millisecond timestamps; bump past any id already taken.
    pub fn next_id(&self, now_millis: i64) -> String {
        let mut candidate = now_millis;
        while self.sessions.iter().any(|s| s.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}
