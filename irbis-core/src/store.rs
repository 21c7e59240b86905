// irbis-core/src/store.rs

//! Thread-keyed persistence for conversation transcripts. The thread id is
//! always an explicit parameter; nothing here infers identity from ambient
//! state. Callers must serialize concurrent turns on one thread; the store
//! only guarantees whole-transcript reads and writes.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::chat::Transcript;

/// Identifies one conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(Uuid);

impl ThreadId {
    pub fn new() -> Self {
        ThreadId(Uuid::new_v4())
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        ThreadId::new()
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ThreadId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ThreadId)
    }
}

/// Keyed transcript storage.
pub trait ConversationStore: Send + Sync {
    fn load(&self, thread_id: &ThreadId) -> Result<Option<Transcript>>;
    fn save(&self, thread_id: &ThreadId, transcript: &Transcript) -> Result<()>;
}

#[derive(Serialize, Deserialize, Debug)]
struct ThreadRecord {
    id: ThreadId,
    created_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
    transcript: Transcript,
}

/// One pretty-printed JSON file per thread under a root directory.
pub struct FileThreadStore {
    root: PathBuf,
}

impl FileThreadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileThreadStore { root: root.into() }
    }

    fn path_for(&self, thread_id: &ThreadId) -> PathBuf {
        self.root.join(format!("{}.json", thread_id))
    }

    fn load_record(&self, thread_id: &ThreadId) -> Result<Option<ThreadRecord>> {
        let path = self.path_for(thread_id);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)
            .with_context(|| format!("Failed to open thread file at {:?}", path))?;
        let reader = BufReader::new(file);
        let record: ThreadRecord = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to deserialize thread from {:?}", path))?;
        Ok(Some(record))
    }
}

impl ConversationStore for FileThreadStore {
    fn load(&self, thread_id: &ThreadId) -> Result<Option<Transcript>> {
        Ok(self.load_record(thread_id)?.map(|r| r.transcript))
    }

    fn save(&self, thread_id: &ThreadId, transcript: &Transcript) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create thread directory at {:?}", self.root))?;

        let now = Utc::now();
        let created_at = self
            .load_record(thread_id)?
            .map(|r| r.created_at)
            .unwrap_or(now);
        let record = ThreadRecord {
            id: *thread_id,
            created_at,
            last_updated_at: now,
            transcript: transcript.clone(),
        };

        let path = self.path_for(thread_id);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create thread file at {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &record)
            .with_context(|| format!("Failed to serialize thread to {:?}", path))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush writer for {:?}", path))?;
        Ok(())
    }
}

/// In-process store for the HTTP server and tests.
#[derive(Default)]
pub struct MemoryThreadStore {
    threads: Mutex<HashMap<ThreadId, Transcript>>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        MemoryThreadStore::default()
    }
}

impl ConversationStore for MemoryThreadStore {
    fn load(&self, thread_id: &ThreadId) -> Result<Option<Transcript>> {
        let threads = self
            .threads
            .lock()
            .map_err(|_| anyhow!("thread store mutex poisoned"))?;
        Ok(threads.get(thread_id).cloned())
    }

    fn save(&self, thread_id: &ThreadId, transcript: &Transcript) -> Result<()> {
        let mut threads = self
            .threads
            .lock()
            .map_err(|_| anyhow!("thread store mutex poisoned"))?;
        threads.insert(*thread_id, transcript.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatMessage;

    fn sample_transcript() -> Transcript {
        let mut transcript = Transcript::new("You are helpful.");
        transcript.push(ChatMessage {
            role: "user".into(),
            content: Some("hello".into()),
            ..Default::default()
        });
        transcript
    }

    #[test]
    fn file_store_round_trips_a_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThreadStore::new(dir.path());
        let thread_id = ThreadId::new();
        let transcript = sample_transcript();

        store.save(&thread_id, &transcript).unwrap();
        let loaded = store.load(&thread_id).unwrap().unwrap();
        assert_eq!(loaded.len(), transcript.len());
        assert_eq!(loaded.messages()[1].content.as_deref(), Some("hello"));
    }

    #[test]
    fn file_store_returns_none_for_unknown_threads() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThreadStore::new(dir.path());
        assert!(store.load(&ThreadId::new()).unwrap().is_none());
    }

    #[test]
    fn file_store_preserves_created_at_across_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThreadStore::new(dir.path());
        let thread_id = ThreadId::new();
        let transcript = sample_transcript();

        store.save(&thread_id, &transcript).unwrap();
        let first = store.load_record(&thread_id).unwrap().unwrap();
        store.save(&thread_id, &transcript).unwrap();
        let second = store.load_record(&thread_id).unwrap().unwrap();
        assert_eq!(first.created_at, second.created_at);
        assert!(second.last_updated_at >= first.last_updated_at);
    }

    #[test]
    fn memory_store_round_trips_a_transcript() {
        let store = MemoryThreadStore::new();
        let thread_id = ThreadId::new();
        let transcript = sample_transcript();

        assert!(store.load(&thread_id).unwrap().is_none());
        store.save(&thread_id, &transcript).unwrap();
        let loaded = store.load(&thread_id).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn thread_id_parses_its_own_display_output() {
        let id = ThreadId::new();
        let parsed: ThreadId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
