//! Local filesystem storage implementation.
//!
//! Each collection is an append-only JSON Lines file. Inserts append one
//! line and flush; nothing is rewritten. Before every read the store tails
//! its files from the last consumed offset, so records appended by another
//! process (a sync run next to the API server) become visible without a
//! restart.
//!
//! ## Features
//!
//! - **Durable per record**: a crashed sync keeps everything it wrote
//! - **Incremental reload**: only bytes appended since the last read are parsed
//! - **Partial line tolerance**: a line still being written is picked up later

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{NewOrganization, OrgId, Organization, Task};
use crate::storage::memory::Collections;
use crate::storage::{OrgFilter, RecordStore, TaskFilter};

const ORGANIZATIONS_FILE: &str = "organizations.jsonl";
const TASKS_FILE: &str = "tasks.jsonl";

/// Read position within one collection file.
#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    offset: u64,
    line: usize,
}

#[derive(Debug, Default)]
struct State {
    collections: Collections,
    orgs: Cursor,
    tasks: Cursor,
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    root_dir: PathBuf,
    state: Mutex<State>,
}

impl LocalStorage {
    /// Open the store rooted at the given directory, loading existing records.
    pub async fn open(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            root_dir: root_dir.into(),
            state: Mutex::new(State::default()),
        };
        {
            let mut state = storage.state.lock().await;
            storage.refresh(&mut state).await?;
            log::debug!(
                "Opened storage at {} ({} bytes of organizations, {} bytes of tasks)",
                storage.root_dir.display(),
                state.orgs.offset,
                state.tasks.offset
            );
        }
        Ok(storage)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Append one JSON record as a line.
    async fn append_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read bytes from `offset` to the end, returning None if the file doesn't exist.
    async fn read_from(&self, key: &str, offset: u64) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };

        if file.metadata().await?.len() < offset {
            return Err(AppError::storage(
                key,
                "file shrank below the last read position",
            ));
        }

        file.seek(SeekFrom::Start(offset)).await?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;
        Ok(Some(bytes))
    }

    /// Parse complete lines appended since `cursor`, advancing it.
    async fn read_new<T: DeserializeOwned>(&self, key: &str, cursor: &mut Cursor) -> Result<Vec<T>> {
        let Some(bytes) = self.read_from(key, cursor.offset).await? else {
            return Ok(Vec::new());
        };

        // A trailing line without a newline is still being written.
        let complete = match bytes.iter().rposition(|&b| b == b'\n') {
            Some(last) => &bytes[..=last],
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        let mut line = cursor.line;
        for raw in complete.split(|&b| b == b'\n') {
            if raw.is_empty() {
                continue;
            }
            line += 1;
            let record = serde_json::from_slice(raw)
                .map_err(|e| AppError::storage(format!("{key}:{line}"), e))?;
            records.push(record);
        }

        cursor.line = line;
        cursor.offset += complete.len() as u64;
        Ok(records)
    }

    /// Pull in everything appended since the last refresh.
    async fn refresh(&self, state: &mut State) -> Result<()> {
        for org in self.read_new::<Organization>(ORGANIZATIONS_FILE, &mut state.orgs).await? {
            let id = org.id;
            if !state.collections.push_org(org) {
                log::warn!("Ignoring duplicate organization id {id} in {ORGANIZATIONS_FILE}");
            }
        }

        for task in self.read_new::<Task>(TASKS_FILE, &mut state.tasks).await? {
            let key = task.key;
            if !state.collections.push_task(task) {
                log::warn!("Ignoring duplicate task key {key} in {TASKS_FILE}");
            }
        }

        Ok(())
    }

    /// Append an organization and confirm the stored record is ours.
    async fn append_org(&self, state: &mut State, org: Organization) -> Result<Organization> {
        self.append_json(ORGANIZATIONS_FILE, &org).await?;
        self.refresh(state).await?;

        // Another process may have claimed the same id first; its line wins.
        if state.collections.get_org(org.id).as_ref() != Some(&org) {
            return Err(AppError::storage(
                ORGANIZATIONS_FILE,
                format!("organization id {} was taken by a concurrent writer", org.id),
            ));
        }
        Ok(org)
    }

    /// Refresh, then run a read against the up-to-date collections.
    async fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> Result<R> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;
        Ok(f(&state.collections))
    }
}

#[async_trait]
impl RecordStore for LocalStorage {
    async fn find_organizations(&self, filter: &OrgFilter) -> Result<Vec<Organization>> {
        self.read(|c| c.find_orgs(filter)).await
    }

    async fn get_organization(&self, id: OrgId) -> Result<Option<Organization>> {
        self.read(|c| c.get_org(id)).await
    }

    async fn insert_organization(&self, org: NewOrganization) -> Result<Organization> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;

        let org = org.with_id(state.collections.next_org_id());
        self.append_org(&mut state, org).await
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.read(|c| c.find_tasks(filter)).await
    }

    async fn count_tasks(&self, filter: &TaskFilter) -> Result<usize> {
        self.read(|c| c.count_tasks(filter)).await
    }

    async fn insert_task(&self, task: Task) -> Result<()> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;

        if state.collections.contains_task(task.key) {
            return Err(AppError::validation(format!(
                "task {} is already stored",
                task.key
            )));
        }
        self.append_json(TASKS_FILE, &task).await?;
        self.refresh(&mut state).await
    }
}
