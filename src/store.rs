use chrono::Local;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub done: bool,
    pub created_at: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Title cannot be empty.")]
    InvalidTitle,
}

/// What `load` found on disk. Missing and Invalid both leave the store empty.
#[derive(Debug, PartialEq)]
pub enum LoadStatus {
    Loaded(usize),
    Missing,
    Invalid,
}

pub struct TaskStore {
    pub path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, tasks: Vec::new() }
    }

    /// Rebuild the in-memory list from the task file. Never fails: a missing,
    /// unreadable or malformed file leaves the list empty and logs a warning.
    pub fn load(&mut self) -> LoadStatus {
        self.tasks.clear();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} does not exist. Starting with empty task list.", self.path.display());
                return LoadStatus::Missing;
            }
            Err(e) => {
                warn!("Could not read {}: {}. Starting with empty task list.", self.path.display(), e);
                return LoadStatus::Invalid;
            }
        };
        let data: serde_json::Value = match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                warn!("{} is corrupted: {}. Starting with empty task list.", self.path.display(), e);
                return LoadStatus::Invalid;
            }
        };
        if !data.is_array() {
            warn!("{} is not a valid task list. Starting with empty task list.", self.path.display());
            return LoadStatus::Invalid;
        }
        match serde_json::from_value(data) {
            Ok(tasks) => {
                self.tasks = tasks;
                LoadStatus::Loaded(self.tasks.len())
            }
            Err(e) => {
                warn!("{} is not a valid task list: {}. Starting with empty task list.", self.path.display(), e);
                LoadStatus::Invalid
            }
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, title: &str) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidTitle);
        }
        let task = Task {
            id: self.next_id(),
            title: title.to_string(),
            done: false,
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        self.tasks.push(task.clone());
        self.save();
        Ok(task)
    }

    /// One-way transition: false if the task is missing or already done.
    pub fn mark_done(&mut self, id: u64) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) if !task.done => {
                task.done = true;
                self.save();
                true
            }
            _ => false,
        }
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tasks.remove(pos);
        self.renumber();
        self.save();
        true
    }

    pub fn edit(&mut self, id: u64, new_title: &str) -> bool {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.title = new_title.to_string();
                self.save();
                true
            }
            None => false,
        }
    }

    // IDs stay contiguous only because every delete renumbers, so max + 1
    // equals count + 1 in practice. The max-based rule is still the contract.
    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
    }

    /// Reassign every task id to its 1-based position. Runs after each removal.
    fn renumber(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.id = index as u64 + 1;
        }
    }

    /// Overwrite the whole task file. A failed write is logged and the
    /// in-memory state stands.
    fn save(&self) {
        let content = match serde_json::to_string_pretty(&self.tasks) {
            Ok(content) => content,
            Err(e) => {
                error!("Could not serialize tasks: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, content) {
            error!("Could not save tasks to {}: {}", self.path.display(), e);
        }
    }
}
