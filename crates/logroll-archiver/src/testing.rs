//! In-memory collaborators for unit tests

use logroll_domain::traits::{ArchiveStore, SourceCatalog};
use logroll_domain::{ArchiveEntryInfo, SourceFile};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

#[derive(Default)]
pub struct MemorySources {
    files: Vec<(SourceFile, Vec<u8>)>,
    unreadable: HashSet<String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a source file
    pub fn add(&mut self, name: &str, content: &[u8], modified: SystemTime) {
        self.files.retain(|(file, _)| file.name != name);
        let file = SourceFile::new(name, PathBuf::from("/").join(name), modified, content.len() as u64);
        self.files.push((file, content.to_vec()));
        self.files.sort_by(|a, b| a.0.name.cmp(&b.0.name));
    }

    pub fn fail_read_on(&mut self, name: &str) {
        self.unreadable.insert(name.to_string());
    }
}

impl SourceCatalog for MemorySources {
    type Error = String;

    fn list_sources(&self) -> Result<Vec<SourceFile>, Self::Error> {
        Ok(self.files.iter().map(|(file, _)| file.clone()).collect())
    }

    fn read_source(&self, source: &SourceFile) -> Result<Vec<u8>, Self::Error> {
        if self.unreadable.contains(&source.name) {
            return Err(format!("{} is locked", source.name));
        }
        self.files
            .iter()
            .find(|(file, _)| file.name == source.name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| format!("{} not found", source.name))
    }
}

#[derive(Default)]
pub struct MemoryArchive {
    entries: Mutex<HashMap<String, (Vec<u8>, SystemTime)>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, content: &[u8], modified: SystemTime) {
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), (content.to_vec(), modified));
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(name).map(|(content, _)| content.clone())
    }

    pub fn modified(&self, name: &str) -> Option<SystemTime> {
        self.entries.lock().unwrap().get(name).map(|(_, modified)| *modified)
    }

    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    fn check(&self, name: &str) -> Result<(), String> {
        if self.failing.lock().unwrap().contains(name) {
            return Err(format!("{}: disk full", name));
        }
        Ok(())
    }

    fn info(name: &str, content: &[u8], modified: SystemTime) -> ArchiveEntryInfo {
        ArchiveEntryInfo {
            name: name.to_string(),
            modified,
            stored_len: content.len() as u64,
        }
    }
}

impl ArchiveStore for MemoryArchive {
    type Error = String;

    fn entry_info(&self, name: &str) -> Result<Option<ArchiveEntryInfo>, Self::Error> {
        self.check(name)?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(name)
            .map(|(content, modified)| Self::info(name, content, *modified)))
    }

    fn read_entry(&self, name: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        self.check(name)?;
        Ok(self.get(name))
    }

    fn replace_entry(
        &self,
        name: &str,
        content: &[u8],
        stamp: Option<SystemTime>,
    ) -> Result<ArchiveEntryInfo, Self::Error> {
        self.check(name)?;
        let modified = stamp.unwrap_or_else(SystemTime::now);
        self.insert(name, content, modified);
        Ok(Self::info(name, content, modified))
    }

    fn list_entries(&self) -> Result<Vec<String>, Self::Error> {
        let mut names: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
