//! Persisted speaker-configuration storage (§4.5 "Speaker config"), standing
//! in for the Windows registry key (`dsound_main.c`'s
//! `HKCU\Software\...\DirectSound`) the original persists the same DWORD to.

use std::{fs, io, path::PathBuf};

use crate::{macros::whoops, SpeakerConfig};

/// Storage backend for the persisted speaker-configuration DWORD. The
/// abstraction point callers should depend on is this trait, not
/// [`FileSpeakerConfigStore`] — a platform-specific backend (Windows
/// registry, plist, …) can be swapped in without touching `primary.rs`.
pub trait SpeakerConfigStore: Send + Sync {
    /// Read the persisted config, or `None` if nothing has been stored yet
    /// or the stored value is unreadable.
    fn load(&self) -> Option<SpeakerConfig>;

    /// Persist `config`. Failures are logged, not propagated — losing the
    /// persisted speaker config is not fatal to the caller's `SetSpeakerConfig`.
    fn store(&self, config: SpeakerConfig);
}

/// Default store: one small text file under the OS config directory holding
/// the packed DWORD as decimal text.
pub struct FileSpeakerConfigStore {
    path: PathBuf,
}

impl FileSpeakerConfigStore {
    /// Use the platform config directory (`dirs::config_dir`), e.g.
    /// `~/.config/dsoal/speaker-config` on Linux.
    pub fn new() -> Self {
        let dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("dsoal");
        FileSpeakerConfigStore { path: dir.join("speaker-config") }
    }

    /// Use an explicit path, for embedding applications that manage their
    /// own config layout (and for tests).
    pub fn with_path(path: PathBuf) -> Self {
        FileSpeakerConfigStore { path }
    }

    fn read(&self) -> io::Result<u32> {
        let text = fs::read_to_string(&self.path)?;
        text.trim()
            .parse()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "malformed speaker-config file"))
    }
}

impl Default for FileSpeakerConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerConfigStore for FileSpeakerConfigStore {
    fn load(&self) -> Option<SpeakerConfig> {
        let dword = self.read().ok()?;
        SpeakerConfig::from_dword(dword)
    }

    fn store(&self, config: SpeakerConfig) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                whoops!("failed to create speaker-config directory: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, config.to_dword().to_string()) {
            whoops!("failed to persist speaker-config: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SpeakerGeometry;

    fn temp_store() -> FileSpeakerConfigStore {
        let path = std::env::temp_dir()
            .join(format!("dsoal-speaker-config-test-{}-{:?}", std::process::id(), std::thread::current().id()));
        FileSpeakerConfigStore::with_path(path)
    }

    #[test]
    fn missing_file_loads_as_none() {
        let store = temp_store();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn round_trips_through_disk() {
        let store = temp_store();
        let cfg = SpeakerConfig { geometry: 20, config: SpeakerGeometry::FivePointOne };
        store.store(cfg);
        assert_eq!(store.load(), Some(cfg));
        let _ = fs::remove_file(&store.path);
    }
}
