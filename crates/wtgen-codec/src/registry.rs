//! The four-slot wavetable registry.
//!
//! The registry is the handoff point between the non-realtime loader and
//! realtime audio readers. Each slot holds an `Arc<Wavetable>` plus the
//! source document text and a display name. A mutex guards only the handle
//! array; replacing or cloning handles is a few pointer operations, so the
//! critical section is bounded regardless of wavetable size. The wavetable
//! behind a handle is immutable, so a reader holding a snapshot never needs
//! the lock again.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::loader::{decode_wavetable, LoaderConfig};
use crate::wavetable::Wavetable;

/// Number of wavetable slots.
pub const SLOT_COUNT: usize = 4;

/// Persistable identity of one loaded slot: replaying
/// [`SlotRegistry::load_document`] with these two strings rebuilds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotState {
    /// Display name.
    pub name: String,
    /// Original document text.
    pub source: String,
}

#[derive(Debug, Clone)]
struct SlotEntry {
    wavetable: Arc<Wavetable>,
    source: Arc<str>,
    name: String,
}

/// Four-slot registry publishing decoded wavetables to realtime readers.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: Mutex<[Option<SlotEntry>; SLOT_COUNT]>,
    config: LoaderConfig,
}

impl SlotRegistry {
    /// Creates an empty registry with the default loader configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with an explicit loader configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            slots: Mutex::default(),
            config,
        }
    }

    /// Decodes `text` and installs the result into `slot`.
    ///
    /// All decoding happens before the lock is taken; on error the slot keeps
    /// whatever it held.
    pub fn load_document(&self, slot: usize, text: &str, name: &str) -> CodecResult<()> {
        check_slot(slot)?;
        let wavetable = decode_wavetable(text, name, &self.config)?;
        self.install(slot, Arc::new(wavetable), text, name)
    }

    /// Reads a document file and loads it into `slot`, deriving the display
    /// name from the file name.
    pub fn load_file(&self, slot: usize, path: &Path) -> CodecResult<()> {
        check_slot(slot)?;
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.load_document(slot, &text, &name)
    }

    /// Installs an already-decoded wavetable, replacing the slot atomically
    /// with respect to readers.
    pub fn install(
        &self,
        slot: usize,
        wavetable: Arc<Wavetable>,
        source: &str,
        name: &str,
    ) -> CodecResult<()> {
        check_slot(slot)?;
        let entry = SlotEntry {
            wavetable,
            source: Arc::from(source),
            name: name.to_owned(),
        };
        self.lock()[slot] = Some(entry);
        Ok(())
    }

    /// Clones all four slot handles under one short critical section.
    pub fn snapshot(&self) -> [Option<Arc<Wavetable>>; SLOT_COUNT] {
        let slots = self.lock();
        std::array::from_fn(|i| slots[i].as_ref().map(|e| Arc::clone(&e.wavetable)))
    }

    /// The wavetable currently in `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<Arc<Wavetable>> {
        if slot >= SLOT_COUNT {
            return None;
        }
        self.lock()[slot].as_ref().map(|e| Arc::clone(&e.wavetable))
    }

    /// Display name of `slot`, if loaded.
    pub fn name(&self, slot: usize) -> Option<String> {
        if slot >= SLOT_COUNT {
            return None;
        }
        self.lock()[slot].as_ref().map(|e| e.name.clone())
    }

    /// Source document text of `slot`, if loaded.
    pub fn source(&self, slot: usize) -> Option<String> {
        if slot >= SLOT_COUNT {
            return None;
        }
        self.lock()[slot].as_ref().map(|e| e.source.to_string())
    }

    /// Captures the persistable state of every slot.
    pub fn saved_state(&self) -> [Option<SlotState>; SLOT_COUNT] {
        let slots = self.lock();
        std::array::from_fn(|i| {
            slots[i].as_ref().map(|e| SlotState {
                name: e.name.clone(),
                source: e.source.to_string(),
            })
        })
    }

    /// Replays the saved state. A slot whose document no longer decodes is
    /// left empty; the rest of the restore proceeds. Returns how many slots
    /// were restored.
    pub fn restore(&self, state: &[Option<SlotState>; SLOT_COUNT]) -> usize {
        let mut restored = 0;
        for (slot, entry) in state.iter().enumerate() {
            if let Some(entry) = entry {
                if self.load_document(slot, &entry.source, &entry.name).is_ok() {
                    restored += 1;
                }
            }
        }
        restored
    }

    fn lock(&self) -> MutexGuard<'_, [Option<SlotEntry>; SLOT_COUNT]> {
        // A poisoned lock only means a writer panicked mid-swap; the handles
        // themselves are still valid Arcs.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn check_slot(slot: usize) -> CodecResult<()> {
    if slot >= SLOT_COUNT {
        return Err(CodecError::SlotOutOfRange { slot });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn table(name: &str) -> Arc<Wavetable> {
        Arc::new(Wavetable::from_frames(2, 1, vec![0.5, -0.5], name))
    }

    #[test]
    fn test_empty_registry_snapshot() {
        let registry = SlotRegistry::new();
        assert!(registry.snapshot().iter().all(Option::is_none));
        assert!(registry.get(0).is_none());
        assert!(registry.name(0).is_none());
        assert!(registry.source(0).is_none());
    }

    #[test]
    fn test_install_and_get() {
        let registry = SlotRegistry::new();
        registry.install(2, table("a"), "{doc}", "a").unwrap();

        let got = registry.get(2).unwrap();
        assert_eq!(got.name(), "a");
        assert_eq!(registry.name(2).as_deref(), Some("a"));
        assert_eq!(registry.source(2).as_deref(), Some("{doc}"));
        assert!(registry.get(1).is_none());
    }

    #[test]
    fn test_install_replaces() {
        let registry = SlotRegistry::new();
        registry.install(0, table("old"), "s1", "old").unwrap();
        let held = registry.get(0).unwrap();

        registry.install(0, table("new"), "s2", "new").unwrap();
        assert_eq!(registry.get(0).unwrap().name(), "new");
        // A handle taken before the replacement stays valid.
        assert_eq!(held.name(), "old");
    }

    #[test]
    fn test_slot_out_of_range() {
        let registry = SlotRegistry::new();
        let err = registry.install(4, table("x"), "s", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Slot);
        assert!(registry.get(4).is_none());
        assert!(registry.name(17).is_none());
    }

    #[test]
    fn test_snapshot_sees_all_slots() {
        let registry = SlotRegistry::new();
        registry.install(0, table("a"), "s", "a").unwrap();
        registry.install(3, table("b"), "s", "b").unwrap();

        let snap = registry.snapshot();
        assert_eq!(snap[0].as_ref().unwrap().name(), "a");
        assert!(snap[1].is_none());
        assert!(snap[2].is_none());
        assert_eq!(snap[3].as_ref().unwrap().name(), "b");
    }

    #[test]
    fn test_saved_state_restore_skips_bad_slots() {
        let registry = SlotRegistry::new();
        let state = [
            Some(SlotState {
                name: "broken".into(),
                source: "not a document".into(),
            }),
            None,
            None,
            None,
        ];
        assert_eq!(registry.restore(&state), 0);
        assert!(registry.get(0).is_none());
    }

    #[test]
    fn test_slot_state_serde_round_trip() {
        let state = SlotState {
            name: "pad.wtgen.json".into(),
            source: "{\"schema\":\"wtgen-1\"}".into(),
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: SlotState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
