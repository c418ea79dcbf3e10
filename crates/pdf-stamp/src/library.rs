use crate::constants::{MAX_STAMP_ASSETS, is_png};
use crate::types::{Result, StampError};

/// Identifier for a stamp asset in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StampId(pub u64);

/// An uploaded stamp image. Immutable once added.
#[derive(Debug, Clone)]
pub struct StampAsset {
    pub id: StampId,
    pub name: String,
    bytes: Vec<u8>,
}

impl StampAsset {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Bounded collection of uploaded stamp assets with generator-assigned ids
#[derive(Debug, Default)]
pub struct StampLibrary {
    assets: Vec<StampAsset>,
    next_id: u64,
}

impl StampLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a PNG asset. Fails when the payload is not a PNG or the library
    /// already holds the maximum number of assets; never evicts.
    pub fn add(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<StampId> {
        if !is_png(&bytes) {
            return Err(StampError::UnsupportedStampFormat);
        }
        if self.assets.len() >= MAX_STAMP_ASSETS {
            return Err(StampError::LibraryFull {
                max: MAX_STAMP_ASSETS,
            });
        }

        let id = StampId(self.next_id);
        self.next_id += 1;
        self.assets.push(StampAsset {
            id,
            name: name.into(),
            bytes,
        });
        Ok(id)
    }

    /// Remove an asset, returning whether it existed.
    pub fn remove(&mut self, id: StampId) -> bool {
        let before = self.assets.len();
        self.assets.retain(|asset| asset.id != id);
        self.assets.len() != before
    }

    pub fn get(&self, id: StampId) -> Option<&StampAsset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn assets(&self) -> &[StampAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
