//! The [`HeaderProvider`] collaborator used by bisection.

use std::collections::BTreeMap;

use tendermint_light_client_types::LightBlock;

/// Errors returned by a [`HeaderProvider`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ProviderError {
    /// The provider has no header at this height
    #[error("no light block at height {0}")]
    NotFound(u64),

    /// The provider could not be reached or returned garbage
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of historical signed headers and their validator sets.
///
/// Each call may block or fail independently. Implementations that reach over the network
/// should apply their own timeout and report it as [`ProviderError::Unavailable`].
pub trait HeaderProvider {
    /// Fetches the signed header and validator set at `height`
    /// # Errors
    /// Returns an error if the block is not available
    fn fetch_light_block(&self, height: u64) -> Result<LightBlock, ProviderError>;
}

impl<T: HeaderProvider + ?Sized> HeaderProvider for &T {
    fn fetch_light_block(&self, height: u64) -> Result<LightBlock, ProviderError> {
        (**self).fetch_light_block(height)
    }
}

/// Placeholder provider type for verifiers that never bisect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoProvider {}

impl HeaderProvider for NoProvider {
    fn fetch_light_block(&self, _height: u64) -> Result<LightBlock, ProviderError> {
        match *self {}
    }
}

/// A provider serving light blocks held in memory
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryProvider {
    blocks: BTreeMap<u64, LightBlock>,
}

impl MemoryProvider {
    /// Creates an empty provider
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Adds a block, replacing any block at the same height
    pub fn insert(&mut self, block: LightBlock) {
        self.blocks.insert(block.height(), block);
    }

    /// Number of blocks held
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the provider holds no blocks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<LightBlock> for MemoryProvider {
    fn from_iter<I: IntoIterator<Item = LightBlock>>(iter: I) -> Self {
        let mut provider = Self::new();
        for block in iter {
            provider.insert(block);
        }
        provider
    }
}

impl HeaderProvider for MemoryProvider {
    fn fetch_light_block(&self, height: u64) -> Result<LightBlock, ProviderError> {
        self.blocks
            .get(&height)
            .cloned()
            .ok_or(ProviderError::NotFound(height))
    }
}
