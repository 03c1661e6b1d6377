use std::collections::BTreeSet;
use std::fmt;

/// Opaque id of a panel texture.
///
/// Unique among live textures and stable for the lifetime of the surface that
/// owns it. Ids of released textures may be handed out again. Zero is never
/// issued.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureHandle(pub(crate) u32);

impl TextureHandle {
    /// Wraps a raw id received from the host (e.g. the target id of a pointer sample).
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Issues texture ids the way GL issues texture names.
///
/// Released ids go to a free list and the lowest one is reused first, so a
/// live id is never issued twice.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    issued: u32,
    free: BTreeSet<u32>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> TextureHandle {
        if let Some(id) = self.free.pop_first() {
            return TextureHandle(id);
        }
        self.issued = self.issued.checked_add(1).unwrap_or_else(|| {
            panic!("texture handle space exhausted after {} live textures", u32::MAX)
        });
        TextureHandle(self.issued)
    }

    /// Returns `false` for ids that are not currently live.
    pub fn release(&mut self, handle: TextureHandle) -> bool {
        if handle.0 == 0 || handle.0 > self.issued {
            return false;
        }
        self.free.insert(handle.0)
    }

    pub fn is_live(&self, handle: TextureHandle) -> bool {
        handle.0 != 0 && handle.0 <= self.issued && !self.free.contains(&handle.0)
    }

    /// Number of ids currently live.
    pub fn live(&self) -> usize {
        self.issued as usize - self.free.len()
    }
}
