use std::collections::HashMap;

use crate::frame::TextureId;

/// Stand-in for the GL texture namespace of the current context.
#[derive(Debug)]
pub(crate) struct TextureRegistry {
    next: u32,
    sizes: HashMap<TextureId, (u32, u32)>,
}

impl TextureRegistry {
    pub(crate) fn new() -> Self {
        // Texture names start at 1, 0 is the "no texture" name.
        Self {
            next: 1,
            sizes: HashMap::new(),
        }
    }

    pub(crate) fn create(&mut self, width: u32, height: u32) -> TextureId {
        loop {
            let id = TextureId(self.next);
            self.next = self.next.wrapping_add(1).max(1);
            if !self.sizes.contains_key(&id) {
                self.sizes.insert(id, (width, height));
                return id;
            }
        }
    }

    /// Registers a caller-chosen name, as `glBindTexture` does for unused names.
    pub(crate) fn ensure(&mut self, id: TextureId, width: u32, height: u32) {
        if id.is_none() {
            return;
        }
        self.sizes.insert(id, (width, height));
    }

    pub(crate) fn delete(&mut self, id: TextureId) -> bool {
        self.sizes.remove(&id).is_some()
    }

    pub(crate) fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.sizes.get(&id).copied()
    }
}
