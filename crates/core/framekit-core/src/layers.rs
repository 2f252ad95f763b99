//! Layer bitmasks and the name table used to address layers.

use serde::{Deserialize, Serialize};

/// Number of addressable layers.
pub const LAYER_COUNT: usize = 32;

/// Set of layers, one bit per layer index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub fn from_layers(layers: &[u8]) -> Self {
        layers
            .iter()
            .fold(Self::NONE, |mask, &layer| mask.with_layer(layer))
    }

    /// Copy with `layer` added. Out-of-range layers are ignored.
    pub fn with_layer(self, layer: u8) -> Self {
        match 1u32.checked_shl(u32::from(layer)) {
            Some(bit) => Self(self.0 | bit),
            None => self,
        }
    }

    pub fn contains_layer(self, layer: u8) -> bool {
        1u32.checked_shl(u32::from(layer))
            .is_some_and(|bit| self.contains_bits(bit))
    }

    /// True when every bit of `bits` is set in the mask.
    #[inline]
    pub fn contains_bits(self, bits: u32) -> bool {
        self.0 == (self.0 | bits)
    }

    /// Looks `name` up in `names`; unknown names are never contained.
    pub fn contains_named(self, names: &LayerNames, name: &str) -> bool {
        names
            .layer(name)
            .is_some_and(|layer| self.contains_layer(layer))
    }
}

/// Layer index ↔ name table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerNames {
    names: Vec<Option<String>>,
}

impl Default for LayerNames {
    /// Layer 0 is named "Default".
    fn default() -> Self {
        let mut names = vec![None; LAYER_COUNT];
        names[0] = Some("Default".to_string());
        Self { names }
    }
}

impl LayerNames {
    /// Name `layer`. Returns false for out-of-range indices.
    pub fn set(&mut self, layer: u8, name: impl Into<String>) -> bool {
        match self.names.get_mut(usize::from(layer)) {
            Some(slot) => {
                *slot = Some(name.into());
                true
            }
            None => false,
        }
    }

    pub fn layer(&self, name: &str) -> Option<u8> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .and_then(|idx| u8::try_from(idx).ok())
    }

    pub fn name(&self, layer: u8) -> Option<&str> {
        self.names.get(usize::from(layer))?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_mask_contains_layers() {
        let names = LayerNames::default();
        let mask = LayerMask::ALL;
        assert!(mask.contains_named(&names, "Default"));
        assert!(mask.contains_layer(1));
        assert!(mask.contains_bits(0 | 1));
    }

    #[test]
    fn empty_mask_contains_nothing() {
        let mut names = LayerNames::default();
        names.set(5, "UI");
        let mask = LayerMask::NONE;
        assert!(!mask.contains_named(&names, "UI"));
        assert!(!mask.contains_layer(1));
        assert!(!mask.contains_bits(0 | 1));
        assert!(mask.contains_bits(0));
    }

    #[test]
    fn layers_build_masks() {
        let mask = LayerMask::from_layers(&[0, 3, 40]);
        assert_eq!(mask, LayerMask(0b1001));
        assert!(mask.contains_layer(3));
        assert!(!mask.contains_layer(2));
        assert!(!mask.contains_layer(40));
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let names = LayerNames::default();
        assert_eq!(names.layer("Water"), None);
        assert_eq!(names.name(0), Some("Default"));
        assert_eq!(names.name(31), None);
    }
}
