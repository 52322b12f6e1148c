//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable handle to an object registered in a [`crate::render::scene::Scene`]
    pub struct ObjectKey;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<ObjectKey, T>;
