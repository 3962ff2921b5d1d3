//! Shared primitive types used across the entire simulation.
//!
//! Activity and growth-stat ids are closed enums: a progress map can never
//! reference an entry the definition tables do not know about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One engine tick. Ticks are counted per process, not persisted.
pub type Tick = u64;

/// A stable, unique identifier for a logged command.
pub type EntityId = String;

// ── Resources ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Water,
    Sunlight,
    Nutrients,
    Moonlight,
    Essence,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Water,
        Resource::Sunlight,
        Resource::Nutrients,
        Resource::Moonlight,
        Resource::Essence,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Water     => "water",
            Self::Sunlight  => "sunlight",
            Self::Nutrients => "nutrients",
            Self::Moonlight => "moonlight",
            Self::Essence   => "essence",
        }
    }
}

// ── Activities ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityId {
    AbsorbWater,
    Photosynthesize,
    ExtendRoots,
    DeepTapRoot,
    BroadCanopy,
    NightBloom,
    ChannelEssence,
    AncientRoots,
    CosmicPhotosynthesis,
}

impl ActivityId {
    /// Display order, matching the definition table.
    pub const ALL: [ActivityId; 9] = [
        ActivityId::AbsorbWater,
        ActivityId::Photosynthesize,
        ActivityId::ExtendRoots,
        ActivityId::DeepTapRoot,
        ActivityId::BroadCanopy,
        ActivityId::NightBloom,
        ActivityId::ChannelEssence,
        ActivityId::AncientRoots,
        ActivityId::CosmicPhotosynthesis,
    ];

    /// Stable key used in snapshots and the event log.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AbsorbWater          => "absorbWater",
            Self::Photosynthesize      => "photosynthesize",
            Self::ExtendRoots          => "extendRoots",
            Self::DeepTapRoot          => "deepTapRoot",
            Self::BroadCanopy          => "broadCanopy",
            Self::NightBloom           => "nightBloom",
            Self::ChannelEssence       => "channelEssence",
            Self::AncientRoots         => "ancientRoots",
            Self::CosmicPhotosynthesis => "cosmicPhotosynthesis",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Growth stats ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrowthStatId {
    RootDepth,
    StemHeight,
    LeafSize,
    FlowerBuds,
    EssenceAbsorption,
    AuraStrength,
    AncientMemory,
    CosmicAttunement,
}

impl GrowthStatId {
    pub const ALL: [GrowthStatId; 8] = [
        GrowthStatId::RootDepth,
        GrowthStatId::StemHeight,
        GrowthStatId::LeafSize,
        GrowthStatId::FlowerBuds,
        GrowthStatId::EssenceAbsorption,
        GrowthStatId::AuraStrength,
        GrowthStatId::AncientMemory,
        GrowthStatId::CosmicAttunement,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::RootDepth         => "rootDepth",
            Self::StemHeight        => "stemHeight",
            Self::LeafSize          => "leafSize",
            Self::FlowerBuds        => "flowerBuds",
            Self::EssenceAbsorption => "essenceAbsorption",
            Self::AuraStrength      => "auraStrength",
            Self::AncientMemory     => "ancientMemory",
            Self::CosmicAttunement  => "cosmicAttunement",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

impl fmt::Display for GrowthStatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthCategory {
    Physical,
    Magical,
}
