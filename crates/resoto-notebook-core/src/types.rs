//! Core domain types for resources returned by the graph service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A JSON object as returned by the graph service.
pub type JsObject = serde_json::Map<String, serde_json::Value>;

// ── Resource Kinds ────────────────────────────────────────────────

/// Coarse classification of a provider-specific kind string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Unknown,
    Instance,
    Volume,
    Image,
    Firewall,
    K8sCluster,
    Network,
    LoadBalancer,
    Cloud,
}

impl ResourceKind {
    /// Classify a kind string such as `digitalocean_droplet`.
    ///
    /// The string is split on the first underscore into provider and
    /// remainder. Only DigitalOcean kinds are classified; everything else,
    /// including unknown DigitalOcean suffixes, is `Unknown`.
    pub fn parse_kind(kind: &str) -> Self {
        let (cloud, rest) = kind.split_once('_').unwrap_or((kind, ""));
        match cloud {
            "digitalocean" => Self::digitalocean(rest),
            _ => Self::Unknown,
        }
    }

    fn digitalocean(rest: &str) -> Self {
        match rest {
            "droplet" => Self::Instance,
            "volume" => Self::Volume,
            "image" => Self::Image,
            "firewall" => Self::Firewall,
            "kubernetes_cluster" => Self::K8sCluster,
            "network" => Self::Network,
            "load_balancer" => Self::LoadBalancer,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Instance => "instance",
            Self::Volume => "volume",
            Self::Image => "image",
            Self::Firewall => "firewall",
            Self::K8sCluster => "k8s_cluster",
            Self::Network => "network",
            Self::LoadBalancer => "load_balancer",
            Self::Cloud => "cloud",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rendered graph node shows about a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceDescription {
    /// Internal node identifier in the graph.
    pub uid: String,
    /// Provider identifier (`reported.id`).
    pub id: String,
    /// Display name (`reported.name`).
    pub name: String,
    pub kind: ResourceKind,
    /// The raw kind string (`reported.kind`).
    pub kind_name: String,
}

// ── Colors ────────────────────────────────────────────────────────

/// Number of slots in the `paired12` Graphviz color scheme.
pub const PALETTE_SIZE: usize = 12;

// Slots are stored as `u8`.
const _: () = assert!(PALETTE_SIZE <= u8::MAX as usize);

/// Color slot assignment for one rendering pass.
///
/// Each distinct kind string gets the next slot in insertion order, cycling
/// through `1..=PALETTE_SIZE`. Repeated kinds reuse their slot.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    slots: HashMap<String, u8>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `kind`, assigning the next one on first encounter.
    pub fn slot(&mut self, kind: &str) -> u8 {
        if let Some(&slot) = self.slots.get(kind) {
            return slot;
        }
        let index = self.slots.len() % PALETTE_SIZE;
        let slot = u8::try_from(index).unwrap_or_default() + 1;
        self.slots.insert(kind.to_string(), slot);
        slot
    }

    /// Number of distinct kinds seen so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
