use serde::{Deserialize, Serialize};

/// A registered ad slot, accumulated by the page registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdUnit {
    /// Name of the ad unit as configured in the ad server.
    pub unit_name: String,
    /// Creative size expression passed through to `googletag.defineSlot()`,
    /// e.g. `[970,250]` or `[[970,250],[728,90]]`.
    pub size: String,
    /// Whether a display call is issued for this unit when the page renders.
    pub display: bool,
    /// Id of the DOM container the ad is rendered into.
    pub container_id: String,
    /// Name of an attached responsive size mapping, if any.
    pub size_mapping: Option<String>,
}

/// A named responsive size-mapping ruleset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeMapping {
    pub name: String,
    /// String-encoded rules of the form `[[browserW,browserH],[[slotW,slotH],...]]`,
    /// ordered from highest to lowest priority.
    pub variations: Vec<String>,
}
