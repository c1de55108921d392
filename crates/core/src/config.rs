use serde::Deserialize;

/// Ad tag configuration, shared by every page registry created from it.
#[derive(Debug, Clone, Deserialize)]
pub struct AdTagsConfig {
    /// Prefix for generated container element ids.
    #[serde(default = "default_container_id_prefix")]
    pub container_id_prefix: String,
    /// Scope of the container-id counter.
    #[serde(default)]
    pub id_scope: IdScope,
    /// When set, the rendered script declares `window.<ns>={};<ns>.slots={};`
    /// and assigns every defined slot into `<ns>.slots['<unitName>']` so page
    /// scripts can refresh or inspect individual slots.
    #[serde(default)]
    pub slot_namespace: Option<String>,
}

impl Default for AdTagsConfig {
    fn default() -> Self {
        Self {
            container_id_prefix: default_container_id_prefix(),
            id_scope: IdScope::default(),
            slot_namespace: None,
        }
    }
}

/// Where the container-id counter lives.
///
/// `Process` numbers containers across every page rendered by the process, so
/// ids stay unique even if fragments from several renders end up on one
/// response. `PerPage` restarts numbering for each page registry, giving
/// stable ids at the cost of that cross-render guarantee.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdScope {
    #[default]
    Process,
    #[serde(rename = "per_page")]
    PerPage,
}

fn default_container_id_prefix() -> String {
    "div-gpt-ad-".to_string()
}
