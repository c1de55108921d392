//! Per-page accumulation of ad-slot declarations.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use adtags_core::{AdTagError, AdTagResult, AdTagsConfig, AdUnit, IdScope, SizeMapping};

/// Counter backing [`IdScope::Process`]. Only uniqueness matters, so relaxed
/// ordering is enough.
static PROCESS_AD_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Options for [`PageAds::placeholder_with`]. Start from `Default` and
/// override the fields you need.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderOptions {
    /// CSS class added to the container element.
    pub css_class: String,
    /// Container element tag; must be a block-level element.
    pub tag_name: String,
    /// Name of a size mapping registered earlier via
    /// [`PageAds::add_size_mapping`].
    pub size_mapping: Option<String>,
    /// Whether to issue a display call for this unit once the tag library
    /// initializes.
    pub display: bool,
}

impl Default for PlaceholderOptions {
    fn default() -> Self {
        Self {
            css_class: String::new(),
            tag_name: "div".to_string(),
            size_mapping: None,
            display: true,
        }
    }
}

/// Registry of ad units and size mappings declared while rendering one page.
///
/// Create one per page render, register slots as the page body is produced,
/// then emit the aggregate script with [`PageAds::footer_tag`]. The registry
/// is a plain value owned by the caller; there is no implicit per-request
/// store behind it.
#[derive(Debug)]
pub struct PageAds {
    config: AdTagsConfig,
    units: Vec<AdUnit>,
    mappings: Vec<SizeMapping>,
    next_local_id: u64,
}

impl PageAds {
    pub fn new() -> Self {
        Self::with_config(AdTagsConfig::default())
    }

    pub fn with_config(config: AdTagsConfig) -> Self {
        Self {
            config,
            units: Vec::new(),
            mappings: Vec::new(),
            next_local_id: 0,
        }
    }

    pub fn config(&self) -> &AdTagsConfig {
        &self.config
    }

    /// Registered ad units, in registration order.
    pub fn units(&self) -> &[AdUnit] {
        &self.units
    }

    /// Registered size mappings, in definition order.
    pub fn size_mappings(&self) -> &[SizeMapping] {
        &self.mappings
    }

    /// Register an ad unit and return the HTML placeholder the ad library
    /// replaces with the creative, using default options (a classless `div`,
    /// no size mapping, displayed immediately).
    ///
    /// # Escaping
    ///
    /// `unit_name` and `size` are emitted verbatim into HTML and JavaScript.
    /// They must come from trusted configuration, never from user input.
    pub fn placeholder(&mut self, unit_name: &str, size: &str) -> AdTagResult<String> {
        self.placeholder_with(unit_name, size, PlaceholderOptions::default())
    }

    /// Register an ad unit and return its HTML placeholder.
    ///
    /// The fragment has the shape
    /// `<div id="div-gpt-ad-0" class="..." data-cb-ad-id="unit"><!-- unit --></div>`
    /// with a freshly allocated container id. A referenced size mapping must
    /// already have been registered; forward references fail with
    /// [`AdTagError::UndefinedMapping`].
    ///
    /// # Escaping
    ///
    /// All inputs are emitted verbatim into HTML and JavaScript. They must
    /// come from trusted configuration, never from user input.
    pub fn placeholder_with(
        &mut self,
        unit_name: &str,
        size: &str,
        options: PlaceholderOptions,
    ) -> AdTagResult<String> {
        if is_blank(unit_name) {
            return Err(AdTagError::MissingArgument("unit_name"));
        }
        if is_blank(&options.tag_name) {
            return Err(AdTagError::MissingArgument("tag_name"));
        }
        if let Some(ref mapping) = options.size_mapping {
            if !self.has_mapping(mapping) {
                return Err(AdTagError::UndefinedMapping(mapping.clone()));
            }
        }

        let container_id = self.next_container_id();
        let markup = format!(
            "<{tag} id=\"{id}\" class=\"{class}\" data-cb-ad-id=\"{unit}\"><!-- {unit} --></{tag}>",
            tag = options.tag_name,
            id = container_id,
            class = options.css_class,
            unit = unit_name,
        );

        debug!(unit_name, %container_id, "registered ad placeholder");

        self.units.push(AdUnit {
            unit_name: unit_name.to_string(),
            size: size.to_string(),
            display: options.display,
            container_id,
            size_mapping: options.size_mapping,
        });

        Ok(markup)
    }

    /// Register an ad unit for a container that already exists on the page.
    ///
    /// No markup is emitted and no display call is issued for the unit; the
    /// caller owns the container element and decides when to display into it.
    pub fn define_ad_unit(
        &mut self,
        unit_name: &str,
        size: &str,
        container_id: &str,
    ) -> AdTagResult<()> {
        if is_blank(unit_name) {
            return Err(AdTagError::MissingArgument("unit_name"));
        }
        if is_blank(container_id) {
            return Err(AdTagError::MissingArgument("container_id"));
        }

        debug!(unit_name, container_id, "defined external ad unit");

        self.units.push(AdUnit {
            unit_name: unit_name.to_string(),
            size: size.to_string(),
            display: false,
            container_id: container_id.to_string(),
            size_mapping: None,
        });

        Ok(())
    }

    /// Register a named responsive size mapping.
    ///
    /// Each variation is a string-encoded rule of the form
    /// `[[browserW,browserH],[[slotW,slotH],...]]`, ordered from highest to
    /// lowest priority. Names are unique within a page; reusing one fails with
    /// [`AdTagError::DuplicateMapping`].
    pub fn add_size_mapping(&mut self, name: &str, variations: Vec<String>) -> AdTagResult<()> {
        if is_blank(name) {
            return Err(AdTagError::MissingArgument("name"));
        }
        if self.has_mapping(name) {
            return Err(AdTagError::DuplicateMapping(name.to_string()));
        }

        debug!(name, count = variations.len(), "added size mapping");

        self.mappings.push(SizeMapping {
            name: name.to_string(),
            variations,
        });

        Ok(())
    }

    fn has_mapping(&self, name: &str) -> bool {
        self.mappings.iter().any(|m| m.name == name)
    }

    fn next_container_id(&mut self) -> String {
        let n = match self.config.id_scope {
            IdScope::Process => PROCESS_AD_COUNTER.fetch_add(1, Ordering::Relaxed),
            IdScope::PerPage => {
                let n = self.next_local_id;
                self.next_local_id += 1;
                n
            }
        };
        format!("{}{}", self.config.container_id_prefix, n)
    }
}

impl Default for PageAds {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_page() -> PageAds {
        PageAds::with_config(AdTagsConfig {
            id_scope: IdScope::PerPage,
            ..AdTagsConfig::default()
        })
    }

    // 1. Placeholder markup --------------------------------------------------

    #[test]
    fn test_placeholder_markup_shape() {
        let mut page = per_page();
        let markup = page.placeholder("leaderboard", "[728,90]").unwrap();

        assert_eq!(
            markup,
            "<div id=\"div-gpt-ad-0\" class=\"\" data-cb-ad-id=\"leaderboard\">\
             <!-- leaderboard --></div>"
        );
        // Container id appears exactly once as an id attribute.
        assert_eq!(markup.matches("id=\"div-gpt-ad-0\"").count(), 1);
    }

    #[test]
    fn test_placeholder_custom_tag_and_class() {
        let mut page = per_page();
        let markup = page
            .placeholder_with(
                "mpu",
                "[300,250]",
                PlaceholderOptions {
                    css_class: "ad ad--mpu".to_string(),
                    tag_name: "aside".to_string(),
                    ..PlaceholderOptions::default()
                },
            )
            .unwrap();

        assert!(markup.starts_with("<aside id=\"div-gpt-ad-0\" class=\"ad ad--mpu\""));
        assert!(markup.ends_with("</aside>"));
    }

    #[test]
    fn test_container_ids_increment_per_page() {
        let mut page = per_page();
        let first = page.placeholder("a", "[1,1]").unwrap();
        let second = page.placeholder("b", "[1,1]").unwrap();

        assert!(first.contains("div-gpt-ad-0"));
        assert!(second.contains("div-gpt-ad-1"));
    }

    #[test]
    fn test_process_scope_ids_unique_across_pages() {
        let mut one = PageAds::new();
        let mut two = PageAds::new();
        let a = one.placeholder("a", "[1,1]").unwrap();
        let b = two.placeholder("b", "[1,1]").unwrap();

        let id_of = |markup: &str| {
            let start = markup.find("id=\"").unwrap() + 4;
            markup[start..start + markup[start..].find('"').unwrap()].to_string()
        };
        assert_ne!(id_of(&a), id_of(&b));
    }

    #[test]
    fn test_custom_id_prefix() {
        let mut page = PageAds::with_config(AdTagsConfig {
            container_id_prefix: "slot-".to_string(),
            id_scope: IdScope::PerPage,
            ..AdTagsConfig::default()
        });
        let markup = page.placeholder("a", "[1,1]").unwrap();
        assert!(markup.contains("id=\"slot-0\""));
    }

    // 2. Validation ----------------------------------------------------------

    #[test]
    fn test_blank_unit_name_rejected() {
        let mut page = per_page();
        assert_eq!(
            page.placeholder("  ", "[1,1]").unwrap_err(),
            AdTagError::MissingArgument("unit_name")
        );
        assert!(page.units().is_empty());
    }

    #[test]
    fn test_blank_tag_name_rejected() {
        let mut page = per_page();
        let err = page
            .placeholder_with(
                "a",
                "[1,1]",
                PlaceholderOptions {
                    tag_name: String::new(),
                    ..PlaceholderOptions::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, AdTagError::MissingArgument("tag_name"));
    }

    #[test]
    fn test_undefined_size_mapping_rejected() {
        let mut page = per_page();
        let err = page
            .placeholder_with(
                "a",
                "[1,1]",
                PlaceholderOptions {
                    size_mapping: Some("responsive".to_string()),
                    ..PlaceholderOptions::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, AdTagError::UndefinedMapping("responsive".to_string()));
        // Failed registration leaves no trace and burns no id.
        assert!(page.units().is_empty());
        assert!(page.placeholder("b", "[1,1]").unwrap().contains("div-gpt-ad-0"));
    }

    #[test]
    fn test_mapping_must_exist_before_placeholder() {
        let mut page = per_page();
        page.add_size_mapping("m", vec!["[[0,0],[]]".to_string()])
            .unwrap();
        let markup = page
            .placeholder_with(
                "a",
                "[1,1]",
                PlaceholderOptions {
                    size_mapping: Some("m".to_string()),
                    ..PlaceholderOptions::default()
                },
            )
            .unwrap();
        assert!(markup.contains("data-cb-ad-id=\"a\""));
        assert_eq!(page.units()[0].size_mapping.as_deref(), Some("m"));
    }

    // 3. External units ------------------------------------------------------

    #[test]
    fn test_define_ad_unit_no_markup_no_display() {
        let mut page = per_page();
        page.define_ad_unit("sponsored", "[300,600]", "sidebar-slot")
            .unwrap();

        let unit = &page.units()[0];
        assert_eq!(unit.container_id, "sidebar-slot");
        assert!(!unit.display);
    }

    #[test]
    fn test_define_ad_unit_requires_container_id() {
        let mut page = per_page();
        assert_eq!(
            page.define_ad_unit("a", "[1,1]", " ").unwrap_err(),
            AdTagError::MissingArgument("container_id")
        );
    }

    // 4. Size mappings -------------------------------------------------------

    #[test]
    fn test_duplicate_size_mapping_rejected() {
        let mut page = per_page();
        page.add_size_mapping("m", vec![]).unwrap();
        assert_eq!(
            page.add_size_mapping("m", vec![]).unwrap_err(),
            AdTagError::DuplicateMapping("m".to_string())
        );
        assert_eq!(page.size_mappings().len(), 1);
    }

    #[test]
    fn test_size_mappings_keep_definition_order() {
        let mut page = per_page();
        page.add_size_mapping("desktop", vec![]).unwrap();
        page.add_size_mapping("mobile", vec![]).unwrap();

        let names: Vec<&str> = page.size_mappings().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["desktop", "mobile"]);
    }

    #[test]
    fn test_variation_rules_are_valid_json_arrays() {
        // The rule strings callers pass are GPT array literals; sanity-check
        // that the documented shape parses as JSON.
        let rule = "[[1024,768],[[970,250]]]";
        let parsed: serde_json::Value = serde_json::from_str(rule).unwrap();
        assert!(parsed.is_array());
    }
}
