//! Footer-tag rendering: turns the accumulated page state into the single
//! `<script>` block that drives the GPT command queue.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::registry::PageAds;

/// Protocol-relative URL of the GPT bootstrap script. The scheme is chosen
/// client-side from `document.location.protocol`.
const GPT_LIBRARY_PATH: &str = "//www.googletagservices.com/tag/js/gpt.js";

/// Suffix appended to a size-mapping name to form its JS variable name.
const MAPPING_VAR_SUFFIX: &str = "GoogleAdMapping";

impl PageAds {
    /// Render the aggregate script block for every slot and size mapping
    /// registered on this page. Place the result at the end of the document
    /// body (or in the head; GPT queues commands either way).
    ///
    /// A blank `network_code` means "no ads configured": the emitted script
    /// only hides the registered containers and loads nothing.
    ///
    /// # Escaping
    ///
    /// Network code, unit names, sizes and container ids are emitted verbatim
    /// into JavaScript. They must come from trusted configuration, never from
    /// user input.
    pub fn footer_tag(&self, network_code: &str) -> String {
        self.render_footer(network_code, None)
    }

    /// Like [`footer_tag`](Self::footer_tag), additionally applying each
    /// key/value pair as page-level targeting. Pairs are emitted in the map's
    /// iteration order.
    pub fn footer_tag_with_targeting(
        &self,
        network_code: &str,
        targeting: &BTreeMap<String, String>,
    ) -> String {
        self.render_footer(network_code, Some(targeting))
    }

    fn render_footer(
        &self,
        network_code: &str,
        targeting: Option<&BTreeMap<String, String>>,
    ) -> String {
        let mut out = String::new();

        if network_code.trim().is_empty() {
            out.push_str("<script>\n");
            for unit in self.units() {
                let _ = writeln!(
                    out,
                    "document.getElementById('{}').style.display='none';",
                    unit.container_id
                );
            }
            out.push_str("</script>\n");

            debug!(units = self.units().len(), "rendered hide-only footer tag");
            return out;
        }

        out.push_str("<script>\n");
        self.write_namespace(&mut out);
        self.write_bootstrap(&mut out);

        out.push_str("googletag.cmd.push(function(){\n");
        self.write_size_mappings(&mut out);
        self.write_slots(&mut out, network_code);
        if let Some(targeting) = targeting {
            for (key, value) in targeting {
                let _ = writeln!(out, "googletag.pubads().setTargeting('{key}','{value}');");
            }
        }
        out.push_str(
            "googletag.pubads().enableSingleRequest();\n\
             googletag.pubads().collapseEmptyDivs();\n\
             googletag.enableServices();\n\
             });\n",
        );

        self.write_display_calls(&mut out);
        out.push_str("</script>\n");

        debug!(
            units = self.units().len(),
            mappings = self.size_mappings().len(),
            network_code,
            "rendered footer tag"
        );
        out
    }

    /// Optional `window.<ns>` slot-handle map, so page scripts can refresh or
    /// inspect individual slots.
    fn write_namespace(&self, out: &mut String) {
        if let Some(ns) = self.config().slot_namespace.as_deref() {
            let _ = writeln!(out, "window.{ns}={{}};");
            let _ = writeln!(out, "{ns}.slots={{}};");
        }
    }

    fn write_bootstrap(&self, out: &mut String) {
        out.push_str("var googletag = googletag || {};\n");
        out.push_str("googletag.cmd = googletag.cmd || [];\n");
        out.push_str("(function() {\n");
        out.push_str("var gads = document.createElement('script');\n");
        out.push_str("gads.async = true;\n");
        out.push_str("gads.type = 'text/javascript';\n");
        out.push_str("var useSSL = 'https:' == document.location.protocol;\n");
        let _ = writeln!(out, "gads.src = (useSSL ? 'https:' : 'http:') +\n'{GPT_LIBRARY_PATH}';");
        out.push_str("var node = document.getElementsByTagName('script')[0];\n");
        out.push_str("node.parentNode.insertBefore(gads, node);\n");
        out.push_str("})();\n");
    }

    fn write_size_mappings(&self, out: &mut String) {
        for mapping in self.size_mappings() {
            let _ = writeln!(
                out,
                "var {}{} = googletag.sizeMapping().",
                mapping.name, MAPPING_VAR_SUFFIX
            );
            for variation in &mapping.variations {
                let _ = writeln!(out, "addSize({variation}).");
            }
            out.push_str("build();\n");
        }
    }

    fn write_slots(&self, out: &mut String, network_code: &str) {
        let namespace = self.config().slot_namespace.as_deref();
        for unit in self.units() {
            if let Some(ns) = namespace {
                let _ = write!(out, "{}.slots['{}']=", ns, unit.unit_name);
            }
            let _ = write!(
                out,
                "googletag.defineSlot('/{}/{}', {}, '{}')",
                network_code, unit.unit_name, unit.size, unit.container_id
            );
            if let Some(ref mapping) = unit.size_mapping {
                let _ = write!(out, ".defineSizeMapping({mapping}{MAPPING_VAR_SUFFIX})");
            }
            out.push_str(".addService(googletag.pubads());\n");
        }
    }

    fn write_display_calls(&self, out: &mut String) {
        for unit in self.units().iter().filter(|u| u.display) {
            let _ = writeln!(
                out,
                "googletag.cmd.push(function() {{ googletag.display('{}'); }});",
                unit.container_id
            );
        }
    }
}
