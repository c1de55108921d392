//! Per-page GPT ad-slot registry and script renderer.
//!
//! Page-rendering code creates one [`PageAds`] per request, registers slots
//! while the body is produced (each registration returning the placeholder
//! fragment to embed), then emits a single footer `<script>` block that
//! bootstraps the GPT library, declares size mappings, defines slots, applies
//! targeting, and issues display calls.
//!
//! # Modules
//!
//! - [`registry`] — The [`PageAds`] context object and registration calls
//! - [`render`] — Footer-tag rendering over the accumulated state
//!
//! All values are emitted verbatim into HTML and JavaScript; callers must
//! supply trusted, pre-sanitized strings.
//!
//! ```
//! use adtags_page::PageAds;
//!
//! let mut page = PageAds::new();
//! page.add_size_mapping("hero", vec!["[[1024,768],[[970,250]]]".into()])?;
//! let placeholder = page.placeholder("homepage_top", "[970,250]")?;
//! let script = page.footer_tag("12345");
//! # assert!(placeholder.contains("homepage_top"));
//! # assert!(script.contains("/12345/homepage_top"));
//! # Ok::<(), adtags_core::AdTagError>(())
//! ```

pub mod registry;
pub mod render;

pub use registry::{PageAds, PlaceholderOptions};

pub use adtags_core::{AdTagError, AdTagResult, AdTagsConfig, AdUnit, IdScope, SizeMapping};
