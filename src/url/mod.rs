//! URL handling module for Site-Harvest
//!
//! This module provides the two URL normalization strengths used by the crawl
//! engine and the domain scope filter that keeps a crawl on its target site.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{
    canonical_key, is_tracking_param, lightweight, normalize_link, normalize_url, parse_seed,
};
pub use scope::{extract_domain, in_scope, is_candidate_href, DomainScope};
