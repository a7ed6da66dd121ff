//! Filter-and-join: inventory rows + image lookup → ordered catalog entries.
//!
//! ```text
//! inventory ──▶ filter ──▶ left join on style code ──▶ sanitize URL ──▶ trailing policy
//! ```
//!
//! Every filtered row yields at least one entry, matched or not. How many
//! entries a row yields when the image table repeats its style key is decided
//! by [`DuplicateKeyPolicy`].

use crate::config::{DuplicateKeyPolicy, FilterSpec, JoinPolicy, TrailingImagePolicy};
use crate::model::{CatalogEntry, ImageLookupTable, InventoryTable};
use crate::pipeline::filter::filter_rows;
use std::collections::HashMap;
use tracing::debug;

/// Suffix that marks the end of a usable image link.
const JPG_MARKER: &str = ".jpg";

/// Cut everything after the first `.jpg`, dropping query strings and junk.
///
/// Strings without `.jpg` pass through unchanged.
pub fn sanitize_image_url(raw: &str) -> &str {
    match raw.find(JPG_MARKER) {
        Some(pos) => &raw[..pos + JPG_MARKER.len()],
        None => raw,
    }
}

/// Filter the inventory and join the survivors against the image table.
pub fn build_catalog(
    inventory: &InventoryTable,
    image_lookup: &ImageLookupTable,
    filters: &FilterSpec,
    policy: &JoinPolicy,
) -> Vec<CatalogEntry> {
    let filtered = filter_rows(&inventory.rows, filters);
    debug!(
        "{} of {} inventory rows passed the filters",
        filtered.len(),
        inventory.len()
    );

    let index = index_by_key(image_lookup, policy.duplicate_keys);

    let mut entries: Vec<CatalogEntry> = filtered
        .into_iter()
        .flat_map(|row| {
            let urls: Vec<Option<String>> = match index.get(row.style_code.as_str()) {
                Some(matches) => matches.iter().map(|u| resolve_url(u)).collect(),
                None => vec![None],
            };
            urls.into_iter()
                .map(move |url| CatalogEntry::new(row.clone(), url))
        })
        .collect();

    if policy.trailing_image == TrailingImagePolicy::DropLast {
        if let Some(last) = entries.last_mut() {
            if last.resolved_image_url.take().is_some() {
                debug!("Dropped image URL of the last catalog entry");
            }
        }
    }

    entries
}

/// Style key → raw URLs, reduced according to the duplicate-key policy.
fn index_by_key(
    lookup: &ImageLookupTable,
    policy: DuplicateKeyPolicy,
) -> HashMap<&str, Vec<&str>> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for r in &lookup.rows {
        let slot = index.entry(r.style_key.as_str()).or_default();
        match policy {
            DuplicateKeyPolicy::FirstMatch => {
                if slot.is_empty() {
                    slot.push(&r.image_url);
                }
            }
            DuplicateKeyPolicy::LastMatch => {
                slot.clear();
                slot.push(&r.image_url);
            }
            DuplicateKeyPolicy::FanOut => slot.push(&r.image_url),
        }
    }
    index
}

fn resolve_url(raw: &str) -> Option<String> {
    let url = sanitize_image_url(raw.trim());
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Location;
    use crate::model::{ImageLookupRow, InventoryRow};

    fn inv(rows: &[(&str, &str, &str, &str, &str)]) -> InventoryTable {
        InventoryTable::new(
            rows.iter()
                .map(|(name, size, site, status, style)| InventoryRow {
                    product_name: name.to_string(),
                    size: size.to_string(),
                    site: site.to_string(),
                    status: status.to_string(),
                    style_code: style.to_string(),
                })
                .collect(),
        )
    }

    fn images(rows: &[(&str, &str)]) -> ImageLookupTable {
        ImageLookupTable::new(
            rows.iter()
                .map(|(k, u)| ImageLookupRow {
                    style_key: k.to_string(),
                    image_url: u.to_string(),
                })
                .collect(),
        )
    }

    fn urls(entries: &[CatalogEntry]) -> Vec<Option<&str>> {
        entries
            .iter()
            .map(|e| e.resolved_image_url.as_deref())
            .collect()
    }

    #[test]
    fn sanitize_cuts_after_first_jpg() {
        assert_eq!(sanitize_image_url("http://x/y.jpg?size=400"), "http://x/y.jpg");
        assert_eq!(sanitize_image_url("http://x/y.png"), "http://x/y.png");
        assert_eq!(sanitize_image_url("http://x/a.jpg/b.jpg"), "http://x/a.jpg");
        assert_eq!(sanitize_image_url("http://x/y.jpeg"), "http://x/y.jpeg");
        assert_eq!(sanitize_image_url(""), "");
    }

    #[test]
    fn size_and_mumbai_pick_style_s1() {
        let inventory = inv(&[
            ("Air Max", "9", "BOM01", "Available", "S1"),
            ("Air Max", "9", "DEL02", "Available", "S2"),
        ]);
        let lookup = images(&[("S1", "http://h/a.jpg?q=1"), ("S2", "http://h/b.png")]);
        let filters = FilterSpec::new().size("9").location(Location::Mumbai);

        let out = build_catalog(&inventory, &lookup, &filters, &JoinPolicy::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].row.style_code, "S1");
        assert_eq!(out[0].resolved_image_url.as_deref(), Some("http://h/a.jpg"));
    }

    #[test]
    fn unmatched_rows_still_produce_entries() {
        let inventory = inv(&[
            ("A", "9", "BOM1", "Available", "S1"),
            ("B", "9", "BOM2", "Available", "NOPE"),
            ("C", "9", "BOM3", "Available", "S3"),
        ]);
        let lookup = images(&[("S1", "http://h/1.jpg"), ("S3", "")]);
        let out = build_catalog(
            &inventory,
            &lookup,
            &FilterSpec::default(),
            &JoinPolicy::default(),
        );
        assert_eq!(urls(&out), vec![Some("http://h/1.jpg"), None, None]);
    }

    #[test]
    fn keep_policy_retains_last_url() {
        let inventory = inv(&[
            ("A", "9", "BOM1", "Available", "S1"),
            ("B", "9", "BOM2", "Available", "S2"),
        ]);
        let lookup = images(&[("S1", "http://h/1.jpg"), ("S2", "http://h/2.jpg")]);
        let out = build_catalog(
            &inventory,
            &lookup,
            &FilterSpec::default(),
            &JoinPolicy::default(),
        );
        assert_eq!(urls(&out), vec![Some("http://h/1.jpg"), Some("http://h/2.jpg")]);
    }

    #[test]
    fn drop_last_policy_reproduces_missing_final_image() {
        let inventory = inv(&[
            ("A", "9", "BOM1", "Available", "S1"),
            ("B", "9", "BOM2", "Available", "S2"),
        ]);
        let lookup = images(&[("S1", "http://h/1.jpg"), ("S2", "http://h/2.jpg")]);
        let policy = JoinPolicy {
            trailing_image: TrailingImagePolicy::DropLast,
            ..JoinPolicy::default()
        };
        let out = build_catalog(&inventory, &lookup, &FilterSpec::default(), &policy);
        assert_eq!(out.len(), 2, "the last entry is still rendered");
        assert_eq!(urls(&out), vec![Some("http://h/1.jpg"), None]);
    }

    #[test]
    fn drop_last_on_empty_result_is_harmless() {
        let policy = JoinPolicy {
            trailing_image: TrailingImagePolicy::DropLast,
            ..JoinPolicy::default()
        };
        let out = build_catalog(
            &InventoryTable::default(),
            &ImageLookupTable::default(),
            &FilterSpec::default(),
            &policy,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn duplicate_keys_follow_policy() {
        let inventory = inv(&[("A", "9", "BOM1", "Available", "S1")]);
        let lookup = images(&[("S1", "http://h/first.jpg"), ("S1", "http://h/second.jpg")]);

        let first = build_catalog(
            &inventory,
            &lookup,
            &FilterSpec::default(),
            &JoinPolicy::default(),
        );
        assert_eq!(urls(&first), vec![Some("http://h/first.jpg")]);

        let last_policy = JoinPolicy {
            duplicate_keys: DuplicateKeyPolicy::LastMatch,
            ..JoinPolicy::default()
        };
        let last = build_catalog(&inventory, &lookup, &FilterSpec::default(), &last_policy);
        assert_eq!(urls(&last), vec![Some("http://h/second.jpg")]);

        let fan_policy = JoinPolicy {
            duplicate_keys: DuplicateKeyPolicy::FanOut,
            ..JoinPolicy::default()
        };
        let fan = build_catalog(&inventory, &lookup, &FilterSpec::default(), &fan_policy);
        assert_eq!(
            urls(&fan),
            vec![Some("http://h/first.jpg"), Some("http://h/second.jpg")]
        );
        assert!(fan.iter().all(|e| e.row.product_name == "A"));
    }

    #[test]
    fn shared_style_codes_join_independently() {
        let inventory = inv(&[
            ("A", "9", "BOM1", "Available", "S1"),
            ("A", "10", "BOM2", "Available", "S1"),
        ]);
        let lookup = images(&[("S1", "http://h/1.jpg?w=1")]);
        let out = build_catalog(
            &inventory,
            &lookup,
            &FilterSpec::default(),
            &JoinPolicy::default(),
        );
        assert_eq!(urls(&out), vec![Some("http://h/1.jpg"), Some("http://h/1.jpg")]);
    }

    #[test]
    fn output_follows_inventory_order() {
        let inventory = inv(&[
            ("Z", "9", "BOM1", "Available", "S3"),
            ("Y", "9", "BOM2", "Sold", "S2"),
            ("X", "9", "BOM3", "Available", "S1"),
            ("W", "8", "BOM4", "Available", "S2"),
        ]);
        let lookup = images(&[("S1", "u1"), ("S2", "u2"), ("S3", "u3")]);
        let out = build_catalog(
            &inventory,
            &lookup,
            &FilterSpec::default(),
            &JoinPolicy::default(),
        );
        let names: Vec<&str> = out.iter().map(|e| e.row.product_name.as_str()).collect();
        assert_eq!(names, vec!["Z", "X", "W"]);
    }
}
