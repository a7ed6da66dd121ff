//! Row predicates applied before the join.
//!
//! All filters are stable: surviving rows keep their worksheet order.

use crate::config::FilterSpec;
use crate::model::InventoryRow;

/// Only rows whose status is exactly this are ever catalogued.
pub const AVAILABLE_STATUS: &str = "Available";

/// True when `row` passes every user predicate and the availability check.
pub fn matches(row: &InventoryRow, filters: &FilterSpec) -> bool {
    if let Some(needle) = non_empty(filters.product_name_contains.as_deref()) {
        if !row
            .product_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
        {
            return false;
        }
    }

    if let Some(size) = non_empty(filters.size.as_deref()) {
        if row.size != size {
            return false;
        }
    }

    if let Some(location) = filters.location {
        if !row.site.starts_with(location.site_prefix()) {
            return false;
        }
    }

    row.status == AVAILABLE_STATUS
}

/// Keep the rows that pass [`matches`], in input order.
pub fn filter_rows<'a>(rows: &'a [InventoryRow], filters: &FilterSpec) -> Vec<&'a InventoryRow> {
    rows.iter().filter(|r| matches(r, filters)).collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Location;

    fn row(name: &str, size: &str, site: &str, status: &str) -> InventoryRow {
        InventoryRow {
            product_name: name.into(),
            size: size.into(),
            site: site.into(),
            status: status.into(),
            style_code: format!("{name}-{size}"),
        }
    }

    #[test]
    fn unavailable_rows_never_pass() {
        let f = FilterSpec::default();
        assert!(matches(&row("Dunk", "9", "BOM1", "Available"), &f));
        assert!(!matches(&row("Dunk", "9", "BOM1", "Sold"), &f));
        assert!(!matches(&row("Dunk", "9", "BOM1", "available"), &f));
        assert!(!matches(&row("Dunk", "9", "BOM1", "Available "), &f));
    }

    #[test]
    fn name_match_ignores_case() {
        let f = FilterSpec::new().product_name_contains("jordan");
        assert!(matches(&row("Air Jordan 1", "9", "BOM1", "Available"), &f));
        assert!(matches(&row("AIR JORDAN 4", "9", "BOM1", "Available"), &f));
        assert!(!matches(&row("Air Max", "9", "BOM1", "Available"), &f));
    }

    #[test]
    fn empty_fields_do_not_filter() {
        let f = FilterSpec::new().product_name_contains("").size("");
        assert!(matches(&row("Anything", "12", "XYZ", "Available"), &f));
    }

    #[test]
    fn size_is_exact() {
        let f = FilterSpec::new().size("9");
        assert!(matches(&row("A", "9", "BOM1", "Available"), &f));
        assert!(!matches(&row("A", "9.5", "BOM1", "Available"), &f));
        assert!(!matches(&row("A", "19", "BOM1", "Available"), &f));
    }

    #[test]
    fn location_uses_site_prefix() {
        let mumbai = FilterSpec::new().location(Location::Mumbai);
        let delhi = FilterSpec::new().location(Location::Delhi);
        let bom = row("A", "9", "BOM02", "Available");
        let del = row("A", "9", "DEL07", "Available");
        let other = row("A", "9", "BLR01", "Available");
        assert!(matches(&bom, &mumbai) && !matches(&bom, &delhi));
        assert!(matches(&del, &delhi) && !matches(&del, &mumbai));
        assert!(!matches(&other, &mumbai) && !matches(&other, &delhi));
        assert!(matches(&other, &FilterSpec::default()));
    }

    #[test]
    fn filter_rows_preserves_order() {
        let rows = vec![
            row("Dunk Low", "9", "BOM1", "Available"),
            row("Air Max", "9", "BOM2", "Available"),
            row("Dunk High", "9", "DEL1", "Available"),
            row("Dunk Mid", "9", "BOM3", "Sold"),
            row("dunk sb", "9", "BOM4", "Available"),
        ];
        let f = FilterSpec::new().product_name_contains("DUNK");
        let kept: Vec<&str> = filter_rows(&rows, &f)
            .iter()
            .map(|r| r.site.as_str())
            .collect();
        assert_eq!(kept, vec!["BOM1", "DEL1", "BOM4"]);
    }
}
