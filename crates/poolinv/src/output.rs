use poolinv_core::Inventory;

/// Render a byte count with the largest binary unit that keeps it >= 1,
/// e.g. `953.7M`. Values below 1 KiB are printed as plain bytes.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["K", "M", "G", "T", "P", "E"];

    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, UNITS[unit])
}

/// Plain-text table in the spirit of `zpool list`
pub fn render_table(inventory: &Inventory) -> String {
    let name_width = inventory
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!(
        "{:<name_width$}  {:>8}  {:>8}  {:>8}  {:>4}  {:>6}  {:>7}  HEALTH\n",
        "NAME", "SIZE", "ALLOC", "FREE", "CAP", "DEDUP", "VERSION"
    );
    for pool in inventory {
        out.push_str(&format!(
            "{:<name_width$}  {:>8}  {:>8}  {:>8}  {:>3}%  {:>5.2}x  {:>7}  {}\n",
            pool.name,
            format_bytes(pool.size),
            format_bytes(pool.allocated),
            format_bytes(pool.free),
            pool.capacity_percent,
            pool.dedup_ratio,
            pool.version,
            pool.health.as_deref().unwrap_or("-"),
        ));
    }
    if !inventory.status.is_complete() {
        out.push_str(&format!("# listing incomplete: {}\n", inventory.status));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolinv_core::{InventoryStatus, PoolRecord};

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0B");
        assert_eq!(format_bytes(1023), "1023B");
        assert_eq!(format_bytes(1024), "1.0K");
        assert_eq!(format_bytes(1_000_000_000), "953.7M");
        assert_eq!(format_bytes(8 * 1024 * 1024 * 1024 * 1024), "8.0T");
    }

    #[test]
    fn test_render_table() {
        let mut tank = PoolRecord::new("tank");
        tank.size = 1_000_000_000;
        tank.capacity_percent = 40;
        tank.dedup_ratio = 1.0;
        tank.health = Some("ONLINE".to_string());
        let inventory =
            Inventory::new(vec![tank, PoolRecord::new("backup")], InventoryStatus::Complete);

        let table = render_table(&inventory);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].starts_with("tank"));
        assert!(lines[1].contains("953.7M"));
        assert!(lines[1].contains(" 40%"));
        assert!(lines[1].ends_with("ONLINE"));
        assert!(lines[2].ends_with("-"));
    }

    #[test]
    fn test_render_table_flags_incomplete_listing() {
        let inventory = Inventory::new(
            Vec::new(),
            InventoryStatus::Aborted {
                pool: "tank".to_string(),
            },
        );
        let table = render_table(&inventory);
        assert!(table.contains("# listing incomplete: aborted at pool 'tank'"));
    }
}
