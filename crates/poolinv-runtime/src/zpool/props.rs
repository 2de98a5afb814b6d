use poolinv_core::PoolProperty;

/// Version reported for pools using feature flags
pub const FEATURE_FLAGS_VERSION: u64 = 5000;

/// Parse one value printed by `zpool get -Hp -o value <property> <pool>`
///
/// `zpool` prints `-` as the version of a feature-flag pool, which maps to
/// [`FEATURE_FLAGS_VERSION`]. For every other property `-` (not supported by
/// this pool or release) and anything that is not a number give `None`. The
/// dedup ratio is returned in hundredths, e.g. `1.37x` becomes `137`.
pub fn parse_int_property(property: PoolProperty, raw: &str) -> Option<u64> {
    let value = raw.trim();
    if value == "-" && property == PoolProperty::Version {
        return Some(FEATURE_FLAGS_VERSION);
    }
    if value.is_empty() || value == "-" {
        return None;
    }

    match property {
        PoolProperty::DedupRatio => {
            let ratio: f64 = value.trim_end_matches('x').parse().ok()?;
            if !ratio.is_finite() || ratio < 0.0 {
                return None;
            }
            Some((ratio * 100.0).round() as u64)
        }
        PoolProperty::Capacity => value.trim_end_matches('%').parse().ok(),
        PoolProperty::Health => None,
        _ => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(
            parse_int_property(PoolProperty::Size, "996432412672\n"),
            Some(996_432_412_672)
        );
        assert_eq!(parse_int_property(PoolProperty::Version, "5000"), Some(5000));
        assert_eq!(parse_int_property(PoolProperty::DedupDitto, "0"), Some(0));
    }

    #[test]
    fn test_feature_flag_pool_version() {
        assert_eq!(parse_int_property(PoolProperty::Version, "-"), Some(5000));
        assert_eq!(parse_int_property(PoolProperty::Version, "-\n"), Some(5000));
        assert_eq!(parse_int_property(PoolProperty::Version, "28"), Some(28));
    }

    #[test]
    fn test_parse_dedup_ratio() {
        assert_eq!(parse_int_property(PoolProperty::DedupRatio, "1.00x"), Some(100));
        assert_eq!(parse_int_property(PoolProperty::DedupRatio, "1.37"), Some(137));
        assert_eq!(parse_int_property(PoolProperty::DedupRatio, "abc"), None);
    }

    #[test]
    fn test_parse_capacity_with_percent() {
        assert_eq!(parse_int_property(PoolProperty::Capacity, "40%"), Some(40));
        assert_eq!(parse_int_property(PoolProperty::Capacity, "7"), Some(7));
    }

    #[test]
    fn test_unsupported_values() {
        assert_eq!(parse_int_property(PoolProperty::DedupDitto, "-"), None);
        assert_eq!(parse_int_property(PoolProperty::Version, ""), None);
        assert_eq!(parse_int_property(PoolProperty::Free, ""), None);
        assert_eq!(parse_int_property(PoolProperty::Size, "1.5T"), None);
        assert_eq!(parse_int_property(PoolProperty::Health, "ONLINE"), None);
    }
}
