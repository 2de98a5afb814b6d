use crate::subsystem::{truncate_property, PoolConnection};
use crate::walker::PoolSummary;
use poolinv_core::{PoolProperty, PoolRecord};
use tracing::debug;

/// Reads the fixed property set of a pool into a [`PoolRecord`]
///
/// Every query stands alone. A failed numeric query leaves that field at
/// zero and a failed health query leaves `health` unset; the record is
/// produced either way.
pub struct PropertyExtractor<'a> {
    connection: &'a dyn PoolConnection,
    health_max_len: usize,
}

impl<'a> PropertyExtractor<'a> {
    pub fn new(connection: &'a dyn PoolConnection, health_max_len: usize) -> Self {
        Self {
            connection,
            health_max_len,
        }
    }

    pub fn extract(&self, pool: &PoolSummary) -> PoolRecord {
        let mut record = PoolRecord::new(&pool.name);

        record.version = self.numeric(pool, PoolProperty::Version);
        record.size = self.numeric(pool, PoolProperty::Size);
        // Reported in hundredths
        record.dedup_ratio = self.numeric(pool, PoolProperty::DedupRatio) as f64 / 100.0;
        record.dedup_ditto_threshold = self.numeric(pool, PoolProperty::DedupDitto);
        record.allocated = self.numeric(pool, PoolProperty::Allocated);
        record.free = self.numeric(pool, PoolProperty::Free);
        record.capacity_percent = self.numeric(pool, PoolProperty::Capacity);
        record.health = self.health(pool);

        record
    }

    fn numeric(&self, pool: &PoolSummary, property: PoolProperty) -> u64 {
        match self.connection.int_property(pool.handle, property) {
            Ok(value) => value,
            Err(e) => {
                debug!("Pool '{}': {} defaults to 0 ({})", pool.name, property, e);
                0
            }
        }
    }

    fn health(&self, pool: &PoolSummary) -> Option<String> {
        match self.connection.string_property(
            pool.handle,
            PoolProperty::Health,
            self.health_max_len,
        ) {
            Ok(value) => Some(truncate_property(value, self.health_max_len)),
            Err(e) => {
                debug!("Pool '{}': health omitted ({})", pool.name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystem::{MockPool, MockSubsystem, PoolHandle, PoolSubsystem};

    fn summary(name: &str, index: usize) -> PoolSummary {
        PoolSummary {
            name: name.to_string(),
            handle: PoolHandle::new(index),
        }
    }

    #[test]
    fn test_extract_all_properties() {
        let subsystem = MockSubsystem::with_pools(vec![MockPool::healthy(
            "tank",
            1_000_000_000,
            400_000_000,
        )
        .with_dedup_ratio(1.37)
        .with_property(PoolProperty::DedupDitto, 100)]);
        let conn = subsystem.open().unwrap();

        let record = PropertyExtractor::new(conn.as_ref(), 1024).extract(&summary("tank", 0));
        assert_eq!(record.name, "tank");
        assert_eq!(record.version, 5000);
        assert_eq!(record.size, 1_000_000_000);
        assert_eq!(record.allocated, 400_000_000);
        assert_eq!(record.free, 600_000_000);
        assert_eq!(record.capacity_percent, 40);
        assert_eq!(record.dedup_ratio, 1.37);
        assert_eq!(record.dedup_ditto_threshold, 100);
        assert_eq!(record.health.as_deref(), Some("ONLINE"));
    }

    #[test]
    fn test_failed_numeric_queries_default_to_zero() {
        let subsystem = MockSubsystem::with_pools(vec![MockPool::healthy("tank", 1000, 250)
            .without_property(PoolProperty::Size)
            .without_property(PoolProperty::DedupRatio)]);
        let conn = subsystem.open().unwrap();

        let record = PropertyExtractor::new(conn.as_ref(), 1024).extract(&summary("tank", 0));
        assert_eq!(record.size, 0);
        assert_eq!(record.dedup_ratio, 0.0);
        assert_eq!(record.allocated, 250);
        assert_eq!(record.capacity_percent, 25);
        assert_eq!(record.health.as_deref(), Some("ONLINE"));
    }

    #[test]
    fn test_failed_health_query_omits_health() {
        let subsystem = MockSubsystem::with_pools(vec![
            MockPool::healthy("backup", 1000, 10).without_property(PoolProperty::Health)
        ]);
        let conn = subsystem.open().unwrap();

        let record = PropertyExtractor::new(conn.as_ref(), 1024).extract(&summary("backup", 0));
        assert!(record.health.is_none());
        assert_eq!(record.size, 1000);
    }

    #[test]
    fn test_every_query_failing_still_yields_record() {
        let subsystem = MockSubsystem::with_pools(vec![MockPool::new("bare")]);
        let conn = subsystem.open().unwrap();

        let record = PropertyExtractor::new(conn.as_ref(), 1024).extract(&summary("bare", 0));
        assert_eq!(record, PoolRecord::new("bare"));
    }

    #[test]
    fn test_health_is_bounded() {
        let subsystem = MockSubsystem::with_pools(vec![
            MockPool::new("tank").with_health("DEGRADED")
        ]);
        let conn = subsystem.open().unwrap();

        let record = PropertyExtractor::new(conn.as_ref(), 4).extract(&summary("tank", 0));
        assert_eq!(record.health.as_deref(), Some("DEGR"));
    }
}
