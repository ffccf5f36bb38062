use crate::endpoint::{Endpoint, EndpointKey};
use crate::error::Result;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Result of merging two endpoint sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Primary's endpoints followed by the new endpoints from secondary.
    pub endpoints: Vec<Endpoint>,
    /// Number of secondary endpoints appended.
    pub added: usize,
    /// Number of secondary endpoints dropped as duplicates.
    pub skipped: usize,
}

/// Appends to `primary` every endpoint of `secondary` whose identity has not
/// been seen yet. Primary entries are kept as-is, in order. When two records
/// share an identity the first one encountered wins, description included.
pub fn merge_endpoints(primary: Vec<Endpoint>, secondary: Vec<Endpoint>) -> Result<MergeOutcome> {
    let mut seen = HashSet::with_capacity(primary.len() + secondary.len());
    for endpoint in &primary {
        seen.insert(EndpointKey::of(endpoint)?);
    }

    let mut endpoints = primary;
    let mut added = 0;
    let mut skipped = 0;

    for endpoint in secondary {
        let key = EndpointKey::of(&endpoint)?;
        if seen.contains(&key) {
            trace!("Skipping duplicate endpoint {}", key);
            skipped += 1;
            continue;
        }
        trace!("Adding endpoint {}", key);
        endpoints.push(endpoint);
        seen.insert(key);
        added += 1;
    }

    debug!(
        "Merged endpoints: {} added, {} skipped, {} total",
        added,
        skipped,
        endpoints.len()
    );

    Ok(MergeOutcome {
        endpoints,
        added,
        skipped,
    })
}
