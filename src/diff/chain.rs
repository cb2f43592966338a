//! Pairwise chain orchestration across the configured environment sequence.
//!
//! Drift is only checked per adjacent hop: dev→prd when no staging
//! environment exists, dev→stg then stg→prd when one does. There is
//! deliberately no direct dev-vs-prd comparison in a staged chain.

use super::comparators::{reconcile_entities, Comparable};
use super::schema::{EnvironmentPair, PairwiseDiff};

/// Snapshots of one entity kind across the environment sequence.
///
/// The staging slot being optional makes the two legal chain arities the
/// only representable ones.
#[derive(Debug, Clone)]
pub struct EnvironmentChain<T> {
    pub dev: Vec<T>,
    pub stg: Option<Vec<T>>,
    pub prd: Vec<T>,
}

/// Reconcile each adjacent environment pair, in chain order
pub fn build_chain<T: Comparable>(chain: &EnvironmentChain<T>) -> Vec<PairwiseDiff<T>> {
    match &chain.stg {
        None => vec![PairwiseDiff {
            pair: EnvironmentPair::DevPrd,
            result: reconcile_entities(&chain.dev, &chain.prd),
        }],
        Some(stg) => vec![
            PairwiseDiff {
                pair: EnvironmentPair::DevStg,
                result: reconcile_entities(&chain.dev, stg),
            },
            PairwiseDiff {
                pair: EnvironmentPair::StgPrd,
                result: reconcile_entities(stg, &chain.prd),
            },
        ],
    }
}

/// Any difference across the chain's pairs
pub fn has_drift<T>(entries: &[PairwiseDiff<T>]) -> bool {
    entries.iter().any(|entry| entry.result.has_drift())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::schema::EdgeFunction;

    fn edge_fn(slug: &str, version: i64) -> EdgeFunction {
        EdgeFunction {
            id: format!("id-{slug}"),
            name: slug.to_string(),
            slug: slug.to_string(),
            status: "ACTIVE".to_string(),
            version,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_two_environment_chain() {
        let chain = EnvironmentChain {
            dev: vec![edge_fn("foo", 1)],
            stg: None,
            prd: vec![edge_fn("foo", 2)],
        };
        let entries = build_chain(&chain);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pair, EnvironmentPair::DevPrd);
        assert_eq!(
            entries[0].result.differing[0].differences,
            vec!["version: 1 → 2"]
        );
        assert!(has_drift(&entries));
    }

    #[test]
    fn test_three_environment_chain_order_and_labels() {
        // dev == stg, stg != prd
        let chain = EnvironmentChain {
            dev: vec![edge_fn("foo", 1)],
            stg: Some(vec![edge_fn("foo", 1)]),
            prd: vec![edge_fn("foo", 2)],
        };
        let entries = build_chain(&chain);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].pair, EnvironmentPair::DevStg);
        assert!(!entries[0].result.has_drift());
        assert_eq!(entries[0].result.matching.len(), 1);

        assert_eq!(entries[1].pair, EnvironmentPair::StgPrd);
        assert!(entries[1].result.has_drift());

        assert!(has_drift(&entries));
    }

    #[test]
    fn test_chain_with_no_drift() {
        let chain = EnvironmentChain {
            dev: vec![edge_fn("foo", 1)],
            stg: Some(vec![edge_fn("foo", 1)]),
            prd: vec![edge_fn("foo", 1)],
        };
        let entries = build_chain(&chain);
        assert!(!has_drift(&entries));
    }

    #[test]
    fn test_pair_labels_render() {
        assert_eq!(EnvironmentPair::DevStg.to_string(), "dev-stg");
        assert_eq!(EnvironmentPair::StgPrd.to_string(), "stg-prd");
        assert_eq!(EnvironmentPair::DevPrd.to_string(), "dev-prd");
    }
}
