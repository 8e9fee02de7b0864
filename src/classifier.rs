// classifier.rs - Outcome ranking and status-code filtering

use crate::error::InputError;
use crate::probe::ProbeOutcome;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Key used when a probe produced no status at all
const NO_STATUS_RANK: u32 = 999;

/// Key shared by statuses outside 200-599 (1xx, 6xx and up)
const OTHER_STATUS_RANK: u32 = NO_STATUS_RANK - 1;

/// Synthetic sort key: 2xx keep their code, 3xx +100, 4xx +200, 5xx +300.
/// Any other status sorts after 5xx, and a missing status sorts last.
pub fn rank_key(status_code: Option<u16>) -> u32 {
    match status_code {
        None => NO_STATUS_RANK,
        Some(status) => {
            let status = u32::from(status);
            match status {
                200..=299 => status,
                300..=399 => status + 100,
                400..=499 => status + 200,
                500..=599 => status + 300,
                _ => OTHER_STATUS_RANK,
            }
        }
    }
}

/// Stable sort by `rank_key`: successes, redirects, client errors, then the rest
pub fn rank(mut outcomes: Vec<ProbeOutcome>) -> Vec<ProbeOutcome> {
    outcomes.sort_by_key(|outcome| rank_key(outcome.status_code));
    outcomes
}

/// Explicit allow-list of status codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    codes: BTreeSet<u16>,
}

impl StatusFilter {
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn allows(&self, status_code: Option<u16>) -> bool {
        status_code.is_some_and(|status| self.codes.contains(&status))
    }

    pub fn codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.codes.iter().copied()
    }

    /// Keep only outcomes whose status is in the allow-list, preserving order.
    /// Outcomes without a status never pass.
    pub fn apply(&self, outcomes: Vec<ProbeOutcome>) -> Vec<ProbeOutcome> {
        outcomes
            .into_iter()
            .filter(|outcome| self.allows(outcome.status_code))
            .collect()
    }
}

impl FromStr for StatusFilter {
    type Err = InputError;

    /// Parses a comma-separated list such as `200,403, 404`
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let codes = raw
            .split(',')
            .map(|part| part.trim().parse::<u16>())
            .collect::<Result<BTreeSet<u16>, _>>()
            .map_err(|_| InputError::InvalidStatusFilter(raw.to_string()))?;

        Ok(Self { codes })
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self.codes().map(|code| code.to_string()).collect();
        f.write_str(&codes.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_space::{ProbeTarget, Provider};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn outcome(index: usize, status: Option<u16>) -> ProbeOutcome {
        let target = ProbeTarget::new(Provider::Gcs, format!("https://storage.googleapis.com/b{index}"));
        match status {
            Some(code) => ProbeOutcome::completed(&target, code, BTreeMap::new(), 0, Duration::ZERO),
            None => ProbeOutcome::failed(&target, "timeout"),
        }
    }

    fn statuses(outcomes: &[ProbeOutcome]) -> Vec<Option<u16>> {
        outcomes.iter().map(|o| o.status_code).collect()
    }

    #[test]
    fn test_rank_orders_bands() {
        let input: Vec<_> = [Some(503), Some(404), Some(301), Some(200), None]
            .into_iter()
            .enumerate()
            .map(|(i, s)| outcome(i, s))
            .collect();

        let ranked = rank(input);
        assert_eq!(statuses(&ranked), vec![Some(200), Some(301), Some(404), Some(503), None]);
    }

    #[test]
    fn test_rank_is_stable_within_a_status() {
        let input = vec![outcome(0, Some(403)), outcome(1, Some(200)), outcome(2, Some(403))];
        let ranked = rank(input);
        let urls: Vec<_> = ranked.iter().map(|o| o.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://storage.googleapis.com/b1",
                "https://storage.googleapis.com/b0",
                "https://storage.googleapis.com/b2",
            ]
        );
    }

    #[test]
    fn test_rank_key_bands() {
        assert_eq!(rank_key(Some(204)), 204);
        assert_eq!(rank_key(Some(302)), 402);
        assert_eq!(rank_key(Some(404)), 604);
        assert_eq!(rank_key(Some(500)), 800);
        assert_eq!(rank_key(None), 999);
    }

    #[test]
    fn test_out_of_band_statuses_sort_after_server_errors() {
        assert_eq!(rank_key(Some(101)), 998);
        assert_eq!(rank_key(Some(799)), 998);

        let input: Vec<_> = [None, Some(799), Some(599), Some(101), Some(301), Some(200)]
            .into_iter()
            .enumerate()
            .map(|(i, s)| outcome(i, s))
            .collect();

        let ranked = rank(input);
        assert_eq!(
            statuses(&ranked),
            vec![Some(200), Some(301), Some(599), Some(799), Some(101), None]
        );
    }

    #[test]
    fn test_filter_keeps_allowed_in_ranked_order() {
        let input: Vec<_> = [Some(200), Some(301), Some(403), Some(404), None]
            .into_iter()
            .enumerate()
            .map(|(i, s)| outcome(i, s))
            .collect();

        let filter = StatusFilter::new([200, 403]);
        let filtered = filter.apply(rank(input));
        assert_eq!(statuses(&filtered), vec![Some(200), Some(403)]);
    }

    #[test]
    fn test_filter_parsing() {
        let filter: StatusFilter = "200, 403,404".parse().unwrap();
        assert_eq!(filter.codes().collect::<Vec<_>>(), vec![200, 403, 404]);
        assert_eq!(filter.to_string(), "200,403,404");

        assert!("200,abc".parse::<StatusFilter>().is_err());
        assert!("".parse::<StatusFilter>().is_err());
        assert!("200,".parse::<StatusFilter>().is_err());
        assert!("70000".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_never_passes_missing_status() {
        let filter = StatusFilter::new([200]);
        assert!(!filter.allows(None));
    }
}
