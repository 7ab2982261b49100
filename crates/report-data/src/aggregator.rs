//! Two-level accumulation of transfer volumes.
//!
//! Every accepted relay-close record contributes its `bytesin + bytesout`
//! once to its user, once to its asset and once to the grand total. Both
//! sides key on (display name, time-bucket label).

use std::collections::BTreeMap;

use report_core::aliases::AliasTables;
use report_core::models::RelayClose;
use report_core::time_utils;
use tracing::{debug, trace};

use crate::filter::RecordFilter;

// ── EntityUsage ───────────────────────────────────────────────────────────────

/// Byte totals for one user or asset, keyed by time-bucket label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityUsage {
    buckets: BTreeMap<String, u64>,
    overall: u64,
}

impl EntityUsage {
    /// Add `amount` to a bucket and to the overall total.
    ///
    /// Unseen buckets are created on first use; nothing is ever removed,
    /// so `overall` always equals the sum of the bucket values.
    pub fn add(&mut self, bucket: &str, amount: u64) {
        *self.buckets.entry(bucket.to_string()).or_insert(0) += amount;
        self.overall += amount;
    }

    /// Total across all buckets.
    pub fn overall(&self) -> u64 {
        self.overall
    }

    /// Buckets in ascending label order, which is chronological order for
    /// the zero-padded label formats.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets
            .iter()
            .map(|(label, bytes)| (label.as_str(), *bytes))
    }
}

// ── TrafficTotals ─────────────────────────────────────────────────────────────

/// Aggregated transfer volumes for one run.
///
/// Invariant: `grand_total` equals the sum of all user overalls and also
/// the sum of all asset overalls, since every record lands in exactly one
/// entry on each side.
#[derive(Debug, Clone, Default)]
pub struct TrafficTotals {
    users: BTreeMap<String, EntityUsage>,
    assets: BTreeMap<String, EntityUsage>,
    grand_total: u64,
}

impl TrafficTotals {
    /// Accumulate one accepted record: `amount` bytes for `user` on
    /// `asset` within `bucket`.
    pub fn record(&mut self, user: &str, asset: &str, bucket: &str, amount: u64) {
        self.users
            .entry(user.to_string())
            .or_default()
            .add(bucket, amount);
        self.assets
            .entry(asset.to_string())
            .or_default()
            .add(bucket, amount);
        self.grand_total += amount;
    }

    /// Per-user usage, keyed by display name.
    pub fn users(&self) -> &BTreeMap<String, EntityUsage> {
        &self.users
    }

    /// Per-asset usage, keyed by display name.
    pub fn assets(&self) -> &BTreeMap<String, EntityUsage> {
        &self.assets
    }

    /// Sum of all counted records' byte totals.
    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }
}

// ── Folding ───────────────────────────────────────────────────────────────────

/// Fold relay-close records into [`TrafficTotals`].
///
/// Alias resolution happens before the name filters run, so `--user` and
/// `--asset` match the display names that appear in the report. Records
/// from multiple input files fold into the same totals; callers just
/// concatenate the record lists.
pub fn fold_events(
    events: &[RelayClose],
    filter: &RecordFilter,
    aliases: &AliasTables,
    granularity: u32,
) -> TrafficTotals {
    let mut totals = TrafficTotals::default();
    let mut accepted = 0usize;

    for event in events {
        if !filter.accepts_time(event.timestamp) {
            trace!(
                "{} outside time range {} to {}",
                event.timestamp,
                filter.since,
                filter.before
            );
            continue;
        }

        let user = aliases.resolve_user(&event.username);
        let asset = aliases.resolve_asset(&event.asset_id);
        if !filter.accepts_names(user, asset) {
            continue;
        }

        let bucket = time_utils::bucket_label(event.timestamp, granularity);
        totals.record(user, asset, &bucket, event.data_total());
        accepted += 1;
    }

    debug!("{} of {} relay closes accepted", accepted, events.len());
    totals
}

// ── Tests ─────────────────────────────────────────────────────────────────────
