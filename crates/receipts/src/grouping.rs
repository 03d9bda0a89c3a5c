//! Receipt Grouping: recognizing the records of one allocator run as a single
//! logical transaction.
//!
//! Primary key is the explicit batch identifier stamped on every record an
//! allocator run emits. Records predating batch identifiers fall back to a
//! timestamp heuristic: same (student, class) created inside the same fixed
//! 2-second bucket. Retained as a migration aid only, since it is a guess
//! over timestamps, not a real relationship.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use eduledger_billing::{InvoiceRecord, TaxCode};
use eduledger_core::{ClassId, Money, Period, RecordId, SettlementStatus, StudentId, derive_status};

use crate::vat::{TaxSummary, VatBreakdown};

/// Width of the fallback clustering bucket.
pub const FALLBACK_BUCKET_MILLIS: i64 = 2_000;

/// How long an unreferenced grouping hint is retained.
pub const HINT_RETENTION_HOURS: i64 = 48;

/// Supplementary grouping metadata for one record.
///
/// Replaces the legacy client-local cache: an explicit table keyed by record
/// id, passed into grouping as a parameter, never ambient state. Carries what
/// the ledger row itself may be missing: the batch of the run that created
/// it and a tax override for rows persisted before the tax column existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingHint {
    pub batch: Option<String>,
    pub tax: Option<TaxCode>,
    pub recorded_at: DateTime<Utc>,
}

/// Explicit grouping-hint table keyed by record id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupingHints {
    entries: HashMap<RecordId, GroupingHint>,
}

impl GroupingHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: RecordId, hint: GroupingHint) {
        self.entries.insert(record, hint);
    }

    pub fn get(&self, record: RecordId) -> Option<&GroupingHint> {
        self.entries.get(&record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries older than [`HINT_RETENTION_HOURS`] unless their record is
    /// still referenced. Returns how many entries were removed.
    pub fn prune(&mut self, now: DateTime<Utc>, referenced: &HashSet<RecordId>) -> usize {
        let cutoff = now - TimeDelta::hours(HINT_RETENTION_HOURS);
        let before = self.entries.len();
        self.entries
            .retain(|id, hint| referenced.contains(id) || hint.recorded_at >= cutoff);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "pruned grouping hints");
        }
        removed
    }
}

/// One receipt row: a cluster of records presented as a single transaction.
///
/// Amounts are summed over the members and the status is recomputed from the
/// sums, never by combining the members' individual statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptGroup {
    /// Member record ids, ascending by period.
    pub records: Vec<RecordId>,
    pub student: StudentId,
    pub class: ClassId,
    /// Earliest member period.
    pub period_start: Period,
    /// Latest member period.
    pub period_end: Period,
    pub required_total: Money,
    pub settled_total: Money,
    pub status: SettlementStatus,
    pub tax: TaxSummary,
}

impl ReceiptGroup {
    /// Display label for the group's period range, e.g. `2024-01 … 2024-03`.
    pub fn period_label(&self) -> String {
        if self.period_start == self.period_end {
            self.period_start.to_string()
        } else {
            format!("{} … {}", self.period_start, self.period_end)
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
enum GroupKey {
    Batch(String, StudentId, ClassId),
    Bucket(StudentId, ClassId, i64),
    Single(RecordId),
}

fn effective_batch(record: &InvoiceRecord, hints: &GroupingHints) -> Option<String> {
    hints
        .get(record.id)
        .and_then(|h| h.batch.clone())
        .or_else(|| record.batch_key())
}

fn effective_tax(record: &InvoiceRecord, hints: &GroupingHints) -> TaxCode {
    hints
        .get(record.id)
        .and_then(|h| h.tax)
        .unwrap_or(record.tax_code)
}

fn bucket_of(created_at: DateTime<Utc>) -> i64 {
    created_at.timestamp_millis().div_euclid(FALLBACK_BUCKET_MILLIS)
}

/// Cluster the given records into receipt groups.
///
/// Records sharing a batch always group together regardless of timestamp
/// skew. Records without any batch cluster by the 2-second fallback bucket,
/// but only when the bucket holds more than one record; a singleton is never
/// grouped by the heuristic. Group order follows first appearance in the
/// input; pass records in display order.
pub fn group_receipts(records: &[InvoiceRecord], hints: &GroupingHints) -> Vec<ReceiptGroup> {
    // Count bucket occupancy among batch-less records first; the fallback
    // only fires for buckets shared by at least two of them.
    let mut bucket_counts: HashMap<(StudentId, ClassId, i64), usize> = HashMap::new();
    for record in records {
        if effective_batch(record, hints).is_none() {
            let key = (record.student, record.class, bucket_of(record.created_at));
            *bucket_counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut order: Vec<Vec<&InvoiceRecord>> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    for record in records {
        let key = match effective_batch(record, hints) {
            Some(batch) => GroupKey::Batch(batch, record.student, record.class),
            None => {
                let bucket = bucket_of(record.created_at);
                if bucket_counts
                    .get(&(record.student, record.class, bucket))
                    .is_some_and(|n| *n > 1)
                {
                    GroupKey::Bucket(record.student, record.class, bucket)
                } else {
                    GroupKey::Single(record.id)
                }
            }
        };
        match index.get(&key) {
            Some(&slot) => order[slot].push(record),
            None => {
                index.insert(key, order.len());
                order.push(vec![record]);
            }
        }
    }

    order
        .into_iter()
        .map(|mut members| {
            members.sort_by_key(|r| r.period);
            let first = members[0];
            let required_total: Money = members.iter().map(|r| r.required_amount).sum();
            let settled_total: Money = members.iter().map(|r| r.settled_amount).sum();

            let mut codes: Vec<TaxCode> =
                members.iter().map(|r| effective_tax(r, hints)).collect();
            codes.dedup();
            let tax = if codes.len() == 1 {
                TaxSummary::Uniform {
                    code: codes[0],
                    breakdown: VatBreakdown::decompose(settled_total, codes[0]),
                }
            } else {
                TaxSummary::Mixed {
                    gross: settled_total,
                }
            };

            ReceiptGroup {
                records: members.iter().map(|r| r.id).collect(),
                student: first.student,
                class: first.class,
                period_start: first.period,
                period_end: members[members.len() - 1].period,
                required_total,
                settled_total,
                status: derive_status(settled_total, required_total),
                tax,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use eduledger_core::BatchId;

    fn m(major: i64) -> Money {
        Money::from_major(major)
    }

    fn p(month: u32) -> Period {
        Period::new(2024, month).unwrap()
    }

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, millis * 1_000_000)
            .unwrap()
    }

    fn record(
        student: StudentId,
        class: ClassId,
        period: Period,
        required: Money,
        settled: Money,
        batch: Option<BatchId>,
        created_at: DateTime<Utc>,
    ) -> InvoiceRecord {
        InvoiceRecord {
            id: RecordId::new(),
            student,
            class,
            period,
            required_amount: required,
            settled_amount: settled,
            status: derive_status(settled, required),
            tax_code: TaxCode::None,
            batch,
            annotation: None,
            confirmed_at: None,
            created_at,
        }
    }

    #[test]
    fn batch_members_group_regardless_of_timestamp_skew() {
        let student = StudentId::new();
        let class = ClassId::new();
        let batch = BatchId::new();
        // Created hours apart; the batch id still binds them.
        let records = vec![
            record(student, class, p(1), m(100), m(100), Some(batch), at(0, 0)),
            record(student, class, p(2), m(100), m(50), Some(batch), at(7200, 0)),
        ];

        let groups = group_receipts(&records, &GroupingHints::new());
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.records.len(), 2);
        assert_eq!(group.period_start, p(1));
        assert_eq!(group.period_end, p(2));
        assert_eq!(group.required_total, m(200));
        assert_eq!(group.settled_total, m(150));
        // Status from the sums (partial), not from combining paid + partial.
        assert_eq!(group.status, SettlementStatus::Partial);
        assert_eq!(group.period_label(), "2024-01 … 2024-02");
    }

    #[test]
    fn status_comes_from_summed_amounts_not_member_statuses() {
        let student = StudentId::new();
        let class = ClassId::new();
        let batch = BatchId::new();
        // One fully paid member, one due member; the sums say partial.
        let records = vec![
            record(student, class, p(6), m(100), m(100), Some(batch), at(0, 0)),
            record(student, class, p(7), m(100), Money::ZERO, Some(batch), at(0, 500)),
        ];

        let groups = group_receipts(&records, &GroupingHints::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].status, SettlementStatus::Partial);
    }

    #[test]
    fn fallback_groups_same_bucket_records() {
        let student = StudentId::new();
        let class = ClassId::new();
        // 400 ms apart: same 2-second bucket.
        let records = vec![
            record(student, class, p(1), m(100), m(100), None, at(0, 0)),
            record(student, class, p(2), m(100), m(100), None, at(0, 400)),
        ];

        let groups = group_receipts(&records, &GroupingHints::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records.len(), 2);
    }

    #[test]
    fn fallback_never_groups_records_more_than_two_seconds_apart() {
        let student = StudentId::new();
        let class = ClassId::new();
        let records = vec![
            record(student, class, p(1), m(100), m(100), None, at(0, 0)),
            record(student, class, p(2), m(100), m(100), None, at(4, 0)),
        ];

        let groups = group_receipts(&records, &GroupingHints::new());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn fallback_requires_matching_student_and_class() {
        let class = ClassId::new();
        let records = vec![
            record(StudentId::new(), class, p(1), m(100), m(100), None, at(0, 0)),
            record(StudentId::new(), class, p(1), m(100), m(100), None, at(0, 100)),
        ];

        let groups = group_receipts(&records, &GroupingHints::new());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn singletons_stay_single() {
        let student = StudentId::new();
        let class = ClassId::new();
        let records = vec![record(student, class, p(3), m(100), m(40), None, at(0, 0))];

        let groups = group_receipts(&records, &GroupingHints::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records.len(), 1);
        assert_eq!(groups[0].period_label(), "2024-03");
        assert_eq!(groups[0].status, SettlementStatus::Partial);
    }

    #[test]
    fn hint_batch_overrides_missing_record_batch() {
        let student = StudentId::new();
        let class = ClassId::new();
        // Far apart and batch-less on the record, but the hint table binds them.
        let a = record(student, class, p(1), m(100), m(100), None, at(0, 0));
        let b = record(student, class, p(2), m(100), m(100), None, at(600, 0));
        let mut hints = GroupingHints::new();
        for rec in [&a, &b] {
            hints.insert(
                rec.id,
                GroupingHint {
                    batch: Some("B1699999999".to_string()),
                    tax: None,
                    recorded_at: at(0, 0),
                },
            );
        }

        let groups = group_receipts(&[a, b], &hints);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn mixed_tax_codes_expose_only_summed_gross() {
        let student = StudentId::new();
        let class = ClassId::new();
        let batch = BatchId::new();
        let mut a = record(student, class, p(1), m(100), m(100), Some(batch), at(0, 0));
        a.tax_code = TaxCode::Standard;
        let mut b = record(student, class, p(2), m(100), m(100), Some(batch), at(0, 100));
        b.tax_code = TaxCode::Reduced;

        let groups = group_receipts(&[a, b], &GroupingHints::new());
        assert_eq!(groups.len(), 1);
        match groups[0].tax {
            TaxSummary::Mixed { gross } => assert_eq!(gross, m(200)),
            ref other => panic!("expected mixed tax summary, got {other:?}"),
        }
    }

    #[test]
    fn uniform_tax_groups_carry_a_breakdown_over_the_sum() {
        let student = StudentId::new();
        let class = ClassId::new();
        let batch = BatchId::new();
        let mut a = record(
            student,
            class,
            p(1),
            m(59),
            Money::from_minor(5900),
            Some(batch),
            at(0, 0),
        );
        a.tax_code = TaxCode::Standard;
        let mut b = record(
            student,
            class,
            p(2),
            m(59),
            Money::from_minor(5900),
            Some(batch),
            at(0, 100),
        );
        b.tax_code = TaxCode::Standard;

        let groups = group_receipts(&[a, b], &GroupingHints::new());
        match groups[0].tax {
            TaxSummary::Uniform { code, breakdown } => {
                assert_eq!(code, TaxCode::Standard);
                assert_eq!(breakdown.gross, Money::from_minor(11800));
                assert_eq!(breakdown.net, Money::from_minor(10000));
                assert_eq!(breakdown.vat, Money::from_minor(1800));
            }
            ref other => panic!("expected uniform tax summary, got {other:?}"),
        }
    }

    #[test]
    fn prune_drops_stale_unreferenced_hints() {
        let mut hints = GroupingHints::new();
        let stale = RecordId::new();
        let fresh = RecordId::new();
        let kept = RecordId::new();
        let now = at(0, 0) + TimeDelta::hours(100);
        hints.insert(
            stale,
            GroupingHint {
                batch: Some("old".into()),
                tax: None,
                recorded_at: at(0, 0),
            },
        );
        hints.insert(
            fresh,
            GroupingHint {
                batch: Some("new".into()),
                tax: None,
                recorded_at: now - TimeDelta::hours(1),
            },
        );
        hints.insert(
            kept,
            GroupingHint {
                batch: Some("still-referenced".into()),
                tax: None,
                recorded_at: at(0, 0),
            },
        );

        let referenced: HashSet<RecordId> = [kept].into_iter().collect();
        let removed = hints.prune(now, &referenced);
        assert_eq!(removed, 1);
        assert!(hints.get(stale).is_none());
        assert!(hints.get(fresh).is_some());
        assert!(hints.get(kept).is_some());
    }
}
