//! Association resolution for reconciliation discrepancies.
//!
//! A discrepancy row stores a single `id_report` that may point at either
//! a conciliation or a liquidation. `method_process` decides which one;
//! the other joined candidate must be dropped before the row leaves the
//! storage layer.

use crate::model::DiscrepancyView;

/// Which report family a discrepancy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Conciliation,
    Liquidation,
}

impl ReportKind {
    /// Classifies a raw `method_process` value by substring. Values
    /// containing "conciliation" win over "liquidation" when both match.
    /// Matching is case-sensitive.
    pub fn from_method_process(raw: &str) -> Option<Self> {
        if raw.contains("conciliation") {
            Some(Self::Conciliation)
        } else if raw.contains("liquidation") {
            Some(Self::Liquidation)
        } else {
            None
        }
    }
}

/// Resolves one view in place. Returns true when the row was ambiguous
/// and both associations were cleared.
fn resolve_one(view: &mut DiscrepancyView) -> bool {
    let kind = view
        .discrepancy
        .method_process
        .as_deref()
        .and_then(ReportKind::from_method_process);

    match kind {
        Some(ReportKind::Conciliation) => {
            view.liquidation = None;
            false
        }
        Some(ReportKind::Liquidation) => {
            view.conciliation = None;
            false
        }
        None => {
            view.conciliation = None;
            view.liquidation = None;
            true
        }
    }
}

/// Resolves every view in place, warning once per ambiguous row. Never
/// fails; unresolvable rows are returned with both associations empty.
pub fn resolve_associations(views: &mut [DiscrepancyView]) {
    for view in views.iter_mut() {
        if resolve_one(view) {
            tracing::warn!(
                id = view.discrepancy.id,
                method_process = view.discrepancy.method_process.as_deref(),
                "discrepancy has unrecognized method_process, dropping associations"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConciliationRef, Discrepancy, LiquidationRef};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn view(method_process: Option<&str>) -> DiscrepancyView {
        DiscrepancyView {
            discrepancy: Discrepancy {
                id: 7,
                id_report: 42,
                status: "pending".into(),
                difference: Decimal::new(1500, 2),
                method_process: method_process.map(str::to_string),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            conciliation: Some(ConciliationRef {
                id: 42,
                collector_id: 3,
                collector_name: Some("Efecty".into()),
                from_date: "2024-03-01".parse().unwrap(),
                to_date: "2024-03-07".parse().unwrap(),
                amount: Decimal::new(100_00, 2),
                amount_collector: Decimal::new(98_50, 2),
                difference_amounts: Decimal::new(1_50, 2),
                conciliations_state: false,
            }),
            liquidation: Some(LiquidationRef {
                id: 42,
                collector_id: 3,
                collector_name: Some("Efecty".into()),
                from_date: "2024-03-01".parse().unwrap(),
                to_date: "2024-03-07".parse().unwrap(),
                amount_collector: Decimal::new(98_50, 2),
                amount_liquidation: Decimal::new(100_00, 2),
                difference_amounts: Decimal::new(1_50, 2),
            }),
        }
    }

    #[test]
    fn conciliation_method_keeps_only_conciliation() {
        let mut views = vec![view(Some("auto-conciliation-v2"))];
        resolve_associations(&mut views);
        assert!(views[0].conciliation.is_some());
        assert!(views[0].liquidation.is_none());
    }

    #[test]
    fn liquidation_method_keeps_only_liquidation() {
        let mut views = vec![view(Some("weekly liquidation run"))];
        resolve_associations(&mut views);
        assert!(views[0].conciliation.is_none());
        assert!(views[0].liquidation.is_some());
    }

    #[test]
    fn unrecognized_method_clears_both() {
        let mut views = vec![view(Some("manual-review"))];
        resolve_associations(&mut views);
        assert!(views[0].conciliation.is_none());
        assert!(views[0].liquidation.is_none());
    }

    #[test]
    fn missing_method_clears_both() {
        let mut views = vec![view(None)];
        resolve_associations(&mut views);
        assert!(views[0].conciliation.is_none());
        assert!(views[0].liquidation.is_none());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut views = vec![view(Some("Conciliation"))];
        resolve_associations(&mut views);
        assert!(views[0].conciliation.is_none());
        assert!(views[0].liquidation.is_none());
    }

    #[test]
    fn only_unrecognized_records_are_flagged_ambiguous() {
        for raw in [None, Some(""), Some("manual-review"), Some("Conciliation")] {
            let mut v = view(raw);
            assert!(resolve_one(&mut v), "{raw:?} should be ambiguous");
        }
        for raw in [
            Some("conciliation"),
            Some("auto-conciliation-v2"),
            Some("weekly liquidation run"),
        ] {
            let mut v = view(raw);
            assert!(!resolve_one(&mut v), "{raw:?} should resolve");
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut views = vec![view(Some("conciliation"))];
        resolve_associations(&mut views);
        let first = views[0].clone();
        resolve_associations(&mut views);
        assert_eq!(views[0].conciliation, first.conciliation);
        assert_eq!(views[0].liquidation, first.liquidation);
    }
}
