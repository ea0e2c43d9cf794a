//! Revenue aggregation over a filtered record view.

use shared::{Revenue, RevenueFilters, RevenueSummary};

/// Fold a record view into totals.
///
/// Sums `amount`, `rent`, the itemized costs, and the stored `profit`
/// independently. `profit` is never re-derived from the other fields: the
/// ledger service owns reconciliation, and inconsistent stored records simply
/// flow through into the totals. Empty input gives the all-zero summary. The
/// fold is associative and commutative, so partial summaries over pages can
/// be combined safely.
pub fn summarize(records: &[Revenue]) -> RevenueSummary {
    records.iter().fold(RevenueSummary::default(), |acc, record| {
        RevenueSummary {
            total_amount: acc.total_amount + record.amount,
            total_rent: acc.total_rent + record.rent,
            total_costs: acc.total_costs + record.itemized_costs(),
            total_profit: acc.total_profit + record.profit,
        }
    })
}

/// Apply filters to a record set, producing the view `summarize` folds over.
/// The remote boundary usually filters server-side; this covers re-filtering
/// an already-loaded page without another round trip.
pub fn filter_view(records: &[Revenue], filters: &RevenueFilters) -> Vec<Revenue> {
    records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, amount: f64, rent: f64, parking: f64, profit: f64) -> Revenue {
        Revenue {
            id: id.to_string(),
            date: "2024-05-01".to_string(),
            market: String::new(),
            market_id: "m1".to_string(),
            amount,
            rent,
            parking_fee: parking,
            cleaning_fee: 0.0,
            other_cost: 0.0,
            profit,
            submitted_by: String::new(),
            submitted_by_phone: "0911222333".to_string(),
            note: String::new(),
            submitted_at: String::new(),
        }
    }

    #[test]
    fn test_empty_input_gives_all_zero_summary() {
        assert_eq!(summarize(&[]), RevenueSummary::default());
    }

    #[test]
    fn test_summarize_two_records() {
        let records = vec![
            record("r1", 1000.0, 300.0, 50.0, 650.0),
            record("r2", 500.0, 100.0, 0.0, 400.0),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total_amount, 1500.0);
        assert_eq!(summary.total_rent, 400.0);
        assert_eq!(summary.total_costs, 50.0);
        assert_eq!(summary.total_profit, 1050.0);
    }

    #[test]
    fn test_summarize_is_order_independent() {
        let mut records = vec![
            record("r1", 1000.0, 300.0, 50.0, 650.0),
            record("r2", 500.0, 100.0, 0.0, 400.0),
            record("r3", 750.0, 200.0, 30.0, 520.0),
        ];

        let forward = summarize(&records);
        records.reverse();
        assert_eq!(summarize(&records), forward);

        records.swap(0, 1);
        assert_eq!(summarize(&records), forward);
    }

    #[test]
    fn test_stored_profit_is_trusted_over_components() {
        // profit deliberately disagrees with amount - rent - costs; the
        // aggregator passes the stored value through rather than fixing it
        let records = vec![record("r1", 1000.0, 300.0, 50.0, 999.0)];

        let summary = summarize(&records);
        assert_eq!(summary.total_profit, 999.0);
    }

    #[test]
    fn test_costs_exclude_rent() {
        let mut with_all_costs = record("r1", 1000.0, 300.0, 50.0, 600.0);
        with_all_costs.cleaning_fee = 30.0;
        with_all_costs.other_cost = 20.0;

        let summary = summarize(&[with_all_costs]);
        assert_eq!(summary.total_costs, 100.0);
        assert_eq!(summary.total_rent, 300.0);
    }

    #[test]
    fn test_filter_view_feeds_summarize() {
        let mut records = vec![
            record("r1", 1000.0, 300.0, 50.0, 650.0),
            record("r2", 500.0, 100.0, 0.0, 400.0),
        ];
        records[1].market_id = "m2".to_string();

        let filters = RevenueFilters {
            market_id: Some("m1".to_string()),
            ..Default::default()
        };
        let view = filter_view(&records, &filters);
        assert_eq!(view.len(), 1);

        let summary = summarize(&view);
        assert_eq!(summary.total_amount, 1000.0);
        assert_eq!(summary.total_profit, 650.0);
    }
}
