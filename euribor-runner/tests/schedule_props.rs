//! Property tests for work-item selection.

use chrono::{Datelike, TimeZone, Utc};
use euribor_core::{WorkItem, YearMonth};
use euribor_runner::WorkSelection;
use proptest::prelude::*;

fn arb_now() -> impl Strategy<Value = chrono::DateTime<Utc>> {
    (1_000_000_000i64..4_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #[test]
    fn previous_then_current_are_consecutive(now in arb_now()) {
        let selection = WorkSelection { previous: true, ..Default::default() };
        let items = selection.work_items(now, 2012).unwrap();
        let current = YearMonth::containing(now).unwrap();

        prop_assert_eq!(items.len(), 2);
        prop_assert_eq!(items[1], WorkItem::Month(current));
        match items[0] {
            WorkItem::Month(previous) => prop_assert_eq!(previous.next(), Some(current)),
            WorkItem::Year(_) => prop_assert!(false, "expected a month item"),
        }
    }

    #[test]
    fn smart_default_never_selects_a_future_month(now in arb_now()) {
        let items = WorkSelection::default().work_items(now, 2012).unwrap();
        for item in items {
            for period in item.months() {
                prop_assert!(!period.is_after(now));
            }
        }
    }

    #[test]
    fn backfill_is_one_item_per_year(now in arb_now(), start in 2000i32..2030) {
        let selection = WorkSelection { backfill: true, ..Default::default() };
        let items = selection.work_items(now, start).unwrap();
        let expected: Vec<WorkItem> = (start..=now.year()).map(WorkItem::Year).collect();
        prop_assert_eq!(items, expected);
    }
}
