use govcon::domain::{
    allocation_color, burdened_cost, classify_funding, format_currency, is_underwater, margin,
    remaining_hours, DisplayColor, FundingWarningLevel, ResourceType,
};
use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

fn cents() -> impl Strategy<Value = Decimal> {
    (0_i64..100_000_000).prop_map(|c| Decimal::new(c, 2))
}

fn percent() -> impl Strategy<Value = Decimal> {
    (0_i64..=1_000).prop_map(|p| Decimal::new(p, 1))
}

fn resource_type() -> impl Strategy<Value = ResourceType> {
    prop::sample::select(ResourceType::ALL.to_vec())
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn burdened_cost_follows_wrap_table(rate in cents(), kind in resource_type()) {
        prop_assert_eq!(burdened_cost(rate, kind), rate * kind.wrap_rate());
        prop_assert!(burdened_cost(rate, kind) >= rate);
    }

    #[test]
    fn margin_is_absent_iff_bill_rate_is(bill in prop::option::of(cents()), cost in cents()) {
        let m = margin(bill, cost);
        prop_assert_eq!(m.is_none(), bill.is_none());
        if let Some(bill) = bill {
            prop_assert_eq!(m, Some(bill - cost));
            prop_assert_eq!(is_underwater(m), bill < cost);
        } else {
            prop_assert!(!is_underwater(m));
        }
    }

    #[test]
    fn lower_funding_never_lowers_severity(
        pct in percent(),
        drop in percent(),
        days in -30_i64..400,
        fewer in 0_i64..200,
    ) {
        let base = classify_funding(pct, days);
        let worse_pct = classify_funding((pct - drop).max(Decimal::ZERO), days);
        let worse_days = classify_funding(pct, days - fewer);
        prop_assert!(worse_pct >= base);
        prop_assert!(worse_days >= base);
    }

    #[test]
    fn runway_under_thirty_days_is_always_critical(pct in percent(), days in -365_i64..30) {
        prop_assert_eq!(classify_funding(pct, days), FundingWarningLevel::Critical);
    }

    #[test]
    fn full_allocation_is_red(pct in 100_i64..500) {
        prop_assert_eq!(allocation_color(Decimal::from(pct)), DisplayColor::Red);
    }

    #[test]
    fn remaining_hours_is_whole(hours in 0_i64..4_000, pct in percent()) {
        let h = remaining_hours(Decimal::from(hours), pct);
        prop_assert_eq!(h, h.trunc());
        prop_assert!(h <= Decimal::from(hours) + Decimal::ONE);
    }

    #[test]
    fn currency_is_signed_and_grouped(amount in -1_000_000_000_i64..1_000_000_000) {
        let text = format_currency(Decimal::from(amount));
        prop_assert_eq!(text.starts_with('-'), amount < 0);
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(digits, amount.unsigned_abs().to_string());
        for group in text.trim_start_matches('-').trim_start_matches('$').split(',').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
    }
}
