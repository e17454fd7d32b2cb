//! Delay-fee arithmetic.

use chrono::NaiveDate;

/// Compute the delay fee for a rental closed on `return_date`.
///
/// The elapsed time is the whole-calendar-day difference between the two
/// dates; both are calendar dates, so there is no timezone arithmetic here.
/// Days held beyond the agreed `days_rented` are charged at `price_per_day`
/// each; returning early or on time costs nothing.
///
/// Total for any pair of dates: a `return_date` before `rent_date` yields 0.
pub fn delay_fee(
    rent_date: NaiveDate,
    days_rented: u32,
    return_date: NaiveDate,
    price_per_day: i64,
) -> i64 {
    let elapsed = (return_date - rent_date).num_days();
    let delay = elapsed - i64::from(days_rented);
    if delay > 0 { delay * price_per_day } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn return_within_period_is_free() {
        // elapsed 2 days < 3 rented
        let fee = delay_fee(date(2024, 1, 1), 3, date(2024, 1, 3), 5);
        assert_eq!(fee, 0);
    }

    #[test]
    fn return_on_the_last_day_is_free() {
        let fee = delay_fee(date(2024, 1, 1), 3, date(2024, 1, 4), 5);
        assert_eq!(fee, 0);
    }

    #[test]
    fn two_days_late_charges_two_days() {
        // elapsed 5 days, delay 2, 2 * 5 = 10
        let fee = delay_fee(date(2024, 1, 1), 3, date(2024, 1, 6), 5);
        assert_eq!(fee, 10);
    }

    #[test]
    fn same_day_return_is_free() {
        let fee = delay_fee(date(2024, 1, 1), 1, date(2024, 1, 1), 500);
        assert_eq!(fee, 0);
    }

    #[test]
    fn return_before_rent_date_is_free() {
        let fee = delay_fee(date(2024, 1, 10), 3, date(2024, 1, 1), 500);
        assert_eq!(fee, 0);
    }

    #[test]
    fn crosses_month_boundaries() {
        // Jan 30 + 3 days rented, returned Feb 4: elapsed 5, delay 2.
        let fee = delay_fee(date(2024, 1, 30), 3, date(2024, 2, 4), 100);
        assert_eq!(fee, 200);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_date() -> impl Strategy<Value = NaiveDate> {
            (2000i32..2100, 1u32..=12, 1u32..=28)
                .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
        }

        proptest! {
            /// Property: the fee is never negative.
            #[test]
            fn fee_is_non_negative(
                rent in arb_date(),
                days in 1u32..365,
                ret in arb_date(),
                price in 1i64..100_000,
            ) {
                prop_assert!(delay_fee(rent, days, ret, price) >= 0);
            }

            /// Property: each extra day past the period adds exactly one
            /// day's price.
            #[test]
            fn fee_grows_by_price_per_extra_day(
                rent in arb_date(),
                days in 1u32..365,
                late in 1i64..1000,
                price in 1i64..100_000,
            ) {
                let on_time = rent + chrono::Days::new(u64::from(days));
                let ret = on_time + chrono::Days::new(late as u64);
                prop_assert_eq!(delay_fee(rent, days, ret, price), late * price);
            }
        }
    }
}
