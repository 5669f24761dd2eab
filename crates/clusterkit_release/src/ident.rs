//! Deterministic cluster identifiers.

use chrono::{Datelike, NaiveDate};
use md5::{Digest, Md5};

/// Days from 0001-01-01 (CE day 1) to 1899-12-30, the spreadsheet day zero.
const N_DAYS_CE_TO_SHEET_EPOCH: i32 = 693_594;

/// Day count since 1899-12-30, plus one.
pub fn derive_day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - N_DAYS_CE_TO_SHEET_EPOCH + 1
}

/// Lowercase hex MD5 of `name` followed by the day number of `date_today`.
///
/// Same name on the same day yields the same id.
pub fn derive_cluster_id(name: &str, date_today: NaiveDate) -> String {
    let n_day = derive_day_number(date_today);
    let mut hasher = Md5::new();
    hasher.update(format!("{name}{n_day}").as_bytes());
    let c_id = hex::encode(hasher.finalize());
    log::info!("Generated id for {name} on {date_today}: {c_id}");
    c_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn day_number_counts_from_sheet_epoch() {
        assert_eq!(derive_day_number(ymd(1899, 12, 30)), 1);
        assert_eq!(derive_day_number(ymd(1900, 1, 1)), 3);
        assert_eq!(derive_day_number(ymd(2025, 1, 1)), 45_659);
        let n_days = (ymd(2026, 10, 19) - ymd(1899, 12, 30)).num_days() + 1;
        assert_eq!(i64::from(derive_day_number(ymd(2026, 10, 19))), n_days);
    }

    #[test]
    fn cluster_id_known_vector() {
        assert_eq!(
            derive_cluster_id("Daniel", ymd(2025, 1, 1)),
            "0470b9e591c8d51887d1fd9d901e29d5"
        );
    }

    #[test]
    fn cluster_id_is_stable_within_a_day_and_changes_across_days() {
        let c_id_a = derive_cluster_id("Daniel", ymd(2026, 10, 19));
        let c_id_b = derive_cluster_id("Daniel", ymd(2026, 10, 19));
        let c_id_c = derive_cluster_id("Daniel", ymd(2026, 10, 20));
        let c_id_d = derive_cluster_id("Norte", ymd(2026, 10, 19));

        assert_eq!(c_id_a, c_id_b);
        assert_ne!(c_id_a, c_id_c);
        assert_ne!(c_id_a, c_id_d);
        assert_eq!(c_id_a.len(), 32);
        assert!(
            c_id_a
                .chars()
                .all(|chr| chr.is_ascii_digit() || ('a'..='f').contains(&chr))
        );
    }
}
