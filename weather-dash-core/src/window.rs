use crate::model::{Reading, ReadingsTable};

pub const MIN_HOURS: u32 = 1;
pub const MAX_HOURS: u32 = 168;
pub const DEFAULT_HOURS: u32 = 12;

/// Trailing slice of a readings table.
pub type Window<'a> = &'a [Reading];

/// Last `hours` rows of `table`, or the whole table when it is shorter.
pub fn select(table: &ReadingsTable, hours: u32) -> Window<'_> {
    let rows = table.rows();
    let start = rows.len().saturating_sub(hours as usize);
    &rows[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn table(len: usize) -> ReadingsTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        ReadingsTable::new(
            (0..len)
                .map(|i| Reading {
                    time: start + Duration::hours(i as i64),
                    temperature_c: i as f64,
                    humidity_pct: 50.0,
                    wind_speed_mps: 1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn window_length_is_min_of_hours_and_table() {
        for len in [0usize, 1, 12, 100, 168] {
            let t = table(len);
            for hours in MIN_HOURS..=MAX_HOURS {
                assert_eq!(select(&t, hours).len(), (hours as usize).min(len));
            }
        }
    }

    #[test]
    fn window_is_a_suffix() {
        let t = table(48);
        let w = select(&t, 6);

        assert_eq!(w.first().unwrap().temperature_c, 42.0);
        assert_eq!(w.last().unwrap().temperature_c, 47.0);
    }

    #[test]
    fn oversized_request_clamps_to_full_table() {
        let t = table(10);
        assert_eq!(select(&t, 168), t.rows());
    }
}
