use crate::domain::{Period, Record};
use serde::Serialize;

/// Minimum and maximum defined year across a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    /// Returns `None` when no record carries a year.
    pub fn from_records(records: &[Record]) -> Option<Self> {
        records
            .iter()
            .filter_map(|record| record.year)
            .fold(None, |bounds: Option<Self>, year| {
                Some(bounds.map_or(Self { min: year, max: year }, |b| Self {
                    min: b.min.min(year),
                    max: b.max.max(year),
                }))
            })
    }

    pub fn span(self) -> i64 {
        i64::from(self.max) - i64::from(self.min)
    }

    pub fn contains(self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Period,
    Cursor,
}

/// The temporal predicate a view applies to the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalFilter {
    /// Records dated inside the period, both ends inclusive.
    Period(Period),
    /// Records dated at or before the cursor year.
    UpTo(i32),
}

impl TemporalFilter {
    /// Undated records never match.
    pub fn matches(self, year: Option<i32>) -> bool {
        let Some(year) = year else {
            return false;
        };
        match self {
            Self::Period(period) => period.contains(year),
            Self::UpTo(cursor) => year <= cursor,
        }
    }
}

/// Stable filter over `records`; input order is preserved.
pub fn compute_visible(records: &[Record], filter: TemporalFilter) -> Vec<&Record> {
    records
        .iter()
        .filter(|record| filter.matches(record.year))
        .collect()
}

pub fn visible_indices(records: &[Record], filter: TemporalFilter) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record.year))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Category, GeoPoint};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    pub(crate) fn record(id: &str, year: Option<i32>) -> Record {
        Record {
            id: id.to_string(),
            position: GeoPoint { lat: 0.0, lng: 0.0 },
            category: Category::Possible,
            year,
            title: format!("Record {id}"),
            date: String::new(),
            location: String::new(),
            region: String::new(),
            country: String::new(),
            credibility: 5,
            description: String::new(),
        }
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn scenario_period_and_cursor() {
        let records = vec![
            record("a", Some(-500)),
            record("b", Some(1200)),
            record("c", Some(1980)),
        ];

        let ancient = compute_visible(&records, TemporalFilter::Period(Period::Ancient));
        assert_eq!(ids(&ancient), vec!["a"]);

        let cursor = compute_visible(&records, TemporalFilter::UpTo(1500));
        assert_eq!(ids(&cursor), vec!["a", "b"]);
    }

    #[test]
    fn undated_records_never_match() {
        let records = vec![record("x", None), record("y", Some(1990))];
        assert_eq!(
            ids(&compute_visible(&records, TemporalFilter::UpTo(i32::MAX))),
            vec!["y"]
        );
        assert!(compute_visible(&records, TemporalFilter::Period(Period::Contemporary))
            .iter()
            .all(|record| record.year.is_some()));
    }

    #[test]
    fn period_boundaries_are_included() {
        let records = vec![
            record("before", Some(1749)),
            record("start", Some(1750)),
            record("end", Some(1949)),
            record("after", Some(1950)),
        ];
        let modern = compute_visible(&records, TemporalFilter::Period(Period::Modern));
        assert_eq!(ids(&modern), vec!["start", "end"]);
    }

    #[test]
    fn bounds_ignore_undated_records() {
        let records = vec![record("a", None), record("b", Some(12)), record("c", Some(-40))];
        assert_eq!(
            YearBounds::from_records(&records),
            Some(YearBounds { min: -40, max: 12 })
        );
        assert_eq!(YearBounds::from_records(&[record("z", None)]), None);
        assert_eq!(YearBounds::from_records(&[]), None);
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(prop::option::of(-3000_i32..2100), 0..40).prop_map(|years| {
            years
                .into_iter()
                .enumerate()
                .map(|(index, year)| record(&index.to_string(), year))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn cursor_filter_is_exact_and_ordered(records in arb_records(), cursor in -3500_i32..2500) {
            let visible = compute_visible(&records, TemporalFilter::UpTo(cursor));
            let expected: Vec<&Record> = records
                .iter()
                .filter(|record| record.year.is_some_and(|year| year <= cursor))
                .collect();
            prop_assert_eq!(visible, expected);
        }

        #[test]
        fn period_filter_is_exact_and_ordered(records in arb_records(), index in 0_usize..4) {
            let period = Period::from_index(index).unwrap_or(Period::Ancient);
            let visible = compute_visible(&records, TemporalFilter::Period(period));
            let expected: Vec<&Record> = records
                .iter()
                .filter(|record| {
                    record
                        .year
                        .is_some_and(|year| year >= period.start() && year <= period.end())
                })
                .collect();
            prop_assert_eq!(visible, expected);
        }

        #[test]
        fn cursor_extremes(records in arb_records()) {
            prop_assert!(compute_visible(&records, TemporalFilter::UpTo(-4000)).is_empty());
            let dated = records.iter().filter(|record| record.year.is_some()).count();
            prop_assert_eq!(compute_visible(&records, TemporalFilter::UpTo(3000)).len(), dated);
        }
    }
}
