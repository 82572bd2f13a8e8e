//! County lookup by name with an optional state filter.
//!
//! Names compare with ASCII case folding only. The first matching record in
//! table order wins.

use std::collections::HashMap;

use crate::table::CountyRecord;

/// Linear scan for `county`, restricted to `state` unless it is empty.
pub fn find<'a>(records: &'a [CountyRecord], county: &str, state: &str) -> Option<&'a CountyRecord> {
    records.iter().find(|r| {
        r.county.eq_ignore_ascii_case(county) && (state.is_empty() || r.state.eq_ignore_ascii_case(state))
    })
}

/// Hash index over a loaded table, answering the same queries as [`find`]
/// without scanning.
#[derive(Debug)]
pub struct TableIndex<'a> {
    records: &'a [CountyRecord],
    by_county: HashMap<String, usize>,
    by_county_state: HashMap<(String, String), usize>,
}

impl<'a> TableIndex<'a> {
    pub fn new(records: &'a [CountyRecord]) -> Self {
        let mut by_county = HashMap::new();
        let mut by_county_state = HashMap::new();

        for (i, r) in records.iter().enumerate() {
            let county = r.county.to_ascii_lowercase();
            by_county_state
                .entry((county.clone(), r.state.to_ascii_lowercase()))
                .or_insert(i);
            by_county.entry(county).or_insert(i);
        }

        Self { records, by_county, by_county_state }
    }

    pub fn find(&self, county: &str, state: &str) -> Option<&'a CountyRecord> {
        let county = county.to_ascii_lowercase();
        let idx = if state.is_empty() {
            self.by_county.get(&county)
        } else {
            self.by_county_state.get(&(county, state.to_ascii_lowercase()))
        }?;

        self.records.get(*idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(county: &str, state: &str) -> CountyRecord {
        CountyRecord {
            county: county.into(),
            state: state.into(),
            county_fips: String::new(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn oranges() -> Vec<CountyRecord> {
        vec![rec("Orange", "CA"), rec("orange", "FL"), rec("Kern", "CA")]
    }

    #[test]
    fn empty_state_returns_first_inserted_match() {
        let table = oranges();
        let found = find(&table, "Orange", "").unwrap();
        assert_eq!(found.state, "CA");

        let found = find(&table, "ORANGE", "").unwrap();
        assert!(std::ptr::eq(found, &table[0]));
    }

    #[test]
    fn state_filter_narrows_match() {
        let table = oranges();
        assert_eq!(find(&table, "Orange", "FL").unwrap().state, "FL");
        assert_eq!(find(&table, "orange", "fl").unwrap().county, "orange");
        assert!(find(&table, "Orange", "TX").is_none());
    }

    #[test]
    fn length_mismatch_never_matches() {
        let table = oranges();
        assert!(find(&table, "Orang", "").is_none());
        assert!(find(&table, "Oranges", "").is_none());
        assert!(find(&table, "Orange", "C").is_none());
    }

    #[test]
    fn unicode_is_not_case_folded() {
        let table = vec![rec("Doña Ana", "NM")];
        assert!(find(&table, "doña ana", "").is_some());
        assert!(find(&table, "DOÑA ANA", "").is_none());
    }

    #[test]
    fn empty_table_finds_nothing() {
        assert!(find(&[], "Orange", "").is_none());
    }

    #[test]
    fn every_record_finds_itself() {
        let table = oranges();
        for r in &table {
            let found = find(&table, &r.county, &r.state).expect("record must find itself");
            assert!(found.county.eq_ignore_ascii_case(&r.county));
            assert!(found.state.eq_ignore_ascii_case(&r.state));
        }
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let table = oranges();
        let index = TableIndex::new(&table);
        assert_eq!(index.len(), 3);

        for (county, state) in [
            ("Orange", ""),
            ("ORANGE", "fl"),
            ("Orange", "TX"),
            ("kern", ""),
            ("Kern", "FL"),
            ("Nowhere", ""),
        ] {
            assert_eq!(index.find(county, state), find(&table, county, state), "{county}/{state}");
        }
    }
}
