//! Windowed view over the filtered trips, newest first.

use serde::Serialize;
use tracing::debug;

use crate::error::PagerError;
use crate::filter::FilteredDataset;
use crate::record::Trip;

pub const WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PagerState {
    /// Constructed, nothing shown yet.
    Idle,
    /// At least one window shown, more remain.
    Paging,
    Exhausted,
    Cancelled,
}

impl PagerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PagerState::Exhausted | PagerState::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerSignal {
    Show,
    Continue,
    Stop,
}

/// One slice of at most [`WINDOW_SIZE`] trips.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<'a> {
    /// Position of the first trip in the sorted sequence.
    pub offset: usize,
    pub trips: Vec<&'a Trip>,
}

impl Window<'_> {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Pages through a dataset sorted by start time, most recent first.
///
/// `Show` starts paging from `Idle`, `Continue` emits the next window while
/// `Paging`, and `Stop` cancels while `Paging`. The cursor never moves back.
#[derive(Debug)]
pub struct RawDataPager<'a> {
    rows: Vec<&'a Trip>,
    cursor: usize,
    state: PagerState,
}

impl<'a> RawDataPager<'a> {
    pub fn new(dataset: &'a FilteredDataset) -> Self {
        let mut rows: Vec<&Trip> = dataset.trips().iter().collect();
        // sort_by is stable, so equal start times keep dataset order
        rows.sort_by(|a, b| b.start_time().cmp(&a.start_time()));

        Self {
            rows,
            cursor: 0,
            state: PagerState::Idle,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Applies a signal. `Show` and `Continue` return the emitted window.
    pub fn signal(&mut self, signal: PagerSignal) -> Result<Option<Window<'a>>, PagerError> {
        match (self.state, signal) {
            (PagerState::Idle, PagerSignal::Show) | (PagerState::Paging, PagerSignal::Continue) => {
                Ok(Some(self.emit()))
            }
            (PagerState::Paging, PagerSignal::Stop) => {
                self.state = PagerState::Cancelled;
                debug!(cursor = self.cursor, "Paging cancelled");
                Ok(None)
            }
            (state, signal) => Err(PagerError { state, signal }),
        }
    }

    pub fn show(&mut self) -> Result<Window<'a>, PagerError> {
        self.expect_window(PagerSignal::Show)
    }

    pub fn advance(&mut self) -> Result<Window<'a>, PagerError> {
        self.expect_window(PagerSignal::Continue)
    }

    pub fn stop(&mut self) -> Result<(), PagerError> {
        self.signal(PagerSignal::Stop).map(|_| ())
    }

    fn expect_window(&mut self, signal: PagerSignal) -> Result<Window<'a>, PagerError> {
        let state = self.state;
        self.signal(signal)?.ok_or(PagerError { state, signal })
    }

    fn emit(&mut self) -> Window<'a> {
        let offset = self.cursor;
        if offset >= self.rows.len() {
            self.state = PagerState::Exhausted;
            return Window {
                offset,
                trips: Vec::new(),
            };
        }

        let end = (offset + WINDOW_SIZE).min(self.rows.len());
        let trips = self.rows[offset..end].to_vec();
        self.cursor += WINDOW_SIZE;
        self.state = if self.cursor >= self.rows.len() {
            PagerState::Exhausted
        } else {
            PagerState::Paging
        };

        debug!(offset, shown = trips.len(), state = ?self.state, "Emitted window");
        Window { offset, trips }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::{at, record_at};
    use std::collections::BTreeSet;

    fn dataset(n: u32) -> FilteredDataset {
        let trips = (0..n)
            .map(|i| {
                let mut record = record_at(at(2017, 1, 1 + i % 28, i % 24));
                record.id = Some(i.to_string());
                Trip::new(record)
            })
            .collect();
        FilteredDataset::new(trips, BTreeSet::new())
    }

    #[test]
    fn test_twelve_rows_page_as_five_five_two() {
        let data = dataset(12);
        let mut pager = RawDataPager::new(&data);
        assert_eq!(pager.state(), PagerState::Idle);

        assert_eq!(pager.show().unwrap().len(), 5);
        assert_eq!(pager.state(), PagerState::Paging);
        assert_eq!(pager.advance().unwrap().len(), 5);
        assert_eq!(pager.state(), PagerState::Paging);

        let last = pager.advance().unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last.offset, 10);
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_empty_dataset_exhausts_on_first_show() {
        let data = dataset(0);
        let mut pager = RawDataPager::new(&data);

        let window = pager.show().unwrap();
        assert!(window.is_empty());
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_exact_multiple_exhausts_without_empty_window() {
        let data = dataset(5);
        let mut pager = RawDataPager::new(&data);

        assert_eq!(pager.show().unwrap().len(), 5);
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_stop_cancels() {
        let data = dataset(12);
        let mut pager = RawDataPager::new(&data);

        pager.show().unwrap();
        pager.stop().unwrap();
        assert_eq!(pager.state(), PagerState::Cancelled);
        assert!(pager.state().is_terminal());
        assert_eq!(
            pager.advance().unwrap_err(),
            PagerError {
                state: PagerState::Cancelled,
                signal: PagerSignal::Continue,
            }
        );
    }

    #[test]
    fn test_invalid_transitions() {
        let data = dataset(3);
        let mut pager = RawDataPager::new(&data);

        assert!(pager.advance().is_err());
        assert!(pager.stop().is_err());
        pager.show().unwrap();
        assert!(pager.show().is_err());
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_sorted_newest_first_and_stable() {
        let mut trips = Vec::new();
        for (id, day) in [("a", 1), ("b", 3), ("c", 3), ("d", 2)] {
            let mut record = record_at(at(2017, 1, day, 0));
            record.id = Some(id.to_string());
            trips.push(Trip::new(record));
        }
        let data = FilteredDataset::new(trips, BTreeSet::new());
        let mut pager = RawDataPager::new(&data);

        let ids: Vec<&str> = pager
            .show()
            .unwrap()
            .trips
            .iter()
            .map(|t| t.record().id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "c", "d", "a"]);
    }
}
