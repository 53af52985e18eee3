use crate::capture::reveni::{determine_target_column, parse_line};
use crate::readings::ladder::append_sample;
use crate::readings::model::{Reading, SampleColumn};

/// Caller-side state of a live capture run: which speed receives the next
/// instrument line, and an optional manual choice of column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveCapture {
    pub selected_id: Option<String>,
    pub manual_target: Option<SampleColumn>,
}

impl LiveCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected_id = Some(id.into());
    }

    pub fn set_manual_target(&mut self, column: SampleColumn) {
        self.manual_target = Some(column);
    }

    pub fn clear_manual_target(&mut self) {
        self.manual_target = None;
    }

    pub fn target_column(&self, readings: &[Reading], before_after: bool) -> SampleColumn {
        self.manual_target
            .unwrap_or_else(|| determine_target_column(readings, before_after))
    }

    /// Parse one instrument line and append its value to the selected speed.
    /// Returns `None` when the line is not a tester line or nothing is selected.
    pub fn accept_line(
        &self,
        readings: &[Reading],
        line: &str,
        before_after: bool,
    ) -> Option<Vec<Reading>> {
        let value = parse_line(line)?;
        let id = self.selected_id.as_deref()?;
        if !readings.iter().any(|r| r.id == id) {
            tracing::warn!("live capture: selected reading {} is gone", id);
            return None;
        }
        let column = self.target_column(readings, before_after);
        tracing::debug!("live capture: {} -> {} {:?}", value, id, column);
        Some(append_sample(readings, id, column, value))
    }

    /// Move the selection to the next speed; stays put on the last one.
    pub fn advance(&mut self, readings: &[Reading]) {
        let Some(current) = self.selected_id.as_deref() else {
            return;
        };
        let next = readings
            .iter()
            .position(|r| r.id == current)
            .and_then(|index| readings.get(index + 1));
        if let Some(next) = next {
            self.selected_id = Some(next.id.clone());
        }
    }

    pub fn selected_sample_count(&self, readings: &[Reading], before_after: bool) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        let reading = readings.iter().find(|r| r.id == id)?;
        Some(reading.samples(self.target_column(readings, before_after)).len())
    }
}
