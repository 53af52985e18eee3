use serde::{Deserialize, Serialize};

/// One shutter-speed test point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: String,
    /// Nominal speed as entered: "1/1000" or whole seconds like "1".
    pub expected_time: String,
    pub before_samples: Vec<f64>,
    /// "After" samples, or the only samples when before/after mode is off.
    pub measurement_samples: Vec<f64>,
}

impl Reading {
    pub fn new(id: impl Into<String>, expected_time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expected_time: expected_time.into(),
            before_samples: Vec::new(),
            measurement_samples: Vec::new(),
        }
    }

    pub fn samples(&self, column: SampleColumn) -> &[f64] {
        match column {
            SampleColumn::Before => &self.before_samples,
            SampleColumn::Measurement => &self.measurement_samples,
        }
    }

    pub fn samples_mut(&mut self, column: SampleColumn) -> &mut Vec<f64> {
        match column {
            SampleColumn::Before => &mut self.before_samples,
            SampleColumn::Measurement => &mut self.measurement_samples,
        }
    }

    /// True when either column holds a sample; deleting such a reading needs confirmation.
    pub fn has_data(&self) -> bool {
        !self.before_samples.is_empty() || !self.measurement_samples.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleColumn {
    Before,
    Measurement,
}
