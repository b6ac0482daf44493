use serde::Serialize;

const LOW_BAND_CEILING: f64 = 2.5;
const HIGH_BAND_FLOOR: f64 = 4.5;

/// Aggregate view over every filled entry in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub gpa: f64,
    pub total_credits: u64,
    pub graded_credits: u64,
    pub su_count: usize,
    pub su_cap: usize,
    pub at_cap: bool,
}

impl Statistics {
    pub fn band(&self) -> GpaBand {
        GpaBand::classify(self.gpa)
    }

    pub fn su_remaining(&self) -> usize {
        self.su_cap.saturating_sub(self.su_count)
    }

    /// Credits of filled S/U entries; they count as workload only.
    pub fn exempt_credits(&self) -> u64 {
        self.total_credits.saturating_sub(self.graded_credits)
    }
}

/// Coarse classification used to colour the GPA readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GpaBand {
    Low,
    Normal,
    High,
}

impl GpaBand {
    pub fn classify(gpa: f64) -> Self {
        if gpa <= LOW_BAND_CEILING {
            GpaBand::Low
        } else if gpa >= HIGH_BAND_FLOOR {
            GpaBand::High
        } else {
            GpaBand::Normal
        }
    }
}
