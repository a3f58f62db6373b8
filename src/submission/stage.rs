/// Progress of a single stage. Failures are reported for the whole
/// submission, so there is no failed state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageStatus {
    #[default]
    Pending,
    Running,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StageStatus,
}

pub const TRANSMIT: usize = 0;
pub const SERVER_PROCESSING: usize = 1;
pub const FORMATTING: usize = 2;
pub const OUTPUT_GENERATION: usize = 3;

const STAGES: [(&str, &str); 4] = [
    ("transmit", "Sending contract to the server"),
    ("server-processing", "Processing structure on the server"),
    ("formatting", "Applying formatting rules"),
    ("output-generation", "Generating output documents"),
];

/// The fixed, ordered list of submission stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageBoard {
    stages: Vec<Stage>,
}

impl StageBoard {
    pub fn new() -> Self {
        Self {
            stages: STAGES
                .iter()
                .map(|&(id, label)| Stage {
                    id,
                    label,
                    status: StageStatus::Pending,
                })
                .collect(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Mark a pending stage as running. Finished stages are left alone.
    pub fn start(&mut self, idx: usize) {
        if let Some(stage) = self.stages.get_mut(idx) {
            if stage.status == StageStatus::Pending {
                stage.status = StageStatus::Running;
            }
        }
    }

    pub fn succeed(&mut self, idx: usize) {
        if let Some(stage) = self.stages.get_mut(idx) {
            stage.status = StageStatus::Success;
        }
    }

    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.status = StageStatus::Pending;
        }
    }

    pub fn running(&self) -> Option<usize> {
        self.stages
            .iter()
            .position(|s| s.status == StageStatus::Running)
    }
}

#[cfg(test)]
impl StageBoard {
    fn all_pending(&self) -> bool {
        self.stages.iter().all(|s| s.status == StageStatus::Pending)
    }
}

impl Default for StageBoard {
    fn default() -> Self {
        Self::new()
    }
}
