/// One screen of the formatting wizard, in the order the user walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    #[default]
    Upload,
    Branding,
    Preview,
    Processing,
    Result,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Upload,
        WizardStep::Branding,
        WizardStep::Preview,
        WizardStep::Processing,
        WizardStep::Result,
    ];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Upload => 0,
            WizardStep::Branding => 1,
            WizardStep::Preview => 2,
            WizardStep::Processing => 3,
            WizardStep::Result => 4,
        }
    }

    /// The step a completed `self` moves forward to.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Upload => Some(WizardStep::Branding),
            WizardStep::Branding => Some(WizardStep::Preview),
            WizardStep::Preview => Some(WizardStep::Processing),
            WizardStep::Processing => Some(WizardStep::Result),
            WizardStep::Result => None,
        }
    }

    /// Back-transition target. Only Branding and Preview can be left backwards.
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Branding => Some(WizardStep::Upload),
            WizardStep::Preview => Some(WizardStep::Branding),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload",
            WizardStep::Branding => "Branding",
            WizardStep::Preview => "Preview",
            WizardStep::Processing => "Processing",
            WizardStep::Result => "Result",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
