use strum::{Display, EnumIter, IntoStaticStr};

/// The metric a raw event contributes to, named by its payload key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, IntoStaticStr)]
pub enum MetricKind {
    #[strum(serialize = "deployment_frequency")]
    DeploymentFrequency,

    #[strum(serialize = "lead_time_for_changes")]
    LeadTimeForChanges,

    #[strum(serialize = "change_failure_rate")]
    ChangeFailureRate,
}

impl MetricKind {
    /// The JSON key under which this metric's payload appears in a raw event.
    #[must_use]
    pub fn payload_key(self) -> &'static str {
        self.into()
    }

    /// Prefix of the exported file names for this metric.
    #[must_use]
    pub const fn export_stem(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => "deployment_frequency",
            Self::LeadTimeForChanges => "lead_time",
            Self::ChangeFailureRate => "change_failure_rate",
        }
    }
}
