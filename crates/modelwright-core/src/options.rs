/// Settings shared by the builder and the default conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Name of the shadow property created for hierarchy discriminators
    pub(crate) discriminator_name: String,

    /// Maximum number of events dispatched by one outermost builder
    /// operation. `None` means unbounded.
    pub(crate) convention_event_limit: Option<usize>,

    /// Record a diagnostic when a convention's write is rejected by a
    /// higher-precedence configuration
    pub(crate) report_rejected_conventions: bool,
}

impl Options {
    pub fn discriminator_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.discriminator_name = name.into();
        self
    }

    pub fn convention_event_limit(&mut self, limit: impl Into<Option<usize>>) -> &mut Self {
        self.convention_event_limit = limit.into();
        self
    }

    pub fn report_rejected_conventions(&mut self, report: bool) -> &mut Self {
        self.report_rejected_conventions = report;
        self
    }

    pub fn get_discriminator_name(&self) -> &str {
        &self.discriminator_name
    }

    pub fn get_convention_event_limit(&self) -> Option<usize> {
        self.convention_event_limit
    }

    pub fn reports_rejected_conventions(&self) -> bool {
        self.report_rejected_conventions
    }
}

impl Default for Options {
    fn default() -> Options {
        Options {
            discriminator_name: "Discriminator".to_string(),
            convention_event_limit: None,
            report_rejected_conventions: true,
        }
    }
}
