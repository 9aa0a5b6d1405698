use serde::Serialize;

/// WhatsApp bridge connection state as shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Loading,
    Waiting,
    Connected,
    // Never produced by `advance`; the bridge has no way to report it yet.
    Disconnected,
    Unknown,
}

/// What a single status probe observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// JSON body with `status == "connected"`.
    Connected,
    /// Any other successful response, usually the HTML QR page.
    QrDisplayed,
    /// Transport failure or unreadable response.
    Failed,
}

impl ConnectionStatus {
    /// Next state after a probe. `Connected` is terminal.
    pub fn advance(self, outcome: ProbeOutcome) -> ConnectionStatus {
        if self.is_terminal() {
            return self;
        }
        match outcome {
            ProbeOutcome::Connected => ConnectionStatus::Connected,
            ProbeOutcome::QrDisplayed => ConnectionStatus::Waiting,
            ProbeOutcome::Failed => ConnectionStatus::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Loading => "Loading",
            ConnectionStatus::Waiting => "Waiting for scan",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Loading);
    }

    #[test]
    fn test_transitions() {
        let status = ConnectionStatus::Loading;
        let status = status.advance(ProbeOutcome::Failed);
        assert_eq!(status, ConnectionStatus::Unknown);
        let status = status.advance(ProbeOutcome::QrDisplayed);
        assert_eq!(status, ConnectionStatus::Waiting);
        let status = status.advance(ProbeOutcome::Connected);
        assert_eq!(status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_connected_is_terminal() {
        let status = ConnectionStatus::Connected.advance(ProbeOutcome::Failed);
        assert_eq!(status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_disconnected_is_never_produced() {
        let outcomes = [ProbeOutcome::Connected, ProbeOutcome::QrDisplayed, ProbeOutcome::Failed];
        let states = [
            ConnectionStatus::Loading,
            ConnectionStatus::Waiting,
            ConnectionStatus::Unknown,
        ];
        for state in states {
            for outcome in outcomes {
                assert_ne!(state.advance(outcome), ConnectionStatus::Disconnected);
            }
        }
    }
}
