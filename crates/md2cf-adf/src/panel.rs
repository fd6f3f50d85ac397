//! Confluence panel types and their GFM alert counterparts.
//!
//! | GFM alert     | Panel type |
//! |---------------|------------|
//! | `[!NOTE]`      | `info`     |
//! | `[!TIP]`       | `success`  |
//! | `[!IMPORTANT]` | `note`     |
//! | `[!WARNING]`   | `warning`  |
//! | `[!CAUTION]`   | `error`    |

/// Confluence panel color (`attrs.panelType` of a `panel` node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelType {
    #[default]
    Info,
    Success,
    Note,
    Warning,
    Error,
}

impl PanelType {
    /// All panel types.
    pub const ALL: [Self; 5] = [
        Self::Info,
        Self::Success,
        Self::Note,
        Self::Warning,
        Self::Error,
    ];

    /// Parse the ADF `panelType` attribute value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "note" => Some(Self::Note),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// ADF `panelType` attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Panel type for a GFM alert name (`NOTE`, `tip`, ...).
    #[must_use]
    pub fn from_alert(alert: &str) -> Option<Self> {
        AlertKind::parse(alert).map(Self::from)
    }

    /// GFM alert name for this panel type.
    #[must_use]
    pub fn alert(self) -> &'static str {
        AlertKind::from(self).as_str()
    }
}

/// GFM alert type (`> [!NOTE]`, `> [!TIP]`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// All alert kinds.
    pub const ALL: [Self; 5] = [
        Self::Note,
        Self::Tip,
        Self::Important,
        Self::Warning,
        Self::Caution,
    ];

    /// Parse an alert name, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    /// Upper-case alert name as written in Markdown.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Tip => "TIP",
            Self::Important => "IMPORTANT",
            Self::Warning => "WARNING",
            Self::Caution => "CAUTION",
        }
    }
}

impl From<AlertKind> for PanelType {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Note => Self::Info,
            AlertKind::Tip => Self::Success,
            AlertKind::Important => Self::Note,
            AlertKind::Warning => Self::Warning,
            AlertKind::Caution => Self::Error,
        }
    }
}

impl From<PanelType> for AlertKind {
    fn from(panel: PanelType) -> Self {
        match panel {
            PanelType::Info => Self::Note,
            PanelType::Success => Self::Tip,
            PanelType::Note => Self::Important,
            PanelType::Warning => Self::Warning,
            PanelType::Error => Self::Caution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_round_trips_through_alert() {
        for panel in PanelType::ALL {
            assert_eq!(PanelType::from_alert(panel.alert()), Some(panel));
        }
    }

    #[test]
    fn test_alert_round_trips_through_panel() {
        for kind in AlertKind::ALL {
            assert_eq!(AlertKind::from(PanelType::from(kind)), kind);
        }
    }

    #[test]
    fn test_panel_parse_round_trips_as_str() {
        for panel in PanelType::ALL {
            assert_eq!(PanelType::parse(panel.as_str()), Some(panel));
        }
        assert_eq!(PanelType::parse("custom"), None);
    }

    #[test]
    fn test_alert_mapping() {
        assert_eq!(PanelType::from_alert("NOTE"), Some(PanelType::Info));
        assert_eq!(PanelType::from_alert("TIP"), Some(PanelType::Success));
        assert_eq!(PanelType::from_alert("IMPORTANT"), Some(PanelType::Note));
        assert_eq!(PanelType::from_alert("WARNING"), Some(PanelType::Warning));
        assert_eq!(PanelType::from_alert("CAUTION"), Some(PanelType::Error));
    }

    #[test]
    fn test_alert_parse_ignores_case() {
        assert_eq!(AlertKind::parse("warning"), Some(AlertKind::Warning));
        assert_eq!(AlertKind::parse("Tip"), Some(AlertKind::Tip));
        assert_eq!(AlertKind::parse("DANGER"), None);
    }

    #[test]
    fn test_default_panel_is_info() {
        assert_eq!(PanelType::default(), PanelType::Info);
        assert_eq!(PanelType::default().alert(), "NOTE");
    }
}
