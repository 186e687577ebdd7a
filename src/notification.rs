//! Non-fatal diagnostics collected while reading or writing OCAD files.
//!
//! Damaged offsets, dangling symbol references and values that do not fit
//! the target version are recorded here instead of failing the whole
//! operation. After a read the caller inspects [`MapDocument::notifications`],
//! after a write [`OcadWriter::notifications`].
//!
//! [`MapDocument::notifications`]: crate::document::MapDocument::notifications
//! [`OcadWriter::notifications`]: crate::io::ocad::OcadWriter::notifications

use crate::error::OcadError;
use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A record kind the codec does not model.
    NotImplemented,
    /// Feature exists but cannot be represented in the target version.
    NotSupported,
    /// Data was adjusted (clamped id, fallback color, dropped reference).
    Warning,
    /// Structure damage that was recovered from.
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::NotSupported => write!(f, "NotSupported"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }

    /// Classify a tolerated codec error.
    pub fn from_error(err: &OcadError) -> Self {
        let notification_type = match err {
            OcadError::MalformedStructure(_) => NotificationType::Error,
            OcadError::BufferCapacityExceeded { .. } => NotificationType::NotSupported,
            _ => NotificationType::Warning,
        };
        Self::new(notification_type, err.to_string())
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification and mirror it to the log.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: {}", notification_type, message);
        self.items.push(Notification::new(notification_type, message));
    }

    /// Record a tolerated error.
    pub fn notify_error(&mut self, err: &OcadError) {
        let n = Notification::from_error(err);
        log::warn!("{}", n);
        self.items.push(n);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Whether any message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.items.iter().any(|n| n.message.contains(needle))
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ------------------------------------------------------------------
// Read diagnostics
// ------------------------------------------------------------------

/// Diagnostics surfaced to the caller after a read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadDiagnostics {
    /// Fonts used by text objects that are not installed, sorted.
    pub missing_fonts: Vec<String>,
    /// One message per distinct reason, with an occurrence count.
    pub non_renderable: Vec<String>,
}

impl ReadDiagnostics {
    pub fn is_empty(&self) -> bool {
        self.missing_fonts.is_empty() && self.non_renderable.is_empty()
    }
}

/// Accumulates diagnostics while a file is read.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticsCollector {
    missing_fonts: std::collections::BTreeSet<String>,
    // key -> count, in first-seen order
    non_renderable: indexmap::IndexMap<String, usize>,
}

impl DiagnosticsCollector {
    pub(crate) fn missing_font(&mut self, name: &str) {
        if !self.missing_fonts.contains(name) {
            self.missing_fonts.insert(name.to_string());
        }
    }

    /// Count one object that cannot be rendered for `reason`.
    /// `symbol` is `(id, name)` of the definition involved, if any.
    pub(crate) fn not_renderable(&mut self, reason: &str, symbol: Option<(&str, &str)>) {
        let key = match symbol {
            Some((id, name)) => format!("{} ({}:{}, ", reason, id, name),
            None => format!("{} (", reason),
        };
        *self.non_renderable.entry(key).or_insert(0) += 1;
    }

    pub(crate) fn finish(self) -> ReadDiagnostics {
        ReadDiagnostics {
            missing_fonts: self.missing_fonts.into_iter().collect(),
            non_renderable: self
                .non_renderable
                .into_iter()
                .map(|(key, n)| {
                    format!("{}{} object{})", key, n, if n == 1 { "" } else { "s" })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.notify(NotificationType::Warning, "color 12 missing");
        c.notify(NotificationType::Error, "block at 9999 outside file");
        c.notify(NotificationType::Warning, "id clamped");

        assert_eq!(c.len(), 3);
        assert_eq!(c.of_type(NotificationType::Warning).len(), 2);
        assert!(c.has_type(NotificationType::Error));
        assert!(!c.has_type(NotificationType::NotImplemented));
        assert!(c.mentions("clamped"));
    }

    #[test]
    fn test_from_error_classification() {
        let n = Notification::from_error(&OcadError::MalformedStructure("x".into()));
        assert_eq!(n.notification_type, NotificationType::Error);

        let n = Notification::from_error(&OcadError::NumericOverflow("id".into()));
        assert_eq!(n.notification_type, NotificationType::Warning);
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::NotSupported, "irregular pattern");
        assert_eq!(format!("{}", n), "[NotSupported] irregular pattern");
    }

    #[test]
    fn test_diagnostics_deduplicated_with_counts() {
        let mut d = DiagnosticsCollector::default();
        d.not_renderable("OCAD 12 feature: opacity", None);
        d.not_renderable("OCAD 12 feature: opacity", None);
        d.not_renderable("Line symbol with decreasing symbols", Some(("102.0", "Cliff")));
        d.missing_font("Zapf");
        d.missing_font("Arial Narrow");
        d.missing_font("Zapf");

        let out = d.finish();
        assert_eq!(out.missing_fonts, vec!["Arial Narrow".to_string(), "Zapf".to_string()]);
        assert_eq!(
            out.non_renderable,
            vec![
                "OCAD 12 feature: opacity (2 objects)".to_string(),
                "Line symbol with decreasing symbols (102.0:Cliff, 1 object)".to_string(),
            ]
        );
    }
}
