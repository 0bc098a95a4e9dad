//! The signal registry: in-memory state for one dashboard session.
//!
//! The registry is owned by the dashboard screen and never persisted.
//! Overrides are one-directional — nothing here sets a signal back to
//! red or yellow. Every mutation bumps a revision counter so the map
//! renderer can observe changes without callbacks.

use crate::model::{Signal, SignalStatus};

/// Errors that can occur when operating on the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("signal not found: {0}")]
    SignalNotFound(String),
}

pub type Result<T> = core::result::Result<T, RegistryError>;

/// Ordered collection of signals along the current route.
pub struct SignalRegistry {
    signals: Vec<Signal>,
    revision: u64,
}

impl SignalRegistry {
    pub fn new(signals: Vec<Signal>) -> Self {
        Self {
            signals,
            revision: 0,
        }
    }

    /// The fixed demo route: five signals in mixed states.
    pub fn with_demo_signals() -> Self {
        Self::new(vec![
            demo_signal("1", "Signal 1 - Main & First", SignalStatus::Red, "Main St & First Ave"),
            demo_signal("2", "Signal 2 - Central Plaza", SignalStatus::Yellow, "Central Plaza Intersection"),
            demo_signal("3", "Signal 3 - Hospital Rd", SignalStatus::Green, "Hospital Rd & Medical Blvd"),
            demo_signal("4", "Signal 4 - Downtown Core", SignalStatus::Red, "Downtown Core Junction"),
            demo_signal("5", "Signal 5 - Emergency Route", SignalStatus::Yellow, "Emergency Route Access"),
        ])
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Bumped on every mutation. The map renderer compares revisions to
    /// decide when to rebuild its markers.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Overrides ──

    /// Forces one signal to green, leaving every other field and every
    /// other signal untouched. Returns the display name of the signal
    /// for the override notification.
    pub fn override_to_green(&mut self, id: &str) -> Result<String> {
        let signal = self
            .signals
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| RegistryError::SignalNotFound(id.to_string()))?;
        signal.status = SignalStatus::Green;
        self.revision += 1;
        Ok(signal.name.clone())
    }

    /// Forces every signal to green, including ones already green.
    /// Idempotent.
    pub fn override_all_to_green(&mut self) {
        for signal in &mut self.signals {
            signal.status = SignalStatus::Green;
        }
        self.revision += 1;
    }

    // ── Derived values ──

    pub fn green_count(&self) -> usize {
        self.signals
            .iter()
            .filter(|s| s.status == SignalStatus::Green)
            .count()
    }

    /// Fraction of signals already green, for the progress gauge.
    /// An empty registry counts as fully cleared.
    pub fn completion(&self) -> f64 {
        if self.signals.is_empty() {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)] // Registry sizes are tiny.
        {
            self.green_count() as f64 / self.signals.len() as f64
        }
    }

    /// One-line route status shown under the progress gauge.
    pub fn status_summary(&self) -> String {
        let remaining = self.len() - self.green_count();
        if remaining == 0 {
            "All signals cleared for emergency passage".to_string()
        } else {
            format!("{remaining} signals need override")
        }
    }
}

fn demo_signal(id: &str, name: &str, status: SignalStatus, location: &str) -> Signal {
    Signal {
        id: id.to_string(),
        name: name.to_string(),
        status,
        location: location.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_changes_exactly_one_signal() {
        let mut registry = SignalRegistry::with_demo_signals();
        let before: Vec<SignalStatus> = registry.signals().iter().map(|s| s.status).collect();

        let name = registry.override_to_green("1").unwrap();
        assert_eq!(name, "Signal 1 - Main & First");

        for (i, signal) in registry.signals().iter().enumerate() {
            if signal.id == "1" {
                assert_eq!(signal.status, SignalStatus::Green);
            } else {
                assert_eq!(signal.status, before[i]);
            }
        }
    }

    #[test]
    fn override_leaves_other_fields_untouched() {
        let mut registry = SignalRegistry::with_demo_signals();
        let before = registry.signals()[3].clone();

        registry.override_to_green("4").unwrap();

        let after = &registry.signals()[3];
        assert_eq!(after.id, before.id);
        assert_eq!(after.name, before.name);
        assert_eq!(after.location, before.location);
    }

    #[test]
    fn override_unknown_id_fails_and_changes_nothing() {
        let mut registry = SignalRegistry::with_demo_signals();
        let before: Vec<Signal> = registry.signals().to_vec();
        let revision = registry.revision();

        let err = registry.override_to_green("99").unwrap_err();

        assert!(matches!(err, RegistryError::SignalNotFound(_)));
        assert_eq!(registry.signals(), before.as_slice());
        assert_eq!(registry.revision(), revision);
    }

    #[test]
    fn override_all_is_idempotent() {
        let mut registry = SignalRegistry::with_demo_signals();

        registry.override_all_to_green();
        let once: Vec<Signal> = registry.signals().to_vec();

        registry.override_all_to_green();
        assert_eq!(registry.signals(), once.as_slice());
        assert_eq!(registry.green_count(), registry.len());
    }

    #[test]
    fn demo_seed_has_one_green_signal() {
        let registry = SignalRegistry::with_demo_signals();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.green_count(), 1);
        assert_eq!(registry.status_summary(), "4 signals need override");
    }

    #[test]
    fn completion_tracks_green_fraction() {
        let mut registry = SignalRegistry::with_demo_signals();
        assert!((registry.completion() - 0.2).abs() < f64::EPSILON);

        registry.override_to_green("1").unwrap();
        assert!((registry.completion() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_is_one_exactly_when_all_cleared() {
        let mut registry = SignalRegistry::with_demo_signals();
        assert!(registry.completion() < 1.0);
        assert_ne!(
            registry.status_summary(),
            "All signals cleared for emergency passage"
        );

        registry.override_all_to_green();
        assert!((registry.completion() - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            registry.status_summary(),
            "All signals cleared for emergency passage"
        );
    }

    #[test]
    fn mutations_bump_the_revision() {
        let mut registry = SignalRegistry::with_demo_signals();
        assert_eq!(registry.revision(), 0);

        registry.override_to_green("2").unwrap();
        assert_eq!(registry.revision(), 1);

        registry.override_all_to_green();
        assert_eq!(registry.revision(), 2);
    }
}
