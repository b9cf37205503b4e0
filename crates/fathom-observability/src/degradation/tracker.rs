//! Record every degradation event: component, failure mode, fallback used, timestamp.

use std::collections::BTreeMap;

use fathom_core::models::DegradationEvent;

/// Collects the degradation events of one run and logs each as it arrives.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<DegradationEvent>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(&event);
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = DegradationEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn events(&self) -> &[DegradationEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event count per component.
    pub fn count_by_component(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.events {
            *counts.entry(e.component.clone()).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use fathom_core::models::Stage;

    use super::*;

    #[test]
    fn counts_per_component() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::new(Stage::Reranking, "timeout", "fused order"));
        tracker.record(DegradationEvent::new(Stage::Reranking, "bad json", "fused order"));
        tracker.record(DegradationEvent::new(Stage::Planning, "bad json", "question only"));
        let counts = tracker.count_by_component();
        assert_eq!(counts.get("reranking"), Some(&2));
        assert_eq!(counts.get("planning"), Some(&1));
        assert_eq!(tracker.events().len(), 3);
    }
}
