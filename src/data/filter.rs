use std::collections::BTreeSet;

use crate::sim::ChromaticityPoint;

use super::model::RunRecord;

// ---------------------------------------------------------------------------
// Filter predicate: which machines and LEDs are shown
// ---------------------------------------------------------------------------

/// Selected machine and LED indices. A point is visible only when both its
/// machine and its LED are selected; an empty set hides everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointFilter {
    pub machines: BTreeSet<usize>,
    pub leds: BTreeSet<usize>,
}

impl PointFilter {
    /// Everything selected.
    pub fn all(record: &RunRecord) -> Self {
        Self {
            machines: record.machines(),
            leds: record.leds(),
        }
    }

    pub fn accepts(&self, point: &ChromaticityPoint) -> bool {
        self.machines.contains(&point.machine) && self.leds.contains(&point.led)
    }

    pub fn toggle_machine(&mut self, machine: usize) {
        toggle(&mut self.machines, machine);
    }

    pub fn toggle_led(&mut self, led: usize) {
        toggle(&mut self.leds, led);
    }
}

fn toggle(set: &mut BTreeSet<usize>, value: usize) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Return indices of points that pass the filter.
pub fn filtered_indices(points: &[ChromaticityPoint], filter: &PointFilter) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| filter.accepts(p))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(machine: usize, led: usize) -> ChromaticityPoint {
        ChromaticityPoint {
            machine,
            led,
            draw: 0,
            object: 0,
            object_height: 0.5,
            red_flux: 1.0,
            green_flux: 1.0,
            blue_flux: 1.0,
            r: 1.0 / 3.0,
            g: 1.0 / 3.0,
        }
    }

    fn record() -> RunRecord {
        RunRecord {
            points: vec![point(0, 0), point(0, 1), point(1, 0), point(1, 1)],
            ..Default::default()
        }
    }

    #[test]
    fn all_selected_shows_everything() {
        let rec = record();
        let filter = PointFilter::all(&rec);
        assert_eq!(filtered_indices(&rec.points, &filter), vec![0, 1, 2, 3]);
    }

    #[test]
    fn deselecting_a_machine_hides_its_points() {
        let rec = record();
        let mut filter = PointFilter::all(&rec);
        filter.toggle_machine(0);
        assert_eq!(filtered_indices(&rec.points, &filter), vec![2, 3]);
        filter.toggle_led(1);
        assert_eq!(filtered_indices(&rec.points, &filter), vec![2]);
        filter.toggle_machine(0);
        assert_eq!(filtered_indices(&rec.points, &filter), vec![0, 2]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let rec = record();
        let filter = PointFilter::default();
        assert!(filtered_indices(&rec.points, &filter).is_empty());
    }
}
