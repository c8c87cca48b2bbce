use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Rainbow palette (one colour per object)
// ---------------------------------------------------------------------------

/// `n` colours running from violet to red, evenly spaced in hue.
pub fn rainbow(n: usize) -> Vec<[u8; 3]> {
    match n {
        0 => Vec::new(),
        1 => vec![hue_to_rgb(270.0)],
        _ => (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                hue_to_rgb(270.0 * (1.0 - t))
            })
            .collect(),
    }
}

fn hue_to_rgb(hue: f32) -> [u8; 3] {
    let hsl = Hsl::new(hue, 0.85, 0.5);
    let rgb: Srgb = hsl.into_color();
    [
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

// ---------------------------------------------------------------------------
// Machine markers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Plus,
    Cross,
}

impl Marker {
    pub fn symbol(self) -> char {
        match self {
            Marker::Circle => 'o',
            Marker::Plus => '+',
            Marker::Cross => 'x',
        }
    }
}

const MACHINE_MARKERS: [Marker; 6] = [
    Marker::Circle,
    Marker::Plus,
    Marker::Cross,
    Marker::Circle,
    Marker::Circle,
    Marker::Circle,
];

/// Marker used for a machine's readings; repeats after the table runs out.
pub fn machine_marker(machine: usize) -> Marker {
    MACHINE_MARKERS[machine % MACHINE_MARKERS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rainbow_runs_violet_to_red() {
        let colors = rainbow(30);
        assert_eq!(colors.len(), 30);
        let first = colors[0];
        let last = colors[29];
        assert!(first[2] > first[1], "first colour should be violet: {first:?}");
        assert!(
            last[0] > 200 && last[1] < 40 && last[2] < 40,
            "last colour should be red: {last:?}"
        );
        assert!(rainbow(0).is_empty());
    }

    #[test]
    fn markers_follow_machine_order() {
        assert_eq!(machine_marker(0).symbol(), 'o');
        assert_eq!(machine_marker(1).symbol(), '+');
        assert_eq!(machine_marker(2).symbol(), 'x');
        assert_eq!(machine_marker(3), Marker::Circle);
        assert_eq!(machine_marker(7), Marker::Plus);
    }
}
