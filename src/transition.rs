use crate::color::Rgb;

/// Number of waypoints in a colour transition
pub const TRANSITION_STEPS: usize = 50;

/// Interpolate one channel for waypoint `step` of `TRANSITION_STEPS`
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]
const fn ramp8(from: u8, to: u8, step: usize) -> u8 {
    let last = (TRANSITION_STEPS - 1) as i32;
    let delta = (to as i32 - from as i32) * step as i32;
    // Round half away from zero
    let offset = if delta >= 0 {
        (delta + last / 2) / last
    } else {
        (delta - last / 2) / last
    };
    (from as i32 + offset) as u8
}

/// Build an evenly spaced ramp from `from` to `to`.
///
/// The first waypoint equals `from` and the last equals `to`.
pub fn transition_table(from: Rgb, to: Rgb) -> [Rgb; TRANSITION_STEPS] {
    let mut table = [from; TRANSITION_STEPS];
    for (step, waypoint) in table.iter_mut().enumerate() {
        *waypoint = Rgb {
            r: ramp8(from.r, to.r, step),
            g: ramp8(from.g, to.g, step),
            b: ramp8(from.b, to.b, step),
        };
    }
    table
}

/// Colour fade walked one waypoint per tick
#[derive(Debug, Clone)]
pub struct ColourTransition {
    table: [Rgb; TRANSITION_STEPS],
    cursor: usize,
    complete: bool,
}

impl Default for ColourTransition {
    fn default() -> Self {
        Self {
            table: [Rgb::default(); TRANSITION_STEPS],
            cursor: 0,
            complete: true,
        }
    }
}

impl ColourTransition {
    /// Regenerate the table and rewind the cursor
    pub fn start(&mut self, from: Rgb, to: Rgb) {
        self.table = transition_table(from, to);
        self.cursor = 0;
        self.complete = false;
    }

    /// Take the next waypoint.
    ///
    /// Returns `None` once the final waypoint has been emitted, until the
    /// next [`start`](Self::start).
    pub fn advance(&mut self) -> Option<Rgb> {
        if self.complete {
            return None;
        }
        let waypoint = self.table[self.cursor];
        self.cursor += 1;
        if self.cursor >= TRANSITION_STEPS {
            self.complete = true;
            self.cursor = 0;
        }
        Some(waypoint)
    }

    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Waypoints of the current fade
    pub const fn table(&self) -> &[Rgb; TRANSITION_STEPS] {
        &self.table
    }
}
