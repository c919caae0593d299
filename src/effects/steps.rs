//! Colour step tables and presets for the light effects.
//!
//! Each long-running light effect is a finite ordered sequence of
//! colours; the engine divides the configured effect duration evenly
//! across the steps.  Tables are tuned by eye on the diffuser dome —
//! treat the exact values as product design, not math.

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Sunrise: black → ember red → amber → warm white.  The last step is
/// the colour the lamp stays on after natural completion.
pub const SUNRISE_STEPS: &[Rgb] = &[
    (5, 0, 0),
    (20, 2, 0),
    (50, 8, 0),
    (90, 20, 0),
    (130, 35, 2),
    (170, 55, 8),
    (200, 85, 20),
    (230, 120, 45),
    (250, 160, 90),
    (255, 200, 150),
];

/// Sunset: warm bright → deep red → dark.  Ends at black so natural
/// completion leaves the room dark.
pub const SUNSET_STEPS: &[Rgb] = &[
    (255, 180, 120),
    (230, 130, 60),
    (200, 95, 30),
    (170, 65, 12),
    (130, 40, 4),
    (90, 22, 0),
    (55, 10, 0),
    (25, 3, 0),
    (8, 0, 0),
    (0, 0, 0),
];

/// Number of hue-wheel steps in one rainbow sweep.
pub const RAINBOW_STEPS: usize = 96;

/// Hue wheel position → RGB.  Standard three-segment wheel: red→green,
/// green→blue, blue→red.
pub fn hue_wheel(pos: u8) -> Rgb {
    match pos {
        0..=84 => {
            let p = u16::from(pos) * 3;
            ((255 - p.min(255)) as u8, p.min(255) as u8, 0)
        }
        85..=169 => {
            let p = u16::from(pos - 85) * 3;
            (0, (255 - p.min(255)) as u8, p.min(255) as u8)
        }
        _ => {
            let p = u16::from(pos - 170) * 3;
            (p.min(255) as u8, 0, (255 - p.min(255)) as u8)
        }
    }
}

/// Colour of rainbow step `step` out of [`RAINBOW_STEPS`].
pub fn rainbow_color(step: usize) -> Rgb {
    let pos = ((step % RAINBOW_STEPS) * 255 / (RAINBOW_STEPS - 1)) as u8;
    hue_wheel(pos)
}

/// Night-light preset: dim warm amber, easy on dark-adapted eyes.
pub const NIGHT_LIGHT_COLOR: Rgb = (255, 147, 41);
pub const NIGHT_LIGHT_BRIGHTNESS: u8 = 40;

/// Milliseconds each step holds, given the total effect duration.
pub fn step_hold_ms(duration_secs: u32, steps: usize) -> u32 {
    (duration_secs * 1000 / steps.max(1) as u32).max(1)
}
