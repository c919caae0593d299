//! Effect scheduler and tick-driven executors.
//!
//! At most one long-running effect exists at a time. `start` preempts
//! whatever is active (stop first, then start); starting the effect
//! that is already active is rejected instead of restarted. Effects
//! advance inside the control loop's tick, so no two executors can
//! ever overlap and [`DeviceState`] needs no locking.
//!
//! Executor lifecycle: `Idle → Running → {Completed, Cancelled}`.
//! Natural completion leaves the final step's outputs in place and is
//! reported to the caller (who emits a `device_status` record); the
//! stop/cancel path zeroes outputs and reports nothing further.
//!
//! Cancellation is cooperative: each executor holds a [`CancelToken`]
//! checked at every step boundary, so a stop lands within the current
//! step's remaining hold time.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use crate::app::ports::ActuatorPort;
use crate::app::state::DeviceState;
use crate::config::SystemConfig;
use crate::effects::alarm::AlarmRamp;
use crate::effects::steps::{
    self, RAINBOW_STEPS, Rgb, SUNRISE_STEPS, SUNSET_STEPS, step_hold_ms,
};
use crate::error::ConflictError;

/// The long-running effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Sunrise,
    Sunset,
    Alarm,
    Rainbow,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
            Self::Alarm => "alarm",
            Self::Rainbow => "rainbow",
        }
    }
}

/// Shared cancellation flag.  The scheduler signals it; the executor
/// observes it at step boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Where a running effect currently is.
#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Holding colour step `step` of the active table.
    Light { step: usize },
    /// Alarm tone sounding for cycle `cycle`.
    AlarmOn { cycle: u32 },
    /// Silent gap before cycle `cycle + 1`.
    AlarmOff { cycle: u32 },
}

struct ActiveEffect {
    kind: EffectKind,
    token: CancelToken,
    phase: Phase,
    /// Milliseconds accumulated inside the current phase.
    in_phase_ms: u32,
    /// Milliseconds since the effect started (alarm auto-stop).
    elapsed_ms: u64,
    ramp: AlarmRamp,
}

/// Single-active-effect scheduler plus the executors themselves.
pub struct EffectEngine {
    active: Option<ActiveEffect>,
}

impl EffectEngine {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Kind of the currently running effect, if any.
    pub fn active_kind(&self) -> Option<EffectKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    /// Start `kind`, preempting any other active effect.
    ///
    /// Re-starting the already-active kind is a [`ConflictError`]; the
    /// run in progress is left untouched.
    pub fn start(
        &mut self,
        kind: EffectKind,
        cfg: &SystemConfig,
        state: &mut DeviceState,
        hw: &mut impl ActuatorPort,
    ) -> Result<(), ConflictError> {
        if self.active_kind() == Some(kind) {
            return Err(ConflictError::AlreadyActive);
        }

        // Preemption: the old effect is fully stopped (outputs zeroed,
        // flags cleared) before the new one touches anything.
        self.stop(state, hw);

        let ramp = AlarmRamp::from_config(cfg);
        let phase = match kind {
            EffectKind::Alarm => Phase::AlarmOn { cycle: 0 },
            _ => Phase::Light { step: 0 },
        };

        match kind {
            EffectKind::Sunrise => state.sunrise_active = true,
            EffectKind::Sunset => state.sunset_active = true,
            EffectKind::Alarm => state.alarm_active = true,
            EffectKind::Rainbow => {} // predates the wire status flags
        }

        self.active = Some(ActiveEffect {
            kind,
            token: CancelToken::new(),
            phase,
            in_phase_ms: 0,
            elapsed_ms: 0,
            ramp,
        });

        // Apply the first step immediately rather than waiting a tick.
        match kind {
            EffectKind::Alarm => {
                let (freq, vol) = ramp.tone_at(0);
                state.alarm_frequency = freq;
                state.alarm_volume = vol;
                hw.set_tone(freq, vol);
            }
            _ => {
                let color = light_step_color(kind, 0);
                apply_color(state, hw, color);
            }
        }

        info!("STATE | effect {} started", kind.name());
        Ok(())
    }

    /// Stop whatever is active.  Idempotent: returns `false` (not an
    /// error) when nothing is running.  Outputs are zeroed as the
    /// final action.
    pub fn stop(&mut self, state: &mut DeviceState, hw: &mut impl ActuatorPort) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };

        active.token.cancel();
        state.clear_effect_flags();
        state.rgb.red = 0;
        state.rgb.green = 0;
        state.rgb.blue = 0;
        hw.all_off();

        info!("STATE | effect {} cancelled", active.kind.name());
        true
    }

    /// Advance the active effect by `delta_ms`.
    ///
    /// Returns `Some(kind)` exactly once, on natural completion; the
    /// caller reports it.  Cancelled runs return nothing (their state
    /// was already reset by the stop path).
    pub fn tick(
        &mut self,
        delta_ms: u32,
        cfg: &SystemConfig,
        state: &mut DeviceState,
        hw: &mut impl ActuatorPort,
    ) -> Option<EffectKind> {
        let active = self.active.as_mut()?;

        if active.token.is_cancelled() {
            // Stop path already zeroed outputs and flags.
            self.active = None;
            return None;
        }

        active.in_phase_ms += delta_ms;
        active.elapsed_ms += u64::from(delta_ms);

        match active.kind {
            EffectKind::Alarm => self.tick_alarm(cfg, state, hw),
            kind => self.tick_light(kind, cfg, state, hw),
        }
    }

    fn tick_light(
        &mut self,
        kind: EffectKind,
        cfg: &SystemConfig,
        state: &mut DeviceState,
        hw: &mut impl ActuatorPort,
    ) -> Option<EffectKind> {
        let total = light_step_count(kind);
        let hold = step_hold_ms(light_duration_secs(kind, cfg), total);

        loop {
            let active = self.active.as_mut()?;
            if active.in_phase_ms < hold {
                return None;
            }
            // Step boundary: honour cancellation before advancing.
            if active.token.is_cancelled() {
                self.active = None;
                return None;
            }
            active.in_phase_ms -= hold;

            let Phase::Light { step } = &mut active.phase else {
                return None;
            };
            *step += 1;

            if *step >= total {
                // Natural completion: outputs stay where the last
                // step put them, only the flag clears.
                state.clear_effect_flags();
                self.active = None;
                info!("STATE | effect {} completed", kind.name());
                return Some(kind);
            }

            let color = light_step_color(kind, *step);
            debug!("STATE | {} step {}/{}", kind.name(), *step + 1, total);
            apply_color(state, hw, color);
        }
    }

    fn tick_alarm(
        &mut self,
        cfg: &SystemConfig,
        state: &mut DeviceState,
        hw: &mut impl ActuatorPort,
    ) -> Option<EffectKind> {
        let active = self.active.as_mut()?;

        // Unattended alarms complete on the auto-stop cutoff.
        if active.elapsed_ms >= u64::from(cfg.alarm_auto_stop_secs) * 1000 {
            hw.buzzer_off();
            state.clear_effect_flags();
            self.active = None;
            info!("STATE | alarm auto-stopped");
            return Some(EffectKind::Alarm);
        }

        loop {
            let active = self.active.as_mut()?;
            let (phase_len, next) = match active.phase {
                Phase::AlarmOn { cycle } => (cfg.alarm_on_ms, Phase::AlarmOff { cycle }),
                Phase::AlarmOff { cycle } => (cfg.alarm_off_ms, Phase::AlarmOn { cycle: cycle + 1 }),
                Phase::Light { .. } => return None,
            };

            if active.in_phase_ms < phase_len {
                return None;
            }
            if active.token.is_cancelled() {
                self.active = None;
                return None;
            }
            active.in_phase_ms -= phase_len;
            active.phase = next;

            match next {
                Phase::AlarmOff { .. } => hw.buzzer_off(),
                Phase::AlarmOn { cycle } => {
                    let (freq, vol) = active.ramp.tone_at(cycle);
                    state.alarm_frequency = freq;
                    state.alarm_volume = vol;
                    hw.set_tone(freq, vol);
                }
                Phase::Light { .. } => {}
            }
        }
    }
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Step-table lookups ───────────────────────────────────────

fn light_step_count(kind: EffectKind) -> usize {
    match kind {
        EffectKind::Sunrise => SUNRISE_STEPS.len(),
        EffectKind::Sunset => SUNSET_STEPS.len(),
        EffectKind::Rainbow => RAINBOW_STEPS,
        EffectKind::Alarm => 0,
    }
}

fn light_step_color(kind: EffectKind, step: usize) -> Rgb {
    match kind {
        EffectKind::Sunrise => SUNRISE_STEPS[step.min(SUNRISE_STEPS.len() - 1)],
        EffectKind::Sunset => SUNSET_STEPS[step.min(SUNSET_STEPS.len() - 1)],
        EffectKind::Rainbow => steps::rainbow_color(step),
        EffectKind::Alarm => (0, 0, 0),
    }
}

fn light_duration_secs(kind: EffectKind, cfg: &SystemConfig) -> u32 {
    match kind {
        EffectKind::Sunrise => cfg.sunrise_duration_secs,
        EffectKind::Sunset => cfg.sunset_duration_secs,
        EffectKind::Rainbow => cfg.rainbow_duration_secs,
        EffectKind::Alarm => 0,
    }
}

/// Effects drive the LED at full brightness and mirror the colour into
/// the state so `device_status` reflects what the lamp shows.
fn apply_color(state: &mut DeviceState, hw: &mut impl ActuatorPort, color: Rgb) {
    state.rgb.red = color.0;
    state.rgb.green = color.1;
    state.rgb.blue = color.2;
    hw.set_rgb(color.0, color.1, color.2);
}

// ── Tests ────────────────────────────────────────────────────
