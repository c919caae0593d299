//! The application core: command dispatch and effect lifecycle.
//!
//! [`DeviceService`] owns the device state and the effect engine and is
//! driven entirely from the control loop. Inbound frames arrive through
//! [`handle_frame`](DeviceService::handle_frame); time advances through
//! [`tick`](DeviceService::tick). All hardware access goes through the
//! [`ActuatorPort`] passed in by the caller, so the whole service runs
//! unchanged against mocks in tests.

use log::{info, warn};

use crate::app::commands::{Command, CommandName, ParsedCommand};
use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::state::{Bedtime, DeviceState, SensorSnapshot};
use crate::config::SystemConfig;
use crate::effects::steps::{NIGHT_LIGHT_BRIGHTNESS, NIGHT_LIGHT_COLOR};
use crate::effects::{EffectEngine, EffectKind};
use crate::link::channels::FrameMsg;
use crate::link::engine as link_engine;

/// Command dispatch plus effect lifecycle, single-threaded.
pub struct DeviceService {
    cfg: SystemConfig,
    state: DeviceState,
    engine: EffectEngine,
    last_sensors: SensorSnapshot,
}

impl DeviceService {
    pub fn new(cfg: SystemConfig) -> Self {
        Self {
            cfg,
            state: DeviceState::new(),
            engine: EffectEngine::new(),
            last_sensors: SensorSnapshot::default(),
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.cfg
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Latest unified sensor snapshot, stored by the polling path.
    pub fn update_sensors(&mut self, snapshot: SensorSnapshot) {
        self.last_sensors = snapshot;
    }

    /// Emit the periodic `sensor_data` record.
    pub fn emit_sensors(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Sensors(self.last_sensors));
    }

    /// Emit a `sound_event` record (cooldown already applied upstream).
    pub fn on_sound(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Sound);
    }

    /// Process one inbound frame end to end.
    ///
    /// Exactly one `Response` event is emitted per frame, valid or not;
    /// query commands additionally emit their snapshot after it.
    pub fn handle_frame(
        &mut self,
        msg: &FrameMsg,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match link_engine::decode(msg) {
            Ok(parsed) => self.dispatch(parsed, hw, sink),
            Err(failure) => {
                let message = link_engine::failure_message(&failure);
                warn!("CMD | rejected: {message}");
                respond(sink, failure.name, false, message);
            }
        }
    }

    fn dispatch(
        &mut self,
        parsed: ParsedCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let ParsedCommand { name, command } = parsed;
        info!("CMD | {}", name.as_str());

        let outcome = match command {
            Command::StartSunrise => self.start_effect(EffectKind::Sunrise, hw),
            Command::StartSunset => self.start_effect(EffectKind::Sunset, hw),
            Command::StartAlarm => self.start_effect(EffectKind::Alarm, hw),
            Command::StartRainbow => self.start_effect(EffectKind::Rainbow, hw),

            Command::StopAlarm => {
                if self.engine.active_kind() == Some(EffectKind::Alarm) {
                    self.engine.stop(&mut self.state, hw);
                    Ok("Alarm stopped".to_string())
                } else {
                    Err("No alarm active".to_string())
                }
            }

            Command::NightLight => {
                self.engine.stop(&mut self.state, hw);
                self.state.rgb.red = NIGHT_LIGHT_COLOR.0;
                self.state.rgb.green = NIGHT_LIGHT_COLOR.1;
                self.state.rgb.blue = NIGHT_LIGHT_COLOR.2;
                self.state.rgb.brightness = NIGHT_LIGHT_BRIGHTNESS;
                let (r, g, b) = self.state.rgb.scaled();
                hw.set_rgb(r, g, b);
                Ok("Night light on".to_string())
            }

            Command::SetRgb { r, g, b } => {
                self.engine.stop(&mut self.state, hw);
                self.state.rgb.red = r;
                self.state.rgb.green = g;
                self.state.rgb.blue = b;
                let (sr, sg, sb) = self.state.rgb.scaled();
                hw.set_rgb(sr, sg, sb);
                Ok(format!("Color set to ({r}, {g}, {b})"))
            }

            Command::SetBrightness { brightness } => {
                self.state.rgb.brightness = brightness;
                // Effects drive the LED directly; only the static
                // colour path re-applies.
                if !self.state.any_effect_active() {
                    let (r, g, b) = self.state.rgb.scaled();
                    hw.set_rgb(r, g, b);
                }
                Ok(format!("Brightness set to {brightness}"))
            }

            Command::EnableAlarm => {
                self.state.alarm_enabled = true;
                Ok("Alarm enabled".to_string())
            }

            Command::DisableAlarm => {
                self.state.alarm_enabled = false;
                if self.engine.active_kind() == Some(EffectKind::Alarm) {
                    self.engine.stop(&mut self.state, hw);
                }
                Ok("Alarm disabled".to_string())
            }

            Command::TestBuzzer {
                frequency,
                volume,
                duration_ms,
            } => {
                // The blocking tone would silence a sounding alarm.
                if self.engine.active_kind() == Some(EffectKind::Alarm) {
                    Err("Buzzer in use by alarm".to_string())
                } else {
                    hw.play_tone_blocking(frequency, volume, duration_ms);
                    Ok("Buzzer test complete".to_string())
                }
            }

            Command::GetStatus => Ok("ok".to_string()),
            Command::GetSensors => Ok("ok".to_string()),

            Command::StopAll => {
                self.engine.stop(&mut self.state, hw);
                Ok("All effects stopped".to_string())
            }

            Command::Reset => {
                self.engine.stop(&mut self.state, hw);
                self.state.alarm_enabled = false;
                Ok("Device reset".to_string())
            }

            Command::SetBedtime { hour, minute } => {
                self.state.bedtime = Some(Bedtime { hour, minute });
                Ok(format!("Bedtime set to {hour:02}:{minute:02}"))
            }
        };

        match outcome {
            Ok(message) => {
                respond(sink, name, true, message);
                // Query commands carry their payload after the ack.
                match command {
                    Command::GetStatus => sink.emit(&AppEvent::Status(self.state.status_report())),
                    Command::GetSensors => sink.emit(&AppEvent::Sensors(self.last_sensors)),
                    _ => {}
                }
            }
            Err(message) => {
                warn!("CMD | {} failed: {message}", name.as_str());
                respond(sink, name, false, message);
            }
        }
    }

    fn start_effect(
        &mut self,
        kind: EffectKind,
        hw: &mut impl ActuatorPort,
    ) -> core::result::Result<String, String> {
        match self.engine.start(kind, &self.cfg, &mut self.state, hw) {
            Ok(()) => Ok(format!("{} started", capitalized(kind))),
            Err(_) => Err(format!("{} already active", capitalized(kind))),
        }
    }

    /// Advance the active effect; natural completion emits a status record.
    pub fn tick(&mut self, delta_ms: u32, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if let Some(kind) = self.engine.tick(delta_ms, &self.cfg, &mut self.state, hw) {
            info!("STATE | {} finished", kind.name());
            sink.emit(&AppEvent::Status(self.state.status_report()));
        }
    }

    /// Bedtime reached: start the wind-down sunset.
    pub fn on_bedtime(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        info!("STATE | bedtime reached, starting sunset");
        if self
            .engine
            .start(EffectKind::Sunset, &self.cfg, &mut self.state, hw)
            .is_ok()
        {
            sink.emit(&AppEvent::Status(self.state.status_report()));
        }
    }
}

fn respond(sink: &mut impl EventSink, command: CommandName, success: bool, message: String) {
    sink.emit(&AppEvent::Response {
        command,
        success,
        message,
    });
}

fn capitalized(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::Sunrise => "Sunrise",
        EffectKind::Sunset => "Sunset",
        EffectKind::Alarm => "Alarm",
        EffectKind::Rainbow => "Rainbow",
    }
}
