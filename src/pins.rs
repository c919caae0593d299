//! GPIO / peripheral pin assignments for the SleepSync pebble board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// RGB LED (common-cathode, one LEDC channel per colour)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 10;
pub const LED_G_GPIO: i32 = 11;
pub const LED_B_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo, driven by a variable-frequency LEDC timer)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 19;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Photoresistor voltage divider.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const LIGHT_ADC_GPIO: i32 = 1;
/// ADC1 channel index for the photoresistor.
pub const LIGHT_ADC_CHANNEL: u32 = 0;
/// ADC attenuation for the photoresistor (11 dB → 0 – 3.1 V range).
pub const LIGHT_ADC_ATTEN: u32 = 3; // esp_idf_hal::adc::attenuation::DB_11

// ---------------------------------------------------------------------------
// Sensors — Digital
// ---------------------------------------------------------------------------

/// Sound detector module — digital comparator output, HIGH on sound.
pub const SOUND_GPIO: i32 = 3;

/// DHT11 temperature / humidity sensor — single-wire, open-drain style
/// protocol.  Direction is switched at runtime by the climate driver.
pub const DHT_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the RGB LED channels (5 kHz — flicker-free).
pub const LED_PWM_FREQ_HZ: u32 = 5_000;
/// Initial LEDC frequency for the buzzer timer.  The buzzer driver
/// retunes this timer per note.
pub const BUZZER_PWM_FREQ_HZ: u32 = 2_000;

/// LEDC timer 0 — dedicated to the buzzer so retuning a note never
/// disturbs the LED channels.
pub const BUZZER_LEDC_TIMER: u32 = 0;
/// LEDC timer 1 — shared by the three LED channels.
pub const LED_LEDC_TIMER: u32 = 1;

/// LEDC channel assignments.
pub const BUZZER_LEDC_CHANNEL: u32 = 0;
pub const LED_R_LEDC_CHANNEL: u32 = 1;
pub const LED_G_LEDC_CHANNEL: u32 = 2;
pub const LED_B_LEDC_CHANNEL: u32 = 3;
