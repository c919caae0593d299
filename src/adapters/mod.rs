//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to                      |
//! |-------------|--------------|----------------------------------|
//! | `hardware`  | ActuatorPort | ESP32 LEDC PWM, GPIO             |
//! | `link_sink` | EventSink    | JSON records on the serial link  |
//! | `serial`    | Transport    | USB-Serial-JTAG / in-memory pipe |
//! | `time`      | —            | ESP32 system timer + wall clock  |

pub mod hardware;
pub mod link_sink;
pub mod serial;
pub mod time;
