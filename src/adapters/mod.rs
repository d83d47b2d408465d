//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                | Connects to             |
//! |------------|---------------------------|-------------------------|
//! | `hardware` | InputPort, LevelPort      | keypad ADC, sonar GPIO  |
//! |            | ActuatorPort, DisplayPort | pump relays, HD44780    |
//! | `time`     | ClockPort                 | ESP timer / std::time   |
//! | `log_sink` | EventSink                 | serial log output       |

pub mod hardware;
pub mod log_sink;
pub mod time;
