//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod controller;
pub mod motor;
pub mod position;
pub mod tick;

pub use buttons::buttons_task;
pub use controller::controller_task;
pub use motor::motor_task;
pub use position::position_task;
pub use tick::tick_task;
