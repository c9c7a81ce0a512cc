/// The audio cue components.
pub mod audio;
/// The core clock components.
pub mod clock;
/// The control loop components.
pub mod control;
/// The presentation components.
pub mod display;
/// The time source components.
pub mod time_source;

/// The console components.
pub mod console;
