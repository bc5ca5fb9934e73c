pub mod event;
pub mod prompt;
pub mod sequencer;
pub mod source;
