pub mod loadout;
pub mod scavenge;
pub mod session;
pub mod store;
