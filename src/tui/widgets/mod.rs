pub mod cycle;
pub mod header;
pub mod recent;
pub mod statusbar;
pub mod streak;
pub mod week;
