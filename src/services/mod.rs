/// MPRIS media player control service
pub mod mpris;
/// Serial infrared remote input
pub mod remote;
