pub mod diagnosis;
pub mod wait_times;
