pub mod providers;
pub mod relay;
