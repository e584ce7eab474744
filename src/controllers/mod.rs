pub mod params;

pub mod home_controller;
pub mod account_controller;
pub mod operation_controller;
