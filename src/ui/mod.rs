pub mod controls;
pub mod panels;
pub mod plot;
