pub mod charts;
pub mod dashboard;
pub mod map;
pub mod metrics;
pub mod panels;
pub mod table;
