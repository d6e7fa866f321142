pub mod derived;
pub mod generator;
pub mod kpi;
