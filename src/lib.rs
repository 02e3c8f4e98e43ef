pub mod logger;
pub mod models;
pub mod reporter;
pub mod runner;
pub mod storage;
pub mod ui;
pub mod visuals;
