pub mod api;
pub mod db;
pub mod dialog;
pub mod model;
pub mod service;
pub mod table;
pub mod telemetry;
pub mod view;
