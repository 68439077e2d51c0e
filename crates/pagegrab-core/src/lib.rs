pub mod config;
pub mod logging;

pub mod capture;
pub mod downloader;
pub mod extract;
pub mod http;
pub mod progress;
pub mod report;
pub mod storage;
pub mod url_model;
