mod common;
mod detection;
mod service;
