pub mod cli;
pub mod commands;
pub mod error;
pub mod mapper;
pub mod model;
pub mod reader;
pub mod sql;
pub mod util;
