pub mod catalog;
pub mod config;
pub mod errors;
pub mod executor;
pub mod llm;
pub mod logging;
pub mod packager;
pub mod pipeline;
pub mod planner;
pub mod synthesis;
pub mod ui;
pub mod util;
pub mod validator;

pub use autocoder_common as common;
