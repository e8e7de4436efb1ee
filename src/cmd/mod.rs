//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `run`           | `Run`                                              |
//! | `session`       | `Session`                                          |
//! | `plan`          | `Plan`                                             |
//! | `validate`      | `Validate`                                         |
//! | `templates`     | `Templates`                                        |
//! | `config`        | `Config`                                           |

pub mod config;
pub mod plan;
pub mod run;
pub mod session;
pub mod templates;
pub mod validate;

pub use config::cmd_config;
pub use plan::cmd_plan;
pub use run::{RunOptions, cmd_run};
pub use session::cmd_session;
pub use templates::cmd_templates;
pub use validate::cmd_validate;
