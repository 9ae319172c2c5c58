mod headless;
mod loop_handler;

pub use headless::{build_report, render_text, run_headless, HeadlessReport};
pub use loop_handler::run;
