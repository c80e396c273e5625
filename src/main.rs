use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod http;
pub mod session;
pub mod workflow;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
