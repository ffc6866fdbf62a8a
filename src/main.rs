use clap::Parser;
use env_logger::{Builder, Env};
use ldpc_8023an::cli::{Args, Run};
use std::error::Error;

#[termination::display]
fn main() -> Result<(), Box<dyn Error>> {
    let env = Env::default().default_filter_or("info");
    let _ = Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
    Args::parse().run()
}
