use std::process;

use clap::Parser;

use session_enum::config::Args;
use session_enum::logging::init_logging;
use session_enum::run::run;
use session_enum::PlatformApi;

/// Display program banner
fn display_banner() {
    eprintln!(
        r"
  ___              _          ___
 / __| ___ ______ (_)___ _ _ | __|_ _ _  _ _ __
 \__ \/ -_|_-<_-< | / _ \ ' \| _|| ' \ || | '  \
 |___/\___/__/__/ |_\___/_||_|___|_||_\_,_|_|_|_|
"
    );
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    display_banner();

    if let Err(e) = init_logging(args.debug) {
        eprintln!("{:#}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args, PlatformApi::default()).await {
        eprintln!("Error during execution: {:#}", e);
        process::exit(1);
    }
}
