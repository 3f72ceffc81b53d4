use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = lounge_viz::config::Config::parse();
    lounge_viz::app::run(cfg)
}
