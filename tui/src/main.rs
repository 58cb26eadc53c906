use clap::Parser;
use showroom_tui::Cli;
use showroom_tui::run_main;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli).await
}
