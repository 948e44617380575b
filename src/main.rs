use asg_target::cli::{
    handle_completions, handle_config_init, info, scale, status, Cli, Commands, ConfigCommands,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scale(args) => scale::run_scale(&args).await.map(|output| println!("{}", output)),
        Commands::Status(args) => status::run_status(&args)
            .await
            .map(|output| println!("{}", output)),
        Commands::Info(args) => info::handle_info(&args).map(|output| println!("{}", output)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
