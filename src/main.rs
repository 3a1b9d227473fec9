use clap::Parser;
use mutual_dissent::cli::{
    handle_ask, handle_config_init, handle_config_path, handle_config_show, handle_config_test,
    Cli, Commands, ConfigCommands,
};
use mutual_dissent::config::Config;
use mutual_dissent::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging);

    let result = match cli.command {
        Commands::Ask(args) => match config.validate() {
            Ok(()) => handle_ask(config, &args).await,
            Err(e) => Err(e.into()),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => handle_config_show(&config),
            ConfigCommands::Test => handle_config_test(config).await,
            ConfigCommands::Path => handle_config_path(),
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
