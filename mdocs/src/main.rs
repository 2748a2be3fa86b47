use color_eyre::eyre::{Context, Result};
use log::LevelFilter;
use mdocs::{
  cli::{Cli, Commands},
  commands,
};
use mdocs_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Init must not require an existing configuration.
  if let Commands::Init { output, force } = &cli.command {
    return commands::init(output, *force);
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  match &cli.command {
    Commands::Init { .. } => Ok(()),
    Commands::Versions => commands::versions(&config).map(|_| ()),
    Commands::Index { version, write } => {
      commands::index(&config, version, *write)
    },
    Commands::Build { version } => commands::build(&config, version),
    Commands::Section { version, slug } => {
      commands::section(&config, version, slug)
    },
    Commands::Compile { file, output } => {
      commands::compile(&config, file, output.as_deref())
    },
    Commands::Posts => commands::posts(&config),
  }
}
