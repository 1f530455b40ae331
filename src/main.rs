use clap::Parser;
use feedbackd::{Cli, Config, run};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_path(path)?;
            config.apply_env_overrides();
            config
        }
        None => Config::load()?,
    };
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config))
}
