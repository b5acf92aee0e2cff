use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use thetagang_feeds::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::{feeds, trades},
    provider::{DatabasePool, HTTP},
};

#[tokio::main]
async fn main() -> ExitCode {
    match app_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        },
    }
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let (config, database) = init().await?;

    let http = HTTP::new(config.clone())?;
    let state = State::new(config, database, http).await?;
    let app_state = AppState::new(state);

    let result = run(app_state.clone()).await;
    app_state.database.close().await;

    result
}

async fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}

async fn run(app_state: AppState<State>) -> Result<(), Error> {
    trades::fetch_insert(app_state.clone()).await?;

    let count = app_state.database.trade.count().await?;
    println!("{}", count);

    let paths = feeds::publish_all(&app_state).await?;
    info!("Published {} feed(s)", paths.len());

    Ok(())
}
