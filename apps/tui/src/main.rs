use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use rider_dash::api::HttpClient;
use rider_dash::app::App;
use rider_dash::cli::CliArgs;
use rider_dash::{config, event, logging, terminal};
use rider_dash_core::{Dashboard, TabId};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let settings = config::load(&args)?;

    let tab = match args.tab.as_deref() {
        Some(name) => TabId::parse(name).ok_or_else(|| {
            eyre!(
                "unknown tab {name:?}; expected one of: {}",
                TabId::ALL.map(TabId::as_str).join(", ")
            )
        })?,
        None => TabId::Demand,
    };

    let client = HttpClient::new(settings.dashboard.api_base.clone(), settings.timeout)
        .wrap_err("failed to build HTTP client")?;
    let mut dashboard = Dashboard::new(settings.dashboard.clone());

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        logging::init_stderr(settings.debug)?;
        info!(api = %client.base(), tab = tab.as_str(), "running headless");
        return event::run_headless(&mut dashboard, &client, tab, args.city.as_deref(), args.json).await;
    }

    logging::init_file(&settings.log_file, settings.debug)?;
    info!(api = %client.base(), "starting terminal dashboard");

    let mut app = App::new(dashboard, client).with_city(args.city.clone());

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app, tab);
    terminal::cleanup_terminal_state(true, true);
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
