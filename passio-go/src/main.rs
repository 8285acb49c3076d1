//! Command-line client for the Passio GO transit API.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use passio_go::api::{FixtureTransport, PassioClient, PassioConfig, PassioError, Transport};
use passio_go::domain::{RouteId, SystemId, Vehicle, with_valid_coordinates};
use passio_go::export::{MarkdownOptions, systems_markdown};
use passio_go::wiring::vehicles_on_route;

#[derive(Parser)]
#[command(name = "passio-go")]
#[command(about = "Query the Passio GO transit API", long_about = None)]
struct Cli {
    /// API base URL [env: PASSIO_BASE_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds [env: PASSIO_TIMEOUT_SECS]
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Serve responses from a fixture directory instead of the network
    #[arg(long, global = true, value_name = "DIR")]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every transit system as markdown
    Systems {
        /// Omit the trailing <br/> on each line
        #[arg(long)]
        no_html_breaks: bool,
    },
    /// Show one transit system
    System {
        #[arg(value_name = "SYSTEM_ID")]
        id: u32,
    },
    /// List a system's routes
    Routes {
        #[arg(value_name = "SYSTEM_ID")]
        system: u32,
    },
    /// List a system's stops, or one route's stops in order
    Stops {
        #[arg(value_name = "SYSTEM_ID")]
        system: u32,

        /// Only stops on this route, in traversal order
        #[arg(short, long)]
        route: Option<String>,
    },
    /// List a system's vehicles
    Vehicles {
        #[arg(value_name = "SYSTEM_ID")]
        system: u32,

        /// Only vehicles on this route
        #[arg(short, long)]
        route: Option<String>,

        /// Only vehicles reporting a valid position
        #[arg(long)]
        located: bool,
    },
    /// List a system's service alerts
    Alerts {
        #[arg(value_name = "SYSTEM_ID")]
        system: u32,
    },
    /// Poll a system's vehicles at a fixed interval
    Watch {
        #[arg(value_name = "SYSTEM_ID")]
        system: u32,

        /// Only vehicles on this route
        #[arg(short, long)]
        route: Option<String>,

        /// Seconds between polls
        #[arg(short, long, default_value_t = 15)]
        interval: u64,

        /// Number of polls to run (0 = until interrupted)
        #[arg(short = 'n', long, default_value_t = 0)]
        count: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("passio_go=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config(&cli);

    let result = match cli.fixtures {
        Some(dir) => FixtureTransport::from_dir(&dir)
            .map_err(PassioError::from)
            .and_then(|transport| run(&PassioClient::with_transport(transport), cli.command)),
        None => PassioClient::new(&config).and_then(|client| run(&client, cli.command)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

/// Client configuration from flags, then environment, then defaults.
fn config(cli: &Cli) -> PassioConfig {
    let mut config = PassioConfig::new();

    if let Some(url) = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("PASSIO_BASE_URL").ok())
    {
        config = config.with_base_url(url);
    }

    let timeout = cli.timeout.or_else(|| {
        let raw = std::env::var("PASSIO_TIMEOUT_SECS").ok()?;
        match raw.parse() {
            Ok(secs) => Some(secs),
            Err(_) => {
                warn!(value = %raw, "ignoring invalid PASSIO_TIMEOUT_SECS");
                None
            }
        }
    });
    if let Some(secs) = timeout {
        config = config.with_timeout(secs);
    }

    config
}

fn run<T: Transport>(client: &PassioClient<T>, command: Commands) -> Result<(), PassioError> {
    match command {
        Commands::Systems { no_html_breaks } => {
            let systems = client.list_systems()?;
            let options = MarkdownOptions {
                html_breaks: !no_html_breaks,
            };
            print!("{}", systems_markdown(&systems, options));
        }
        Commands::System { id } => match client.system_by_id(SystemId::new(id))? {
            Some(system) => {
                println!("{} (#{})", system.name, system.id);
                if let Some(homepage) = &system.homepage {
                    println!("  homepage: {homepage}");
                }
                if let Some(email) = &system.support_email {
                    println!("  support:  {email}");
                }
            }
            None => println!("no system with id {id}"),
        },
        Commands::Routes { system } => {
            for route in client.routes(SystemId::new(system))? {
                let short = route.short_name.as_deref().unwrap_or("-");
                println!("{:>8}  {:<6} {}", route.id.as_str(), short, route.name);
            }
        }
        Commands::Stops { system, route } => {
            let network = client.stop_network(SystemId::new(system))?;
            let stops = match route {
                Some(route_id) => {
                    let route_id = RouteId::from(route_id);
                    let routes = client.routes(SystemId::new(system))?;
                    match routes.iter().find(|r| r.id == route_id) {
                        Some(route) => network.stops_for_route(route),
                        None => {
                            warn!(route = %route_id, "route not found");
                            Vec::new()
                        }
                    }
                }
                None => network.stops.iter().collect(),
            };
            for stop in stops {
                println!("{:>8}  {}", stop.id.as_str(), stop.name);
            }
        }
        Commands::Vehicles {
            system,
            route,
            located,
        } => {
            let vehicles = client.vehicles(SystemId::new(system))?;
            let mut shown: Vec<&Vehicle> = match &route {
                Some(route_id) => vehicles_on_route(&vehicles, &RouteId::from(route_id.as_str())),
                None => vehicles.iter().collect(),
            };
            if located {
                let with_position = with_valid_coordinates(&vehicles);
                shown.retain(|v| with_position.iter().any(|p| p.id == v.id));
            }
            for vehicle in shown {
                print_vehicle(vehicle);
            }
        }
        Commands::Alerts { system } => {
            for alert in client.system_alerts(SystemId::new(system))? {
                let marker = if alert.is_important() { "!" } else { " " };
                println!("{marker} {:>8}  {}", alert.id.as_str(), alert.name);
            }
        }
        Commands::Watch {
            system,
            route,
            interval,
            count,
        } => watch(client, SystemId::new(system), route.map(RouteId::from), interval, count),
    }

    Ok(())
}

/// Poll vehicles on a fixed timer. A failed poll is logged and the next tick
/// proceeds as normal.
fn watch<T: Transport>(
    client: &PassioClient<T>,
    system: SystemId,
    route: Option<RouteId>,
    interval: u64,
    count: usize,
) {
    let interval = Duration::from_secs(interval);
    let mut poll = 0usize;

    loop {
        poll += 1;
        match client.vehicles(system) {
            Ok(vehicles) => {
                let shown = match &route {
                    Some(route) => vehicles_on_route(&vehicles, route),
                    None => vehicles.iter().collect(),
                };
                info!(%system, poll, vehicles = shown.len(), "polled vehicles");
                for vehicle in shown {
                    print_vehicle(vehicle);
                }
            }
            Err(e) => warn!(%system, poll, error = %e, "poll failed"),
        }

        if count != 0 && poll >= count {
            break;
        }
        thread::sleep(interval);
    }
}

fn print_vehicle(vehicle: &Vehicle) {
    let position = match (vehicle.latitude, vehicle.longitude) {
        (Some(lat), Some(lon)) => format!("{lat:.5},{lon:.5}"),
        _ => "no position".to_string(),
    };
    let route = vehicle
        .route_name
        .as_deref()
        .or(vehicle.route_id.as_ref().map(RouteId::as_str))
        .unwrap_or("-");
    let heading = vehicle
        .heading
        .map(|h| format!("{h:.0}°"))
        .unwrap_or_default();

    println!("{:>8}  {:<20} {position} {heading}", vehicle.name, route);
}
