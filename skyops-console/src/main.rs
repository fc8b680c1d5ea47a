mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyops_checkin::{CheckInSession, NewService, ServiceDesk};
use skyops_client::api::{
    AuthApi, FlightApi, FlightPayload, FlightRef, PassengerApi, PassengerPayload, ServiceApi,
};
use skyops_client::config::Config;
use skyops_client::wire::YesNo;
use skyops_client::{Credentials, HttpApi, TokenStore};
use skyops_core::filter::{CheckedFilter, FlagFilter};
use skyops_core::models::{MealKind, ServiceKind};
use skyops_core::seatmap::{classify, SeatState};

#[derive(Parser)]
#[command(name = "skyops", about = "Airline operations console", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        username: String,
        #[arg(long, env = "SKYOPS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Manage flights
    Flights {
        #[command(subcommand)]
        command: FlightsCommand,
    },
    /// Manage passengers
    Passengers {
        #[command(subcommand)]
        command: PassengersCommand,
    },
    /// Passenger check-in and seat assignment
    Checkin {
        #[command(subcommand)]
        command: CheckinCommand,
    },
    /// In-flight services and passenger links
    Services {
        #[command(subcommand)]
        command: ServicesCommand,
    },
}

#[derive(Subcommand)]
enum FlightsCommand {
    List,
    Add {
        #[arg(long)]
        number: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        departure: String,
        #[arg(long)]
        arrival: String,
        #[arg(long)]
        seats: i32,
        #[arg(long)]
        route: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        number: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        departure: String,
        #[arg(long)]
        arrival: String,
        #[arg(long)]
        seats: i32,
        #[arg(long)]
        route: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum PassengersCommand {
    /// All passengers, optionally narrowed to one flight
    List {
        #[arg(long)]
        flight: Option<i64>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        passport: String,
        #[arg(long)]
        dob: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "veg")]
        meal: String,
        #[arg(long, default_value = "no")]
        infant: FlagArg,
        #[arg(long, default_value = "no")]
        wheelchair: FlagArg,
        #[arg(long)]
        flight: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        passport: String,
        #[arg(long)]
        dob: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "veg")]
        meal: String,
        #[arg(long, default_value = "no")]
        infant: FlagArg,
        #[arg(long, default_value = "no")]
        wheelchair: FlagArg,
        #[arg(long)]
        flight: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum CheckinCommand {
    /// Show the roster and seat map for a flight
    Roster {
        #[arg(long)]
        flight: i64,
        #[arg(long)]
        wheelchair: Option<FlagArg>,
        #[arg(long)]
        infant: Option<FlagArg>,
        #[arg(long)]
        checked: Option<CheckedArg>,
        /// Highlight this passenger's seat in the map
        #[arg(long)]
        passenger: Option<i64>,
    },
    /// Assign a passenger to a seat
    Assign {
        #[arg(long)]
        flight: i64,
        #[arg(long)]
        passenger: i64,
        #[arg(long)]
        seat: i64,
    },
    /// Release whatever seat a passenger holds
    Release {
        #[arg(long)]
        flight: i64,
        #[arg(long)]
        passenger: i64,
    },
}

#[derive(Subcommand)]
enum ServicesCommand {
    List {
        #[arg(long)]
        flight: i64,
    },
    Add {
        #[arg(long)]
        flight: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        kind: KindArg,
        #[arg(long)]
        meal: Option<MealArg>,
        #[arg(long)]
        price: f64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        flight: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        kind: KindArg,
        #[arg(long)]
        meal: Option<MealArg>,
        #[arg(long)]
        price: f64,
    },
    Delete {
        id: i64,
    },
    /// Services linked to a passenger
    Linked {
        #[arg(long)]
        passenger: i64,
    },
    Link {
        #[arg(long)]
        passenger: i64,
        #[arg(long)]
        service: i64,
    },
    Unlink {
        #[arg(long)]
        passenger: i64,
        #[arg(long)]
        service: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FlagArg {
    Yes,
    No,
}

impl From<FlagArg> for FlagFilter {
    fn from(v: FlagArg) -> Self {
        match v {
            FlagArg::Yes => FlagFilter::Yes,
            FlagArg::No => FlagFilter::No,
        }
    }
}

impl From<FlagArg> for YesNo {
    fn from(v: FlagArg) -> Self {
        match v {
            FlagArg::Yes => YesNo::Yes,
            FlagArg::No => YesNo::No,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CheckedArg {
    In,
    Out,
}

impl From<CheckedArg> for CheckedFilter {
    fn from(v: CheckedArg) -> Self {
        match v {
            CheckedArg::In => CheckedFilter::In,
            CheckedArg::Out => CheckedFilter::Out,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Ancillary,
    Meal,
    Shopping,
}

impl From<KindArg> for ServiceKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Ancillary => ServiceKind::Ancillary,
            KindArg::Meal => ServiceKind::Meal,
            KindArg::Shopping => ServiceKind::Shopping,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MealArg {
    Veg,
    NonVeg,
    Jain,
    Vegan,
    GlutenFree,
}

impl From<MealArg> for MealKind {
    fn from(v: MealArg) -> Self {
        match v {
            MealArg::Veg => MealKind::Veg,
            MealArg::NonVeg => MealKind::NonVeg,
            MealArg::Jain => MealKind::Jain,
            MealArg::Vegan => MealKind::Vegan,
            MealArg::GlutenFree => MealKind::GlutenFree,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyops=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("failed to load config")?;
    tracing::info!(base_url = %config.api.base_url, "console starting");
    let tokens = Arc::new(TokenStore::at_path(config.auth.token_path.clone()));
    let api = Arc::new(HttpApi::new(&config.api, tokens.clone())?);

    match cli.command {
        Command::Login { username, password } => {
            let session = api.login(&Credentials { username, password }).await?;
            println!("logged in as {} ({})", session.user.username, session.user.role);
        }
        Command::Logout => {
            tokens.clear();
            println!("logged out");
        }
        Command::Flights { command } => run_flights(api, command).await?,
        Command::Passengers { command } => run_passengers(api, command).await?,
        Command::Checkin { command } => run_checkin(api, command).await?,
        Command::Services { command } => run_services(api, command).await?,
    }
    Ok(())
}

async fn run_flights(api: Arc<HttpApi>, command: FlightsCommand) -> anyhow::Result<()> {
    match command {
        FlightsCommand::List => {
            for flight in api.list_flights().await? {
                println!(
                    "{:>5}  {:<20} dep {}  arr {}  seats {}",
                    flight.id,
                    flight.display_label(),
                    flight.departure_time,
                    flight.arrival_time,
                    flight
                        .available_seats
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".into()),
                );
            }
        }
        FlightsCommand::Add {
            number,
            source,
            destination,
            departure,
            arrival,
            seats,
            route,
        } => {
            api.create_flight(&FlightPayload {
                flight_number: number,
                source,
                destination,
                departure_time: departure,
                arrival_time: arrival,
                available_seats: seats,
                route,
            })
            .await?;
            println!("flight created");
        }
        FlightsCommand::Edit {
            id,
            number,
            source,
            destination,
            departure,
            arrival,
            seats,
            route,
        } => {
            api.update_flight(
                id,
                &FlightPayload {
                    flight_number: number,
                    source,
                    destination,
                    departure_time: departure,
                    arrival_time: arrival,
                    available_seats: seats,
                    route,
                },
            )
            .await?;
            println!("flight {id} updated");
        }
        FlightsCommand::Delete { id } => {
            api.delete_flight(id).await?;
            println!("flight {id} deleted");
        }
    }
    Ok(())
}

async fn run_passengers(api: Arc<HttpApi>, command: PassengersCommand) -> anyhow::Result<()> {
    match command {
        PassengersCommand::List { flight } => {
            let passengers = api.list_passengers().await?;
            for p in passengers
                .iter()
                .filter(|p| flight.is_none() || p.flight_id == flight)
            {
                println!(
                    "{:>5}  {:<24} flight {:<6} passport {}",
                    p.id,
                    p.name,
                    p.flight_id
                        .map(|f| f.to_string())
                        .unwrap_or_else(|| "?".into()),
                    p.passport.as_deref().unwrap_or("—"),
                );
            }
        }
        PassengersCommand::Add {
            name,
            email,
            phone,
            passport,
            dob,
            address,
            meal,
            infant,
            wheelchair,
            flight,
        } => {
            api.create_passenger(&PassengerPayload {
                name,
                email,
                phone,
                passport,
                dob,
                address,
                meal_preference: meal,
                infant: infant.into(),
                wheelchair: wheelchair.into(),
                flight: FlightRef { flight_id: flight },
            })
            .await?;
            println!("passenger created");
        }
        PassengersCommand::Edit {
            id,
            name,
            email,
            phone,
            passport,
            dob,
            address,
            meal,
            infant,
            wheelchair,
            flight,
        } => {
            api.update_passenger(
                id,
                &PassengerPayload {
                    name,
                    email,
                    phone,
                    passport,
                    dob,
                    address,
                    meal_preference: meal,
                    infant: infant.into(),
                    wheelchair: wheelchair.into(),
                    flight: FlightRef { flight_id: flight },
                },
            )
            .await?;
            println!("passenger {id} updated");
        }
        PassengersCommand::Delete { id } => {
            api.delete_passenger(id).await?;
            println!("passenger {id} deleted");
        }
    }
    Ok(())
}

async fn run_checkin(api: Arc<HttpApi>, command: CheckinCommand) -> anyhow::Result<()> {
    match command {
        CheckinCommand::Roster {
            flight,
            wheelchair,
            infant,
            checked,
            passenger,
        } => {
            let mut session = CheckInSession::new(api);
            session.select_flight(flight).await?;
            if let Some(p) = passenger {
                session.select_passenger(p)?;
            }
            if let Some(w) = wheelchair {
                session.filter.wheelchair = w.into();
            }
            if let Some(i) = infant {
                session.filter.infant = i.into();
            }
            if let Some(c) = checked {
                session.filter.checked = c.into();
            }
            print!("{}", render::roster(&session));
            println!();
            print!(
                "{}",
                render::seat_map(session.seats(), session.selected_passenger())
            );
        }
        CheckinCommand::Assign {
            flight,
            passenger,
            seat,
        } => {
            let mut session = CheckInSession::new(api);
            session.select_flight(flight).await?;
            session.select_passenger(passenger)?;

            let (state, number) = {
                let target = session
                    .seats()
                    .iter()
                    .find(|s| s.id == seat)
                    .with_context(|| format!("seat {seat} is not on flight {flight}"))?;
                (classify(target, Some(passenger)), target.seat_number.clone())
            };
            match state {
                SeatState::Occupied => {
                    anyhow::bail!("seat {number} is already taken by another passenger")
                }
                SeatState::Mine => println!("passenger {passenger} already holds seat {number}"),
                SeatState::Free => {
                    session.assign_seat(seat).await?;
                    println!("passenger {passenger} checked in to seat {number}");
                }
            }
        }
        CheckinCommand::Release { flight, passenger } => {
            let mut session = CheckInSession::new(api);
            session.select_flight(flight).await?;
            session.select_passenger(passenger)?;
            if session.release_seat().await? {
                println!("passenger {passenger} checked out");
            } else {
                println!("passenger {passenger} holds no seat; nothing to do");
            }
        }
    }
    Ok(())
}

async fn run_services(api: Arc<HttpApi>, command: ServicesCommand) -> anyhow::Result<()> {
    match command {
        ServicesCommand::List { flight } => {
            let desk = ServiceDesk::new(api);
            for service in desk.services_for_flight(flight).await? {
                println!(
                    "{:>5}  {:<24} {:<10} {:<12} {:>8.2}",
                    service.id,
                    service.name,
                    service.kind.backend_category(),
                    service.category.as_deref().unwrap_or("—"),
                    service.price,
                );
            }
        }
        ServicesCommand::Add {
            flight,
            name,
            kind,
            meal,
            price,
        } => {
            let desk = ServiceDesk::new(api);
            desk.create(&NewService {
                name,
                kind: kind.into(),
                meal: meal.map(Into::into),
                price,
                flight_id: flight,
            })
            .await?;
            println!("service created");
        }
        ServicesCommand::Edit {
            id,
            flight,
            name,
            kind,
            meal,
            price,
        } => {
            let desk = ServiceDesk::new(api);
            desk.update(
                id,
                &NewService {
                    name,
                    kind: kind.into(),
                    meal: meal.map(Into::into),
                    price,
                    flight_id: flight,
                },
            )
            .await?;
            println!("service {id} updated");
        }
        ServicesCommand::Delete { id } => {
            let desk = ServiceDesk::new(api);
            desk.delete(id).await?;
            println!("service {id} deleted");
        }
        ServicesCommand::Linked { passenger } => {
            for service in api.passenger_services(passenger).await? {
                println!(
                    "{:>5}  {:<24} {:>8.2}",
                    service.id, service.name, service.price
                );
            }
        }
        ServicesCommand::Link { passenger, service } => {
            api.link_service(passenger, service).await?;
            println!("service {service} linked to passenger {passenger}");
        }
        ServicesCommand::Unlink { passenger, service } => {
            api.unlink_service(passenger, service).await?;
            println!("service {service} unlinked from passenger {passenger}");
        }
    }
    Ok(())
}
