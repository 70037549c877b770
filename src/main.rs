use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Weekday;
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use recfinder::adapter::read_registered_csv;
use recfinder::api::{CentreQuery, NearbyQuery, ProgramType, RecreationApiClient, SearchQuery};
use recfinder::config::RecFinderConfig;
use recfinder::details::{CentreDetailsLoader, CentreProgramView};
use recfinder::filter::{AgeBracket, filter_by_age, filter_registered, parse_weekday};
use recfinder::geolocation::{FixedPosition, Position, locate};
use recfinder::map::{LayerVisibility, MapController, MapScene};
use recfinder::models::{Identifier, ProgramSearchResult};
use recfinder::selection::{DropinSelection, RegisteredSelection};
use recfinder::taxonomy::CategoryTag;
use recfinder::{RecFinderError, adapter, logging, render};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find Toronto recreation programs and centres", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true, env = "RECFINDER_API_URL", value_hint = ValueHint::Url)]
    api_url: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List ward boundaries
    Wards,
    /// Show the activity, district and facility type options
    Options,
    /// List centres on the map, optionally filtered
    Centres(CentresArgs),
    /// Show one centre with its programs
    Centre(CentreArgs),
    /// Search programs across all centres
    Search(SearchArgs),
    /// Count programs and centres matching a search
    Stats(StatsArgs),
    /// Centres around a position
    Nearby(NearbyArgs),
    /// Browse a registered-programs CSV export offline
    Csv(CsvArgs),
    /// Print the map layers and camera as JSON
    Map(MapArgs),
}

#[derive(Args, Debug)]
struct CentresArgs {
    #[arg(long)]
    activity: Option<String>,
    #[arg(long)]
    district: Option<String>,
    /// 0-6 (Monday first), a day name, or `today`
    #[arg(long, value_parser = parse_weekday)]
    weekday: Option<Weekday>,
    #[arg(long)]
    facility_type: Option<String>,
}

impl CentresArgs {
    fn query(&self) -> CentreQuery {
        CentreQuery {
            activity: self.activity.clone(),
            district: self.district.clone(),
            weekday: self.weekday,
            facility_type: self.facility_type.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct CentreArgs {
    /// Centre id
    id: String,
    /// young, teen, adult or senior
    #[arg(long)]
    age: Option<AgeBracket>,
    /// Drop-in sport, e.g. "Badminton"
    #[arg(long)]
    sport: Option<String>,
    /// Schedule within the sport, e.g. "Monday 18:00–19:00"
    #[arg(long, requires = "sport")]
    schedule: Option<String>,
    /// Registered program category
    #[arg(long)]
    category: Option<CategoryTag>,
    /// Section within the category
    #[arg(long, requires = "category")]
    section: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    activity: Option<String>,
    #[arg(long)]
    age: Option<AgeBracket>,
    /// 0-6 (Monday first), a day name, or `today`
    #[arg(long, value_parser = parse_weekday)]
    weekday: Option<Weekday>,
    #[arg(long)]
    district: Option<String>,
    /// dropin or registered
    #[arg(long = "type", default_value = "dropin")]
    program_type: ProgramType,
    /// Maximum programs returned (defaults to the configured limit)
    #[arg(long)]
    limit: Option<u32>,
}

impl SearchArgs {
    fn query(&self, default_limit: u32) -> SearchQuery {
        SearchQuery {
            activity: self.activity.clone(),
            age: self.age,
            weekday: self.weekday,
            district: self.district.clone(),
            program_type: self.program_type,
            limit: Some(self.limit.unwrap_or(default_limit)),
        }
    }
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long)]
    activity: Option<String>,
    #[arg(long)]
    age: Option<AgeBracket>,
    #[arg(long, value_parser = parse_weekday)]
    weekday: Option<Weekday>,
    #[arg(long)]
    district: Option<String>,
}

#[derive(Args, Debug)]
struct NearbyArgs {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Search radius in km (defaults to the configured radius)
    #[arg(long)]
    radius_km: Option<f64>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Debug)]
struct CsvArgs {
    /// Registered programs CSV export
    #[arg(value_hint = ValueHint::FilePath)]
    path: PathBuf,
    #[arg(long)]
    age: Option<AgeBracket>,
    #[arg(long)]
    category: Option<CategoryTag>,
    #[arg(long, requires = "category")]
    section: Option<String>,
}

#[derive(Args, Debug)]
struct MapArgs {
    #[command(flatten)]
    filters: CentresArgs,
    /// Hide the ward layers
    #[arg(long, action = ArgAction::SetTrue)]
    hide_wards: bool,
    /// Hide the centre layer
    #[arg(long, action = ArgAction::SetTrue)]
    hide_centres: bool,
    /// Mark a user position, given as `lat,lon`
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    at: Option<Position>,
}

fn parse_lat_lon(raw: &str) -> std::result::Result<Position, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got '{raw}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    Ok(Position::new(lat, lon))
}

fn parse_identifier(raw: &str) -> Identifier {
    raw.trim()
        .parse::<i64>()
        .map_or_else(|_| Identifier::from(raw.trim()), Identifier::Number)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        match err.downcast_ref::<RecFinderError>() {
            Some(known) => eprintln!("{}", known.user_message()),
            None => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = RecFinderConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api.base_url.clone_from(url);
    }
    logging::init(&config.logging, cli.verbose);
    debug!("Using backend {}", config.api.base_url);

    let client = RecreationApiClient::new(&config.api, &config.defaults)?;

    match cli.command {
        Command::Wards => {
            let wards = client.wards().await?;
            for ward in &wards.features {
                println!("{}", ward.area_name().unwrap_or("Unnamed ward"));
            }
            info!("{} wards", wards.features.len());
        }
        Command::Options => {
            let options = client.filter_options().await?;
            print!("{}", render::filter_options(&options));
        }
        Command::Centres(args) => {
            let centres = client.centres(&args.query()).await?;
            print!("{}", render::centre_table(&centres));
        }
        Command::Centre(args) => run_centre(client, args).await?,
        Command::Search(args) => {
            let query = args.query(config.defaults.search_limit);
            match client.search_programs(&query).await? {
                ProgramSearchResult::Dropin { total, programs } => {
                    println!("{total} drop-in programs");
                    print!("{}", render::weekly_schedule(&programs));
                }
                ProgramSearchResult::Registered { total, programs } => {
                    println!("{total} registered programs");
                    print!("{}", render::registered_list(&adapter::adapt_records(&programs)));
                }
            }
        }
        Command::Stats(args) => {
            let query = SearchQuery {
                activity: args.activity,
                age: args.age,
                weekday: args.weekday,
                district: args.district,
                ..SearchQuery::default()
            };
            println!("{}", client.search_stats(&query).await?);
        }
        Command::Nearby(args) => {
            let position = locate(
                &FixedPosition(Some(Position::new(args.lat, args.lon))),
                config.geolocation.timeout(),
            )
            .await?;
            let query = NearbyQuery {
                lat: position.latitude,
                lon: position.longitude,
                radius_km: args.radius_km.unwrap_or(config.defaults.nearby_radius_km),
                limit: args.limit,
            };
            print!("{}", render::nearby_table(&client.nearby(&query).await?));
        }
        Command::Map(args) => run_map(client, args, config.geolocation.timeout()).await?,
        Command::Csv(args) => run_csv(&args)?,
    }
    Ok(())
}

async fn run_centre(client: RecreationApiClient, args: CentreArgs) -> Result<()> {
    let id = parse_identifier(&args.id);
    let loader = CentreDetailsLoader::new(client.clone());
    let (details, registered_programs) =
        tokio::try_join!(loader.load(&id), client.registered_for_centre(&id))?;
    let Some(details) = details else {
        bail!("Centre {id} was superseded by another request");
    };

    let mut dropin = DropinSelection::default();
    dropin.select_sport(args.sport);
    dropin.select_schedule(args.schedule);

    let mut registered = RegisteredSelection::default();
    registered.select_category(args.category);
    registered.select_section(args.section);

    let dropin_by_age = filter_by_age(&details.programs.dropin, args.age);
    let registered_by_age = filter_by_age(&registered_programs, args.age);
    let view = CentreProgramView {
        dropin: dropin.apply(&details.programs.dropin, args.age),
        registered: registered.apply(&registered_programs, args.age),
    };
    info!(
        "{} drop-in and {} registered programs after filters",
        view.dropin.len(),
        view.registered.len()
    );

    print!("{}", render::centre_details(&details, &view));

    let sports = DropinSelection::sports(&dropin_by_age);
    if !sports.is_empty() {
        println!("\nSports: {}", sports.join(", "));
    }
    let schedules = dropin.schedules(&dropin_by_age);
    if !schedules.is_empty() {
        println!("Schedules: {}", schedules.join(", "));
    }
    let categories = RegisteredSelection::categories(&registered_by_age);
    if !categories.is_empty() {
        let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
        println!("Categories: {}", labels.join(", "));
    }
    let sections = registered.sections(&registered_by_age);
    if !sections.is_empty() {
        println!("Sections:");
        print!("{}", render::section_menu(&sections));
    }
    Ok(())
}

fn run_csv(args: &CsvArgs) -> Result<()> {
    let programs = read_registered_csv(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    info!("Loaded {} registered programs", programs.len());

    let by_age = filter_by_age(&programs, args.age);
    let selected = filter_registered(&by_age, args.category, args.section.as_deref());
    print!("{}", render::registered_list(&selected));
    Ok(())
}

async fn run_map(client: RecreationApiClient, args: MapArgs, timeout: Duration) -> Result<()> {
    let query = args.filters.query();
    let (wards, centres) = tokio::try_join!(client.wards(), client.centres(&query))?;

    let mut map = MapController::new(MapScene::default());
    map.show_wards(&wards);
    map.show_centres(&centres);
    map.set_visibility(LayerVisibility {
        centres: !args.hide_centres,
        wards: !args.hide_wards,
    });

    if let Some(at) = args.at {
        let position = locate(&FixedPosition(Some(at)), timeout).await?;
        map.show_user_location(Some(position));
    }

    let scene = map.into_surface();
    println!(
        "{}",
        serde_json::to_string_pretty(&scene).context("Failed to serialize map scene")?
    );
    Ok(())
}
