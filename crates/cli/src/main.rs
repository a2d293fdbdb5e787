use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use wayfarer_agents::TripConcierge;
use wayfarer_core::{parse_trip_request, Coordinates, NearbyQuery, TripRequest};
use wayfarer_observability::{init_cli_tracing, AppMetrics};
use wayfarer_upstream::{HttpUpstreamConfig, Upstream};

#[derive(Debug, Parser)]
#[command(name = "wayfarer")]
#[command(about = "Wayfarer trip planner CLI")]
struct Cli {
    #[command(flatten)]
    upstream: UpstreamArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct UpstreamArgs {
    #[arg(long, env = "WAYFARER_OTM_API_KEY", hide_env_values = true, global = true)]
    otm_api_key: Option<String>,

    #[arg(
        long,
        env = "WAYFARER_OTM_BASE_URL",
        default_value = "https://api.opentripmap.com/0.1/en",
        global = true
    )]
    otm_base_url: String,

    #[arg(
        long,
        env = "WAYFARER_GEO_URL",
        default_value = "https://ipapi.co/json/",
        global = true
    )]
    geo_url: String,

    #[arg(
        long,
        env = "WAYFARER_GEOCODE_URL",
        default_value = "https://nominatim.openstreetmap.org/search",
        global = true
    )]
    geocode_url: String,

    #[arg(long, default_value_t = 20, global = true)]
    timeout_seconds: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize a trip plan from flags or a request JSON file.
    Plan(PlanArgs),
    Hotels {
        #[arg(long)]
        city: Option<String>,
    },
    /// Attractions around a point, or around a city looked up by name.
    Attractions {
        #[arg(
            long,
            allow_negative_numbers = true,
            requires = "lon",
            required_unless_present = "city"
        )]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,
        #[arg(long, default_value_t = 50_000)]
        radius: u32,
        #[arg(long, default_value = "interesting_places")]
        kind: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Geo,
    /// Print the coordinates a city name resolves to.
    Geocode {
        city: String,
    },
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Request JSON file, or `-` for stdin.
    #[arg(long, conflicts_with = "destination")]
    file: Option<PathBuf>,

    #[arg(long, required_unless_present = "file")]
    destination: Option<String>,

    #[arg(long, default_value_t = 3)]
    days: u32,

    #[arg(long, default_value = "mid")]
    budget: String,

    #[arg(long, default_value = "couple")]
    party: String,

    #[arg(long, default_value = "public")]
    transport: String,

    #[arg(long, default_value = "national")]
    trip_type: String,

    #[arg(long)]
    multi_spot: bool,

    #[arg(long)]
    start_date: Option<String>,

    #[arg(long)]
    end_date: Option<String>,

    /// Nearby point names, in day order.
    #[arg(long = "nearby")]
    nearby: Vec<String>,

    /// Look up attractions around the destination when no nearby points are given.
    #[arg(long)]
    with_attractions: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_cli_tracing("wayfarer_cli");
    let cli = Cli::parse();

    let concierge = build_concierge(&cli.upstream)?;

    match cli.command {
        Command::Plan(args) => {
            let mut request = match args.file.as_deref() {
                Some(path) => {
                    let body = read_request(path)?;
                    parse_trip_request(&body)
                        .with_context(|| format!("invalid trip request in {}", path.display()))?
                }
                None => request_from_args(&args)?,
            };
            if args.with_attractions {
                request = concierge.with_nearby_attractions(request).await;
            }

            let plan = concierge.plan_trip(&request);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Hotels { city } => {
            let hotels = concierge.hotel_suggestions(city.as_deref());
            println!("{}", serde_json::to_string_pretty(&json!({ "hotels": hotels }))?);
        }
        Command::Attractions {
            lat,
            lon,
            city,
            radius,
            kind,
            limit,
        } => {
            let origin = match (lat, lon, city) {
                (Some(lat), Some(lon), _) => Coordinates { lat, lon },
                (_, _, Some(city)) => geocode(&concierge, &city).await?,
                _ => return Err(anyhow!("pass --lat and --lon, or --city")),
            };
            let query = NearbyQuery {
                radius,
                kind,
                limit,
                ..NearbyQuery::around(origin)
            };
            let items = concierge.nearby_points(&query).await?;
            println!("{}", serde_json::to_string_pretty(&json!({ "items": items }))?);
        }
        Command::Geo => {
            let country = concierge.locate_visitor().await;
            println!("{}", serde_json::to_string_pretty(&country)?);
        }
        Command::Geocode { city } => {
            let origin = geocode(&concierge, &city).await?;
            println!("{}", serde_json::to_string_pretty(&origin)?);
        }
    }

    Ok(())
}

fn request_from_args(args: &PlanArgs) -> Result<TripRequest> {
    let nearby = args
        .nearby
        .iter()
        .map(|name| json!({ "name": name }))
        .collect::<Vec<_>>();

    let payload = json!({
        "destinationName": args.destination,
        "durationDays": args.days,
        "budgetTier": args.budget,
        "partySize": args.party,
        "transportMode": args.transport,
        "tripType": args.trip_type,
        "multiSpot": args.multi_spot,
        "startDate": args.start_date,
        "endDate": args.end_date,
        "nearbyPoints": nearby,
    });

    TripRequest::from_value(&payload).context("invalid --destination value")
}

async fn geocode(concierge: &TripConcierge<Upstream>, city: &str) -> Result<Coordinates> {
    concierge
        .geocode_city(city)
        .await?
        .ok_or_else(|| anyhow!("no coordinates found for {city}"))
}

fn read_request(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut body = Vec::new();
        io::stdin()
            .read_to_end(&mut body)
            .context("failed reading trip request from stdin")?;
        return Ok(body);
    }

    fs::read(path).with_context(|| format!("failed reading {}", path.display()))
}

fn build_concierge(args: &UpstreamArgs) -> Result<TripConcierge<Upstream>> {
    let upstream = Upstream::http(HttpUpstreamConfig {
        places_base_url: args.otm_base_url.clone(),
        places_api_key: args.otm_api_key.clone(),
        geo_url: args.geo_url.clone(),
        geocode_url: args.geocode_url.clone(),
        timeout: Duration::from_secs(args.timeout_seconds),
    })?;

    Ok(TripConcierge::new(Arc::new(upstream), AppMetrics::shared()))
}
