//! Subcommand definitions and dispatch against the catalog services.

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use serde_json::to_string_pretty;

use domain::{
    strings, CatalogStore, Cuisine, CuisineService, LunchSpot, LunchSpotService,
};

#[derive(Subcommand)]
pub enum Commands {
    /// Manage cuisines
    Cuisine {
        #[command(subcommand)]
        command: CuisineCommands,
    },
    /// Manage lunch spots
    Spot {
        #[command(subcommand)]
        command: SpotCommands,
    },
}

#[derive(Subcommand)]
pub enum CuisineCommands {
    /// Ensure a cuisine exists (idempotent; returns the existing entry on a
    /// case-insensitive name match)
    Add { name: String },
    /// Fetch one cuisine by id
    Get { id: i32 },
    /// List cuisines, optionally filtered by name
    List {
        /// Case-insensitive exact name match
        #[arg(long)]
        name: Option<String>,
        /// Case-insensitive substring match
        #[arg(long)]
        contains: Option<String>,
    },
    /// Rename a cuisine (fails on a case-insensitive name collision)
    Rename { id: i32, name: String },
}

#[derive(Subcommand)]
pub enum SpotCommands {
    /// Create a lunch spot under an existing cuisine
    Add {
        name: String,
        /// Name of an existing cuisine
        #[arg(long)]
        cuisine: String,
    },
    /// Fetch one lunch spot by id
    Get { id: i32 },
    /// List lunch spots, optionally filtered by substring
    List {
        /// Substring of the spot name
        #[arg(long)]
        name_contains: Option<String>,
        /// Substring of the attached cuisine name
        #[arg(long)]
        cuisine_contains: Option<String>,
    },
    /// Replace a spot's name and cuisine association
    Update {
        id: i32,
        name: String,
        /// Name of an existing cuisine (always required, even for a pure
        /// name change)
        #[arg(long)]
        cuisine: String,
    },
}

pub async fn run<S: CatalogStore>(store: Arc<S>, command: Commands) -> Result<()> {
    let cuisines = CuisineService::new(Arc::clone(&store));
    let spots = LunchSpotService::new(cuisines.clone(), store);

    match command {
        Commands::Cuisine { command } => run_cuisine(&cuisines, command).await,
        Commands::Spot { command } => run_spot(&spots, command).await,
    }
}

async fn run_cuisine<S: CatalogStore>(
    cuisines: &CuisineService<S>,
    command: CuisineCommands,
) -> Result<()> {
    match command {
        CuisineCommands::Add { name } => {
            let cuisine = cuisines.create(&name).await?;
            print_json(&cuisine)
        }
        CuisineCommands::Get { id } => {
            let cuisine = cuisines.get_by_id(id).await?;
            print_json(&cuisine)
        }
        CuisineCommands::List { name, contains } => {
            let all = match (name, contains) {
                (Some(name), _) => {
                    cuisines
                        .list_filtered(move |c| strings::eq_ignore_case(&c.name, &name))
                        .collect()
                        .await?
                }
                (None, Some(fragment)) => {
                    let fragment = fragment.to_lowercase();
                    cuisines
                        .list_filtered(move |c| c.name.to_lowercase().contains(&fragment))
                        .collect()
                        .await?
                }
                (None, None) => cuisines.list().collect().await?,
            };
            print_json(&all)
        }
        CuisineCommands::Rename { id, name } => {
            let cuisine = cuisines.rename(id, &name).await?;
            print_json(&cuisine)
        }
    }
}

async fn run_spot<S: CatalogStore>(
    spots: &LunchSpotService<S>,
    command: SpotCommands,
) -> Result<()> {
    match command {
        SpotCommands::Add { name, cuisine } => {
            let spot = spots.create(&name, Some(&Cuisine::named(cuisine))).await?;
            print_json(&spot)
        }
        SpotCommands::Get { id } => {
            let spot = spots.get_by_id(id).await?;
            print_json(&spot)
        }
        SpotCommands::List {
            name_contains,
            cuisine_contains,
        } => {
            let name_fragment = name_contains.map(|f| f.to_lowercase());
            let cuisine_fragment = cuisine_contains.map(|f| f.to_lowercase());
            let all = spots
                .list_filtered(move |spot| {
                    let name_ok = name_fragment
                        .as_ref()
                        .map(|f| spot.name.to_lowercase().contains(f))
                        .unwrap_or(true);
                    let cuisine_ok = cuisine_fragment
                        .as_ref()
                        .map(|f| {
                            spot.cuisine
                                .as_ref()
                                .map(|c| c.name.to_lowercase().contains(f))
                                .unwrap_or(false)
                        })
                        .unwrap_or(true);
                    name_ok && cuisine_ok
                })
                .collect()
                .await?;
            print_json(&all)
        }
        SpotCommands::Update { id, name, cuisine } => {
            let changes = LunchSpot::changes(name, Some(Cuisine::named(cuisine)));
            let spot = spots.update(id, &changes).await?;
            print_json(&spot)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", to_string_pretty(value)?);
    Ok(())
}
