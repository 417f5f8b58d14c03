//! Fetch a raw OMDb record and print it next to the mapped detail fields.
//! Usage:
//!   cargo run --bin omdb_props -- <imdb_id>
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinesearch::config::Config;
use cinesearch::models::MovieDetail;
use cinesearch::omdb::{OmdbClient, ReqwestTransport, Transport};
use dotenvy::dotenv;
use serde_json::Value;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let id = env::args()
        .nth(1)
        .context("usage: omdb_props <imdb_id>")?;

    let config = Config::from_env()?;
    let client = OmdbClient::from_config(&config)?;
    let url = client.details_url(&id);

    let raw = ReqwestTransport::new()?.fetch(&url).await?;
    println!("HTTP {}", raw.status);
    let value: Value = serde_json::from_str(&raw.body).context("JSON parse failed")?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    match serde_json::from_value::<MovieDetail>(value) {
        Ok(detail) => {
            println!("\n--- mapped ---");
            println!("title: {}", detail.summary.title);
            println!("year: {} -> {:?}", detail.summary.year, detail.summary.year_number());
            println!("type: {}", detail.summary.media_type);
            println!("poster: {:?}", detail.summary.poster_url);
            println!("runtime_minutes: {:?}", detail.runtime_minutes());
            println!("genres: {:?}", detail.genres());
            println!("actors: {:?}", detail.actors_list());
            println!("rotten_tomatoes: {:?}", detail.rotten_tomatoes());
            println!("metascore_band: {:?}", detail.metascore_band());
        }
        Err(e) => println!("\nDoes not map to MovieDetail: {e}"),
    }
    Ok(())
}
