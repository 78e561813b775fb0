//! `replay schools` and `replay clubs`: reference lists as tables.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::CommandOutput;
use crate::api::{Backend, Club, HttpBackend, School};
use crate::config::Config;
use crate::error::Result;

#[derive(Tabled)]
struct SchoolRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Code")]
    code: String,
}

#[derive(Tabled)]
struct ClubRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Genre")]
    genre: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn schools_table(schools: &[School]) -> String {
    if schools.is_empty() {
        return "No schools found".to_string();
    }
    let rows = schools.iter().map(|s| SchoolRow {
        id: s.id,
        name: s.name.clone(),
        region: s.region.clone(),
        code: s.code.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn clubs_table(clubs: &[Club]) -> String {
    if clubs.is_empty() {
        return "No clubs found".to_string();
    }
    let rows = clubs.iter().map(|c| ClubRow {
        id: c.id,
        name: c.name.clone(),
        genre: c.genre.clone(),
        description: c.description.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

pub async fn cmd_schools(output_json: bool) -> Result<()> {
    let backend = HttpBackend::from_config(&Config::load()?)?;
    let schools = backend.fetch_schools().await?;

    CommandOutput::new(json!(schools))
        .with_text(schools_table(&schools))
        .print(output_json)
}

pub async fn cmd_clubs(school_id: u64, output_json: bool) -> Result<()> {
    let backend = HttpBackend::from_config(&Config::load()?)?;
    let clubs = backend.fetch_clubs(school_id).await?;

    CommandOutput::new(json!(clubs))
        .with_text(clubs_table(&clubs))
        .print(output_json)
}
