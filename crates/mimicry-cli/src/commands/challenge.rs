//! Challenge command implementations (create, list, show, update, delete).

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use mimicry_challenge::{ChallengeRecord, ChallengeUpdate, NewChallenge};
use mimicry_features::PipelineConfig;

use super::json_output::{error_codes, finish, JsonError};
use super::{load_config, open_service, read_input};

/// Arguments for `challenge create`.
#[derive(Debug, Clone)]
pub struct CreateArgs<'a> {
    pub store: &'a str,
    pub name: &'a str,
    pub created_by: &'a str,
    /// Reference recording
    pub sound: &'a str,
    /// Defaults to a `file://` URL of `sound`
    pub sound_url: Option<&'a str>,
    pub levels: Vec<f64>,
    pub config: Option<&'a str>,
}

/// Run `challenge create`.
pub fn create(args: CreateArgs<'_>, json_output: bool) -> Result<ExitCode> {
    finish(create_record(args), json_output, |record| {
        println!("{} challenge {}", "Created".green().bold(), record.id);
        print_record(record);
    })
}

fn create_record(args: CreateArgs<'_>) -> Result<ChallengeRecord, JsonError> {
    let config = load_config(args.config)?;
    let audio = read_input(args.sound)?;
    let sound_url = match args.sound_url {
        Some(url) => url.to_string(),
        None => file_url(args.sound)?,
    };

    let mut service = open_service(args.store, config)?;
    let new = NewChallenge::new(args.name, args.created_by, sound_url).levels(args.levels);
    service
        .create(new, &audio)
        .map_err(|e| JsonError::from(e).with_file(args.sound))
}

fn file_url(path: &str) -> Result<String, JsonError> {
    let absolute = fs::canonicalize(Path::new(path)).map_err(|e| {
        JsonError::new(error_codes::FILE_READ, format!("Failed to resolve path: {}", e))
            .with_file(path)
    })?;
    Ok(format!("file://{}", absolute.display()))
}

/// Run `challenge list`.
pub fn list(store: &str, json_output: bool) -> Result<ExitCode> {
    let outcome = open_service(store, PipelineConfig::default())
        .and_then(|service| service.list().map_err(JsonError::from));
    finish(outcome, json_output, |records| {
        if records.is_empty() {
            println!("{}", "No challenges.".dimmed());
            return;
        }
        for record in records {
            println!(
                "{:>4}  {}  {}  {}",
                record.id.to_string().cyan(),
                record.name.bold(),
                format!("by {}", record.created_by).dimmed(),
                record.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    })
}

/// Run `challenge show`.
pub fn show(store: &str, id: u64, json_output: bool) -> Result<ExitCode> {
    let outcome = open_service(store, PipelineConfig::default())
        .and_then(|service| service.get(id).map_err(JsonError::from));
    finish(outcome, json_output, print_record)
}

/// Run `challenge update`.
pub fn update(
    store: &str,
    id: u64,
    changes: ChallengeUpdate,
    json_output: bool,
) -> Result<ExitCode> {
    if changes.is_empty() {
        let error = JsonError::new(
            error_codes::INVALID_ARGS,
            "Nothing to update: pass --name, --sound-url or --levels",
        );
        return finish::<ChallengeRecord>(Err(error), json_output, |_| {});
    }

    let outcome = open_service(store, PipelineConfig::default())
        .and_then(|mut service| service.update(id, changes).map_err(JsonError::from));
    finish(outcome, json_output, |record| {
        println!("{} challenge {}", "Updated".green().bold(), record.id);
        print_record(record);
    })
}

/// Run `challenge delete`.
pub fn delete(store: &str, id: u64, json_output: bool) -> Result<ExitCode> {
    let outcome = open_service(store, PipelineConfig::default())
        .and_then(|mut service| service.delete(id).map_err(JsonError::from));
    finish(outcome, json_output, |record| {
        println!(
            "{} challenge {} ({})",
            "Deleted".yellow().bold(),
            record.id,
            record.name
        );
    })
}

fn print_record(record: &ChallengeRecord) {
    println!("{} {}", "Challenge:".cyan().bold(), record.name);
    println!("  {:<11} {}", "id".dimmed(), record.id);
    println!("  {:<11} {}", "created by".dimmed(), record.created_by);
    println!("  {:<11} {}", "created".dimmed(), record.created_at.to_rfc3339());
    println!("  {:<11} {}", "updated".dimmed(), record.updated_at.to_rfc3339());
    println!("  {:<11} {}", "sound".dimmed(), record.sound_url);
    println!("  {:<11} {}", "hash".dimmed(), record.sound_hash);
    println!("  {:<11} {:?}", "levels".dimmed(), record.levels);
    match record.reference_summary() {
        Ok(summary) => super::extract::print_summary(&summary),
        Err(e) => println!("  {} {}", "features:".red(), e),
    }
}
