use alumni_matcher::{
    cli::{Cli, Commands},
    config::Config,
    lookup::LookupService,
    server,
    writer::{generate_schema_script, setup_store},
};
use anyhow::{anyhow, Context, Result};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("alumni_matcher", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse_args();
    let bind = match &cli.command {
        Commands::Serve { bind } => *bind,
        _ => None,
    };
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.db, cli.schema_file, bind);

    match cli.command {
        Commands::Setup { csv } => {
            let start = Instant::now();

            let summary = setup_store(&config, csv.as_deref())
                .with_context(|| format!("Setup of {:?} failed", config.db_path))?;

            let elapsed = start.elapsed();
            println!(
                "Created {:?} ({} alumni, {} skills, {} links) in {:.1}s",
                config.db_path,
                summary.alumni,
                summary.skills,
                summary.links,
                elapsed.as_secs_f64()
            );
        }

        Commands::Lookup { skill, json } => {
            let lookup = LookupService::new(&config);
            lookup.check_store()?;

            let matches = lookup
                .find_alumni_by_skill(skill.trim())
                .into_items_logged("alumni");

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else if matches.is_empty() {
                println!("No alumni found with skill {:?}", skill.trim());
            } else {
                for m in &matches {
                    println!(
                        "  {:<15} {:<20} {:<14} {}",
                        m.first_name,
                        m.last_name,
                        m.proficiency_level.as_deref().unwrap_or("-"),
                        m.skill_name
                    );
                }
            }
        }

        Commands::Skills => {
            let lookup = LookupService::new(&config);
            lookup.check_store()?;

            println!("Available skills:\n");
            for name in lookup.all_skills().into_items_logged("skill catalog") {
                println!("  {}", name);
            }
        }

        Commands::Schema => {
            print!("{}", generate_schema_script().map_err(|e| anyhow!(e))?);
        }

        Commands::Serve { .. } => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(server::serve(&config))?;
        }
    }

    Ok(())
}
