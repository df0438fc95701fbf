//! Recompute stored target dates from each profile's saved intake
//! Usage: cargo run --bin recalculate_targets -- [profile]

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use weightcalc::calculator::{normalize_intake, normalize_profile, solve_target_date};
use weightcalc::config::Config;
use weightcalc::db::{migrations, Database};
use weightcalc::models::{WeightLossProfile, WeightLossProfileSave};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("weightcalc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let only = std::env::args().nth(1);
    let config = Config::from_env();
    println!("Database: {}", config.database_path.display());

    let database = Database::new(&config.database_path)?;
    let now = Utc::now();

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let profiles: Vec<WeightLossProfile> = WeightLossProfile::list(conn)?
            .into_iter()
            .filter(|p| only.as_deref().map_or(true, |name| p.name == name))
            .collect();
        println!("Found {} profiles", profiles.len());

        let mut updated = 0;
        for stored in &profiles {
            let raw = stored.to_raw();
            let normalized = normalize_profile(&raw).and_then(|profile| {
                let intake = normalize_intake(raw.daily_calorie_intake.as_ref())?;
                Ok((profile, intake))
            });
            let (profile, daily_calorie_intake) = match normalized {
                Ok(normalized) => normalized,
                Err(e) => {
                    println!("  {}: skipped ({})", stored.name, e);
                    continue;
                }
            };

            match solve_target_date(&profile, daily_calorie_intake, now) {
                Ok(projection) => {
                    WeightLossProfile::save(
                        conn,
                        &stored.name,
                        &WeightLossProfileSave {
                            profile: &profile,
                            daily_calorie_intake,
                            target_date: projection.target_date,
                        },
                    )?;
                    println!(
                        "  {}: {} -> {} ({:.1} days)",
                        stored.name,
                        stored.target_date.as_deref().unwrap_or("none"),
                        projection.target_date.format("%Y-%m-%d"),
                        projection.days_required
                    );
                    updated += 1;
                }
                Err(e) => println!("  {}: skipped ({})", stored.name, e),
            }
        }

        tracing::info!(updated, total = profiles.len(), "recalculated target dates");
        Ok(())
    })?;

    Ok(())
}
