use anyhow::{anyhow, bail, Result};
use serde_json::json;
use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use demerit_registry::{
    import_people, load_people_csv, AccrualResult, Amendment, PersonRecord, PersonRecordService,
    RecordResult, RecordStore, RegistryConfig, VERSION,
};

const USAGE: &str = "\
usage: demerit-registry <command>
  add-person  <id> <first> <last> <address> <birth-date>
  amend       <original-id> <new-id> <first> <last> <address> <birth-date>
  add-demerit <id> <offense-date> <points>
  show        <id>
  import      <csv-path>";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when the operation itself was refused
fn run(args: &[String]) -> Result<bool> {
    let Some(command) = args.first() else {
        println!("demerit-registry {}\n{}", VERSION, USAGE);
        return Ok(false);
    };

    let config = RegistryConfig::from_env()?;
    let store = config.open_store()?;
    let rest = &args[1..];

    match command.as_str() {
        "add-person" => {
            let [id, first, last, address, birth_date] = expect_args::<5>(rest)?;
            let person = PersonRecord::new(id, first, last, address, birth_date);
            let service = PersonRecordService::new(person, store);
            report(service.try_create().map(|_| "created".to_string()))
        }
        "amend" => {
            let [original_id, new_id, first, last, address, birth_date] = expect_args::<6>(rest)?;
            let mut service = load(store, &original_id)?;
            let amendment = Amendment::new(new_id, first, last, address, birth_date);
            report(service.try_amend(&original_id, &amendment).map(|_| "amended".to_string()))
        }
        "add-demerit" => {
            let [id, offense_date, points] = expect_args::<3>(rest)?;
            let points: i32 = points
                .parse()
                .map_err(|_| anyhow!("points must be a whole number, got {:?}", points))?;
            let mut service = load(store, &id)?;
            let result = service.add_demerit_points(&offense_date, points);
            println!("{}", result);
            println!("suspended: {}", service.is_suspended());
            Ok(result == AccrualResult::Success)
        }
        "show" => {
            let [id] = expect_args::<1>(rest)?;
            let service = load(store, &id)?;
            let output = json!({
                "person": service.record(),
                "demerits": service.demerit_history()?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(true)
        }
        "import" => {
            let [csv_path] = expect_args::<1>(rest)?;
            let people = load_people_csv(Path::new(&csv_path))?;
            let summary = import_people(store, people);
            println!("✓ Imported {} people", summary.imported);
            for (id, reason) in &summary.rejected {
                println!("✗ {}: {}", id, reason);
            }
            Ok(summary.rejected.is_empty())
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}

fn expect_args<const N: usize>(rest: &[String]) -> Result<[String; N]> {
    <[String; N]>::try_from(rest.to_vec())
        .map_err(|_| anyhow!("expected {} arguments, got {}\n{}", N, rest.len(), USAGE))
}

fn load(store: Arc<dyn RecordStore>, id: &str) -> Result<PersonRecordService> {
    PersonRecordService::load(store, id)?.ok_or_else(|| anyhow!("no person with id {:?}", id))
}

fn report(outcome: RecordResult<String>) -> Result<bool> {
    match outcome {
        Ok(message) => {
            println!("✓ {}", message);
            Ok(true)
        }
        Err(e) => {
            println!("✗ {}", e);
            Ok(false)
        }
    }
}
