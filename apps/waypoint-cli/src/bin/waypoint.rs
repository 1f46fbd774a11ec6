use std::env;
use std::str::FromStr;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use waypoint_adaptive::PerformanceLedger;
use waypoint_core::config::Config;
use waypoint_core::types::{Difficulty, FilterSet, Profile};
use waypoint_engine::Engine;

const USAGE: &str = "Usage: waypoint <command> [args...]

Commands:
  search <query> [category]             rank knowledge items
  next <subject> <difficulty> [count]   pick the next questions for a subject
  match <skill,skill,...> [location]    score opportunity listings for a profile";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}\n\n{USAGE}");
    std::process::exit(2);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("waypoint=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let (cmd, args) = parse_args();
    let engine = Engine::from_config(&config, &env::current_dir()?)?;
    debug!(command = %cmd, subjects = ?engine.subject_ids(), "waypoint starting");

    match cmd.as_str() {
        "search" => {
            let Some(query) = args.first() else { usage_error("search needs a query") };
            let results = engine.search_catalog(query, args.get(1).map(String::as_str));
            println!("🔍 {} results for \"{}\"", results.len(), query);
            for (i, hit) in results.hits.iter().enumerate() {
                println!("\n  {}. score={:.0}  id={}  category={}", i + 1, hit.score, hit.item.id, hit.item.category);
                println!("     {}", hit.item.title);
                if let Some(detail) = results.details.get(&hit.item.id) {
                    if !detail.matched_keywords.is_empty() {
                        println!("     keywords: {}", detail.matched_keywords.join(", "));
                    }
                }
            }
        }
        "next" => {
            let (Some(subject), Some(level)) = (args.first(), args.get(1)) else {
                usage_error("next needs a subject and a difficulty")
            };
            let target = Difficulty::from_str(level)?;
            let count = match args.get(2) {
                Some(n) => n.parse::<usize>()?,
                None => engine.settings().rank.default_limit,
            };
            let items = engine.get_adaptive_items(subject, &PerformanceLedger::new(), target, count)?;
            println!("📚 {} question(s) from {} at {}", items.len(), subject, target);
            for item in &items {
                println!("  [{}] {} ({})", item.difficulty, item.title, item.id);
            }
        }
        "match" => {
            let Some(skills) = args.first() else { usage_error("match needs a comma-separated skill list") };
            let profile = Profile {
                id: "cli".to_string(),
                skills: skills.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect(),
                location: args.get(1).cloned(),
                ..Profile::default()
            };
            let results = engine.fetch_scored_opportunities(&profile, &FilterSet::default()).await?;
            println!("💼 {} matching opportunities", results.len());
            for (i, hit) in results.hits.iter().enumerate() {
                let o = &hit.item;
                println!("\n  {}. score={:.0}  {} at {}  [{}]", i + 1, hit.score, o.title, o.organization, o.kind.as_str());
                if let Some(detail) = results.details.get(&o.id) {
                    println!("     skills matched: {}", detail.matched_skills.join(", "));
                }
            }
        }
        _ => usage_error(&format!("Unknown command: {cmd}")),
    }
    Ok(())
}
