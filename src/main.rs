//! GemPlay QA - integration suite for the GemPlay backend
//!
//! A CLI tool that exercises a live GemPlay deployment end to end:
//! player registration and login, the gem economy, PvP rock-paper-scissors
//! games and the bot fleet behind them.
//!
//! ## Features
//!
//! - 14 scenarios covering auth, gem economy, games and bot compliance
//! - Multiple target environments with per-environment admin credentials
//! - Parallel scenario execution
//! - Multiple output formats (Table, JSON, CSV)
//! - Stored runs with cross-environment comparison
//!
//! ## Usage
//!
//! ```bash
//! # Run the full suite against a local backend
//! gemplay-qa test --env local --base-url http://127.0.0.1:8001
//!
//! # Run a single scenario
//! gemplay-qa test --env preview --scenario 7
//!
//! # Run multiple rounds in parallel
//! gemplay-qa test --env staging --rounds 5 --parallel
//!
//! # List available scenarios
//! gemplay-qa list --detailed
//!
//! # Watch the bot fleet for cycle violations
//! gemplay-qa probe --env preview --samples 12
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod api;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod probe;
mod results;
mod scenarios;
mod utils;

use cli::Args;
use config::{ConfigFile, EnvConfig, SuiteProfile};
use executor::{BatchRunner, ParallelExecutor, SuiteRunner};
use models::{RoundSummary, Scenario, SuiteConfig, TargetConfig};
use output::{OutputFormat, ResultFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_config = EnvConfig::load();
    let verbose = args.verbose || env_config.verbose.unwrap_or(false);
    init_logger(if verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    match args.command {
        cli::Command::Test(test_args) => {
            run_tests(test_args).await?;
        }
        cli::Command::List(list_args) => {
            list_scenarios(list_args);
        }
        cli::Command::Probe(probe_args) => {
            run_probe(probe_args).await?;
        }
        cli::Command::Results(results_args) => {
            show_results(results_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args)?;
        }
    }

    Ok(())
}

/// Resolve the target from CLI flags, environment variables and the
/// config file, in that order of precedence.
fn resolve_target(
    env_name: &str,
    base_url: Option<String>,
    admin_email: Option<String>,
    admin_password: Option<String>,
    timeout: u64,
    insecure: bool,
    file: &ConfigFile,
    env: &EnvConfig,
) -> Result<TargetConfig> {
    let environment = if env_name == "preview" {
        env.environment_or(env_name)
    } else {
        env_name.to_string()
    };

    let mut target = if let Some(url) = base_url.or_else(|| env.base_url.clone()) {
        let mut target = TargetConfig::new(&environment, url);
        target.admin = file.app.admin.clone();
        target
    } else if let Some(entry) = file.environment(&environment) {
        entry.to_target(&file.app)
    } else {
        anyhow::bail!(
            "No base URL for environment '{environment}': pass --base-url, \
             set GEMPLAY_QA_BASE_URL, or define the environment in the config file"
        );
    };

    target.timeout_secs = if timeout != 30 {
        timeout
    } else {
        env.timeout_or(timeout)
    };

    if insecure {
        target.verify_tls = false;
    }
    if let Some(email) = admin_email.or_else(|| env.admin_email.clone()) {
        target.admin.email = email;
    }
    if let Some(password) = admin_password.or_else(|| env.admin_password.clone()) {
        target.admin.password = password;
    }

    Ok(target)
}

/// Parse a comma-separated list of scenario numbers
fn parse_skip(skip: Option<&str>) -> Result<Vec<u8>> {
    let mut numbers = Vec::new();
    if let Some(list) = skip {
        for part in list.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let number: u8 = part
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid scenario number in --skip: {part}"))?;
            if Scenario::from_number(number).is_none() {
                anyhow::bail!("Unknown scenario number in --skip: {number}");
            }
            numbers.push(number);
        }
    }
    Ok(numbers)
}

/// Resolve which scenarios to run. An explicit `--scenario` always wins;
/// `--all` forces the full suite over any profile or skip list; `None`
/// means the full suite.
fn select_scenarios(
    args: &cli::TestArgs,
    skip: &[u8],
    file: &ConfigFile,
) -> Result<Option<Vec<Scenario>>> {
    if let Some(number) = args.scenario {
        let scenario = Scenario::from_number(number)
            .ok_or_else(|| anyhow::anyhow!("Invalid scenario number: {number}"))?;
        return Ok(Some(vec![scenario]));
    }

    if args.all {
        return Ok(None);
    }

    if let Some(profile_name) = &args.profile {
        let profile = file
            .suite_profile(profile_name)
            .cloned()
            .or_else(|| SuiteProfile::find(profile_name))
            .ok_or_else(|| anyhow::anyhow!("Unknown profile: {profile_name}"))?;
        return Ok(Some(
            profile
                .scenarios
                .iter()
                .filter_map(|n| Scenario::from_number(*n))
                .filter(|s| !skip.contains(&s.number()))
                .collect(),
        ));
    }

    if !skip.is_empty() {
        return Ok(Some(
            Scenario::all()
                .into_iter()
                .filter(|s| !skip.contains(&s.number()))
                .collect(),
        ));
    }

    Ok(None)
}

async fn run_tests(args: cli::TestArgs) -> Result<()> {
    use results::{ResultsStorage, RunConfig, StoredRun};

    let env_config = EnvConfig::load();

    let file = match args.config.clone().or_else(|| env_config.config_file.clone()) {
        Some(path) => ConfigFile::load(&path)?,
        None => ConfigFile::load_default()?,
    };

    let target = resolve_target(
        &args.env,
        args.base_url.clone(),
        args.admin_email.clone(),
        args.admin_password.clone(),
        args.timeout,
        args.insecure,
        &file,
        &env_config,
    )?;

    let mut skip = parse_skip(args.skip.as_deref())?;
    if args.all {
        skip.clear();
    }
    let rounds = if args.rounds != 1 {
        args.rounds
    } else {
        env_config.rounds_or(args.rounds)
    };
    let parallel = args.parallel || env_config.parallel.unwrap_or(false);

    let format_name = if args.format != "table" {
        args.format.clone()
    } else {
        env_config.format.clone().unwrap_or_else(|| args.format.clone())
    };
    let output_format = OutputFormat::from_str(&format_name).unwrap_or(OutputFormat::Table);
    let formatter = ResultFormatter::new(output_format);

    let selected = select_scenarios(&args, &skip, &file)?;

    info!(
        "Running suite against {} at {} ({} rounds)",
        target.environment, target.base_url, rounds
    );

    let mut summaries: Vec<RoundSummary> = Vec::new();

    if parallel {
        let executor = ParallelExecutor::new(args.concurrent).with_timeout(target.timeout_secs);

        match &selected {
            Some(scenarios) => {
                let results = executor
                    .run_scenarios_parallel(&target, scenarios.clone())
                    .await?;
                let summary = RoundSummary::new(1, &target.environment, results);
                println!("{}", formatter.format_summary(&summary));
                summaries.push(summary);
            }
            None if rounds > 1 => {
                let batch_runner = BatchRunner::new(args.concurrent, rounds);
                let batch = batch_runner.run_rounds(&target).await?;

                for summary in &batch {
                    println!("{}", formatter.format_summary(summary));
                }

                let aggregate = BatchRunner::aggregate_results(&batch);
                println!(
                    "{}",
                    formatter.format_aggregate(&aggregate, &target.environment)
                );
                summaries = batch;
            }
            None => {
                let summary = executor.run_all_parallel(&target).await?;
                println!("{}", formatter.format_summary(&summary));
                summaries.push(summary);
            }
        }
    } else {
        let mut config = SuiteConfig::new(target.clone()).with_rounds(rounds);
        config.skip_scenarios = skip.clone();
        let runner = SuiteRunner::new(config)?;

        match &selected {
            Some(scenarios) if scenarios.len() == 1 && rounds == 1 => {
                let result = runner.run_scenario(scenarios[0]).await;
                println!("{}", formatter.format_result(&result));
                if result.message.is_some() {
                    println!("{}", formatter.format_details(&result));
                }
                summaries.push(RoundSummary::new(1, &target.environment, vec![result]));
            }
            Some(scenarios) => {
                let summary = runner.run_scenarios(scenarios).await?;
                println!("{}", formatter.format_summary(&summary));
                summaries.push(summary);
            }
            None if rounds > 1 => {
                let batch = runner.run_rounds(rounds).await?;
                for summary in &batch {
                    println!("{}", formatter.format_summary(summary));
                }
                summaries = batch;
            }
            None => {
                let summary = runner.run_all().await?;
                println!("{}", formatter.format_summary(&summary));
                summaries.push(summary);
            }
        }
    }

    if let Some(path) = &args.output {
        if let Some(summary) = summaries.first() {
            output::write_results_to_file(path, summary, output_format)?;
            println!("✓ Results written to: {path}");
        }
    }

    if args.save && !summaries.is_empty() {
        let storage = ResultsStorage::default_dir()?;
        let mut run = StoredRun::new(&target.environment, &target.base_url).with_config(RunConfig {
            timeout_secs: target.timeout_secs,
            parallel,
            concurrency: args.concurrent,
            skipped_scenarios: skip,
        });

        for (i, summary) in summaries.iter().enumerate() {
            run.add_round(i as u32 + 1, summary);
        }
        run.calculate_aggregate();

        let path = storage.save(&run)?;
        println!("✓ Run stored: {}", path.display());
    }

    if summaries.iter().any(|s| s.has_failures()) {
        std::process::exit(1);
    }

    Ok(())
}

fn list_scenarios(args: cli::ListArgs) {
    if args.categories {
        println!("\nScenario Categories:\n");
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for scenario in Scenario::all() {
            let category = scenario.category();
            match counts.iter_mut().find(|(name, _)| *name == category) {
                Some((_, count)) => *count += 1,
                None => counts.push((category, 1)),
            }
        }
        for (category, count) in counts {
            println!("  {category:10} {count} scenarios");
        }
        println!();
        return;
    }

    println!("\nGemPlay QA Scenarios (14 total)\n");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut current_category = "";

    for scenario in Scenario::all() {
        let category = scenario.category();
        if category != current_category {
            if !current_category.is_empty() {
                println!();
            }
            println!("\n{category} Scenarios:");
            println!("──────────────────────────────────────────────────────────────────────");
            current_category = category;
        }

        if args.detailed {
            let admin = if scenario.requires_admin() {
                "admin"
            } else {
                "player"
            };
            println!(
                "  {:2}. {:22} [{} / {}]",
                scenario.number(),
                scenario.name(),
                scenario.category(),
                admin
            );
        } else {
            println!("  {:2}. {}", scenario.number(), scenario.name());
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if args.profiles {
        println!("Suite Profiles:\n");
        for profile in SuiteProfile::predefined() {
            println!(
                "  {:12} - {} ({} scenarios)",
                profile.name,
                profile.description,
                profile.scenarios.len()
            );
        }
        println!();
    }
}

async fn run_probe(args: cli::ProbeArgs) -> Result<()> {
    use probe::{ProbeConfig, ProbeRunner};

    let env_config = EnvConfig::load();
    let file = ConfigFile::load_default()?;

    let target = resolve_target(
        &args.env,
        args.base_url.clone(),
        args.admin_email.clone(),
        args.admin_password.clone(),
        30,
        args.insecure,
        &file,
        &env_config,
    )?;

    let config = ProbeConfig {
        interval_secs: args.interval,
        samples: args.samples,
    };

    info!(
        "Probing bot activity on {} ({} samples every {}s)",
        target.environment, config.samples, config.interval_secs
    );

    let runner = ProbeRunner::new(target, config)?;
    let outcome = runner.run().await?;

    println!("{}", probe::report::format_outcome(&outcome, true));

    if !outcome.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}

fn show_results(args: cli::ResultsArgs) -> Result<()> {
    use results::{
        ComparisonFormatter, EnvironmentComparator, ReportFormat, ReportGenerator, ResultsStorage,
    };
    use std::path::PathBuf;

    let storage = ResultsStorage::default_dir()?;

    // List environments if nothing specific was requested
    if args.env.is_none() && !args.summary {
        let environments = storage.list_environments()?;

        if environments.is_empty() {
            println!("\nNo stored results found.");
            println!("   Run the suite with: gemplay-qa test --env <name> --save");
            return Ok(());
        }

        println!("\n┌─────────────────────────────────────────────────────────────┐");
        println!("│ Stored Suite Results                                        │");
        println!("├─────────────────────────────────────────────────────────────┤");

        for environment in &environments {
            let runs = storage.list_runs(environment)?;
            if !runs.is_empty() {
                let latest = &runs[0];
                println!(
                    "│ {:25} │ {:3} runs │ Latest: {:.1}% │",
                    environment,
                    runs.len(),
                    latest.pass_rate * 100.0
                );
            }
        }

        println!("└─────────────────────────────────────────────────────────────┘");
        println!("\nUse --env <name> to view details for a specific environment.");
        println!("Use --summary to compare all environments.\n");

        return Ok(());
    }

    // Show comparison summary
    if args.summary {
        let environments = storage.list_environments()?;
        let mut runs = Vec::new();

        for environment in environments {
            if let Some(run) = storage.latest(&environment)? {
                runs.push(run);
            }
        }

        if runs.is_empty() {
            println!("No results to compare.");
            return Ok(());
        }

        let comparison = EnvironmentComparator::compare(&runs);

        match args.format.as_str() {
            "json" => {
                println!("{}", ComparisonFormatter::format_json(&comparison));
            }
            _ => {
                println!("{}", ComparisonFormatter::format_table(&comparison));
            }
        }

        if let Some(export_path) = &args.export {
            let path = PathBuf::from(export_path);
            let format =
                ReportFormat::from_str(path.extension().and_then(|e| e.to_str()).unwrap_or("md"))
                    .unwrap_or(ReportFormat::Markdown);

            let generator = ReportGenerator::new(storage);
            let report = generator.comparison_report(&runs, format);
            std::fs::write(&path, report)?;
            println!("\n✓ Report exported to: {}", path.display());
        }

        return Ok(());
    }

    // Show a specific environment
    if let Some(environment) = &args.env {
        let runs = storage.load_environment(environment)?;

        if runs.is_empty() {
            println!("No results found for environment: {environment}");
            return Ok(());
        }

        let latest = &runs[0];

        match args.format.as_str() {
            "json" => {
                println!("{}", serde_json::to_string_pretty(latest)?);
            }
            _ => {
                println!("\n┌─────────────────────────────────────────────────────────────┐");
                println!("│ Environment: {:46} │", latest.environment);
                println!("├─────────────────────────────────────────────────────────────┤");
                println!("│ Run ID: {:51} │", latest.id);
                println!("│ URL: {:54} │", latest.base_url);
                println!("│ Rounds: {:51} │", latest.rounds);

                if let Some(agg) = &latest.aggregate {
                    println!("├─────────────────────────────────────────────────────────────┤");
                    println!("│ Pass Rate: {:47.1}% │", agg.avg_pass_rate * 100.0);
                    println!("│ Avg Duration: {:44}ms │", agg.avg_duration_ms);
                    println!("├─────────────────────────────────────────────────────────────┤");
                    println!("│ {:30} {:>8} {:>10}   │", "Scenario", "Pass%", "Avg(ms)");
                    println!("├─────────────────────────────────────────────────────────────┤");

                    for (name, stats) in &agg.scenario_stats {
                        let short_name = if name.len() > 30 {
                            format!("{}...", &name[..27])
                        } else {
                            name.clone()
                        };
                        println!(
                            "│ {:30} {:>7.1}% {:>10}   │",
                            short_name,
                            stats.pass_rate * 100.0,
                            stats.avg_duration_ms
                        );
                    }
                }

                println!("└─────────────────────────────────────────────────────────────┘");

                if runs.len() > 1 {
                    println!("\nOther runs ({}):", runs.len() - 1);
                    for run in runs.iter().skip(1).take(5) {
                        let pass_rate = run
                            .aggregate
                            .as_ref()
                            .map(|a| format!("{:.1}%", a.avg_pass_rate * 100.0))
                            .unwrap_or_else(|| "N/A".to_string());
                        println!("  - {} | {} rounds | {}", run.id, run.rounds, pass_rate);
                    }
                }
            }
        }

        if let Some(export_path) = &args.export {
            let path = PathBuf::from(export_path);
            let format =
                ReportFormat::from_str(path.extension().and_then(|e| e.to_str()).unwrap_or("md"))
                    .unwrap_or(ReportFormat::Markdown);

            let generator = ReportGenerator::new(storage);
            let report = generator.environment_report(latest, format);
            std::fs::write(&path, report)?;
            println!("\n✓ Report exported to: {}", path.display());
        }
    }

    Ok(())
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    use config::ProfileManager;
    use std::path::Path;

    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            let config = ConfigFile::example();
            config.save(path)?;
            println!("✓ Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env, format } => {
            if env {
                let env_config = EnvConfig::load();
                env_config.print_summary();
            } else {
                let config = ConfigFile::load_default()?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config)?
                } else {
                    serde_yaml::to_string(&config)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| {
                ConfigFile::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./gemplay-qa.yaml".to_string())
            });

            match ConfigFile::load(&path) {
                Ok(_) => {
                    println!("✓ Configuration file is valid: {path}");
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }

        cli::ConfigAction::Profiles { detailed } => {
            let manager = ProfileManager::new();

            println!("Suite Profiles:");
            println!("{:-<60}", "");
            for profile in manager.list_profiles() {
                if detailed {
                    println!("  {}", profile.name);
                    println!("    Description: {}", profile.description);
                    println!("    Scenarios: {:?}", profile.scenarios);
                    println!(
                        "    Rounds: {}, Parallel: {}",
                        profile.rounds, profile.parallel
                    );
                    println!("    Tags: {:?}", profile.tags);
                    println!();
                } else {
                    println!(
                        "  {:12} - {} ({} scenarios)",
                        profile.name,
                        profile.description,
                        profile.scenarios.len()
                    );
                }
            }
        }

        cli::ConfigAction::Profile { name } => {
            if let Some(profile) = SuiteProfile::find(&name) {
                println!("{}", serde_yaml::to_string(&profile)?);
            } else {
                println!("Suite profile not found: {name}");
                println!("\nAvailable profiles:");
                for p in SuiteProfile::predefined() {
                    println!("  - {}", p.name);
                }
            }
        }

        cli::ConfigAction::Set { key, value, file } => {
            let path = file.unwrap_or_else(|| "./gemplay-qa.yaml".to_string());
            let mut config = if Path::new(&path).exists() {
                ConfigFile::load(&path)?
            } else {
                ConfigFile::default()
            };

            let value_display = value.clone();

            match key.as_str() {
                "app.default_environment" => config.app.default_environment = value,
                "app.default_rounds" => config.app.default_rounds = value.parse()?,
                "app.timeout_secs" => config.app.timeout_secs = value.parse()?,
                "app.parallel" => config.app.parallel = value.parse()?,
                "app.max_concurrent" => config.app.max_concurrent = value.parse()?,
                "app.admin_email" => config.app.admin.email = value,
                _ => {
                    anyhow::bail!("Unknown configuration key: {key}");
                }
            }

            config.save(&path)?;
            println!("✓ Set {key} = {value_display} in {path}");
        }

        cli::ConfigAction::Get { key, file } => {
            let config = if let Some(path) = file {
                ConfigFile::load(&path)?
            } else {
                ConfigFile::load_default()?
            };

            let value = match key.as_str() {
                "app.default_environment" => config.app.default_environment.clone(),
                "app.default_rounds" => config.app.default_rounds.to_string(),
                "app.timeout_secs" => config.app.timeout_secs.to_string(),
                "app.parallel" => config.app.parallel.to_string(),
                "app.max_concurrent" => config.app.max_concurrent.to_string(),
                "app.admin_email" => config.app.admin.email.clone(),
                _ => {
                    anyhow::bail!("Unknown configuration key: {key}");
                }
            };

            println!("{value}");
        }

        cli::ConfigAction::Env => {
            config::env::print_env_help();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args(argv: &[&str]) -> cli::TestArgs {
        let mut full = vec!["gemplay-qa", "test"];
        full.extend_from_slice(argv);
        match Args::parse_from(full).command {
            cli::Command::Test(args) => args,
            _ => panic!("Expected Test command"),
        }
    }

    #[test]
    fn test_select_defaults_to_full_suite() {
        let args = test_args(&[]);
        let selected = select_scenarios(&args, &[], &ConfigFile::default()).unwrap();
        assert!(selected.is_none());
    }

    #[test]
    fn test_select_single_scenario() {
        let args = test_args(&["--scenario", "7"]);
        let selected = select_scenarios(&args, &[], &ConfigFile::default())
            .unwrap()
            .unwrap();
        assert_eq!(selected, vec![Scenario::GiftCommission]);
    }

    #[test]
    fn test_select_profile_honors_skip() {
        let args = test_args(&["--profile", "economy"]);
        let selected = select_scenarios(&args, &[5], &ConfigFile::default())
            .unwrap()
            .unwrap();
        assert_eq!(selected.len(), 3);
        assert!(!selected.contains(&Scenario::GemPurchase));
    }

    #[test]
    fn test_all_overrides_profile_and_skip() {
        let args = test_args(&["--all", "--profile", "economy"]);
        let selected = select_scenarios(&args, &[5, 6], &ConfigFile::default()).unwrap();
        assert!(selected.is_none());
    }

    #[test]
    fn test_parse_skip_rejects_unknown_numbers() {
        assert_eq!(parse_skip(Some("1, 11,14")).unwrap(), vec![1, 11, 14]);
        assert!(parse_skip(Some("15")).is_err());
        assert!(parse_skip(Some("one")).is_err());
    }
}
