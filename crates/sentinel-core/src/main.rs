use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sentinel_core::prelude::*;
use sentinel_core::{certificate, init_tracing};
use sentinel_model::gdpr::{self, FINES_BY_YEAR, GDPR_FINES};
use sentinel_model::{ControlFilter, ControlId, Rating, UserPatch};
use sentinel_scanner::{LogKind, LogLine};
use std::path::PathBuf;
use tokio::sync::mpsc;

const DEFAULT_STATE_DIR: &str = ".sentinel";

fn cli() -> Command {
    Command::new("sentinel")
        .version(sentinel_core::VERSION)
        .about("SentinelGRC governance, risk and compliance toolkit")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (toml, yaml or json)"),
        )
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding persisted snapshots"),
        )
        .subcommand(risks_command())
        .subcommand(vendors_command())
        .subcommand(
            Command::new("controls")
                .about("ISO 27001 control checklist")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list").about("List controls by category").arg(
                        Arg::new("filter")
                            .long("filter")
                            .default_value("all")
                            .help("all, implemented or pending"),
                    ),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Flip a control's implemented flag")
                        .arg(Arg::new("id").required(true).help("Control id, e.g. A.9.2")),
                )
                .subcommand(Command::new("reset").about("Restore catalogue defaults")),
        )
        .subcommand(
            Command::new("dashboard").about("Show compliance metrics").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("scan")
                .about("Run the simulated cloud security scan")
                .arg(
                    Arg::new("s3")
                        .long("s3")
                        .default_value("private")
                        .help("S3 access: private or public"),
                )
                .arg(
                    Arg::new("iam")
                        .long("iam")
                        .default_value("least-privilege")
                        .help("IAM policy: least-privilege or admin-all"),
                )
                .arg(
                    Arg::new("db")
                        .long("db")
                        .default_value("enabled")
                        .help("Database encryption: enabled or disabled"),
                )
                .arg(
                    Arg::new("fast")
                        .long("fast")
                        .action(ArgAction::SetTrue)
                        .help("Skip stage delays"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .action(ArgAction::SetTrue)
                        .help("Print the text report after the transcript"),
                ),
        )
        .subcommand(Command::new("gdpr").about("GDPR enforcement reference data"))
        .subcommand(auth_command())
}

fn risks_command() -> Command {
    let rating = |name: &'static str| {
        Arg::new(name)
            .long(name)
            .value_parser(value_parser!(u8).range(1..=5))
    };

    Command::new("risks")
        .about("Risk register")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List risks, highest score first")
                .arg(Arg::new("search").long("search").help("Filter by title, category or id")),
        )
        .subcommand(
            Command::new("add")
                .about("Add a risk")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("owner").long("owner").required(true))
                .arg(Arg::new("description").long("description"))
                .arg(rating("likelihood").default_value("3"))
                .arg(rating("impact").default_value("3"))
                .arg(Arg::new("status").long("status").default_value("Open"))
                .arg(Arg::new("mitigation").long("mitigation")),
        )
        .subcommand(
            Command::new("update")
                .about("Update fields of a risk")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("title").long("title"))
                .arg(Arg::new("owner").long("owner"))
                .arg(rating("likelihood"))
                .arg(rating("impact"))
                .arg(Arg::new("status").long("status"))
                .arg(Arg::new("mitigation").long("mitigation"))
                .arg(
                    Arg::new("clear-mitigation")
                        .long("clear-mitigation")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("mitigation"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a risk")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("heatmap").about("Likelihood × impact grid"))
        .subcommand(Command::new("demo").about("Load the demo risk register"))
        .subcommand(Command::new("reset").about("Remove every risk"))
}

fn vendors_command() -> Command {
    let answers = Arg::new("answers")
        .long("answers")
        .required(true)
        .help("Comma-separated yes/no/na answers in question order");

    Command::new("vendors")
        .about("Third-party vendor assessments")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List vendors"))
        .subcommand(Command::new("questions").about("Show the security questionnaire"))
        .subcommand(
            Command::new("assess")
                .about("Create a vendor from a questionnaire")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("service").long("service").required(true))
                .arg(Arg::new("criticality").long("criticality").default_value("Medium"))
                .arg(Arg::new("contact").long("contact"))
                .arg(answers.clone()),
        )
        .subcommand(
            Command::new("reassess")
                .about("Re-score a vendor from a new questionnaire")
                .arg(Arg::new("id").required(true))
                .arg(answers),
        )
        .subcommand(
            Command::new("update")
                .about("Update vendor fields")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("service").long("service"))
                .arg(Arg::new("criticality").long("criticality"))
                .arg(Arg::new("contact").long("contact")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a vendor")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("export")
                .about("Write a vendor's assessment certificate")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("demo").about("Load the demo vendor list"))
        .subcommand(Command::new("reset").about("Remove every vendor"))
}

fn auth_command() -> Command {
    Command::new("auth")
        .about("Session management")
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("signup")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout"))
        .subcommand(Command::new("whoami"))
        .subcommand(
            Command::new("profile")
                .about("Edit the signed-in user's profile")
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("email").long("email"))
                .arg(Arg::new("role").long("role"))
                .arg(Arg::new("department").long("department")),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PlatformConfig::load(path).await?,
        None => PlatformConfig::default(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("state-dir") {
        config = config.with_state_dir(dir);
    } else if config.state_dir.is_none() {
        config = config.with_state_dir(DEFAULT_STATE_DIR);
    }
    init_tracing(&config.log)?;

    let platform = Platform::open(config)
        .await
        .context("failed to restore persisted state")?;

    match matches.subcommand() {
        Some(("risks", args)) => risks(&platform, args).await,
        Some(("vendors", args)) => vendors(&platform, args).await,
        Some(("controls", args)) => controls(&platform, args).await,
        Some(("dashboard", args)) => {
            let metrics = platform.dashboard();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print!("{}", metrics.generate_text());
            }
            Ok(())
        }
        Some(("scan", args)) => scan(&platform, args).await,
        Some(("gdpr", _)) => {
            print_gdpr();
            Ok(())
        }
        Some(("auth", args)) => auth(&platform, args).await,
        _ => unreachable!("subcommand_required"),
    }
}

async fn risks(platform: &Platform, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("list", args)) => {
            let query = args.get_one::<String>("search").map_or("", String::as_str);
            let risks = platform.risk_register(query);
            if risks.is_empty() {
                println!("No risks found.");
            }
            for risk in risks {
                println!(
                    "{}  {:>2} {:<8} {:<10} {} ({}, {})",
                    risk.id,
                    risk.score.value(),
                    risk.level().as_str(),
                    risk.status.as_str(),
                    risk.title,
                    risk.category,
                    risk.owner
                );
            }
        }
        Some(("add", args)) => {
            let mut draft = RiskDraft::new(
                string(args, "title"),
                string(args, "category"),
                string(args, "owner"),
            )
            .rated(rating(args, "likelihood")?, rating(args, "impact")?)
            .with_status(string(args, "status").parse()?);
            if let Some(description) = args.get_one::<String>("description") {
                draft = draft.with_description(description);
            }
            if let Some(mitigation) = args.get_one::<String>("mitigation") {
                draft = draft.with_mitigation(mitigation);
            }
            let snapshot = platform.add_risk(draft).await?;
            if let Some(risk) = snapshot.latest() {
                println!("Added {} (score {}, {})", risk.id, risk.score, risk.level());
            }
        }
        Some(("update", args)) => {
            let id: RiskId = string(args, "id").parse()?;
            let mut patch = RiskPatch::new();
            if let Some(title) = args.get_one::<String>("title") {
                patch = patch.title(title);
            }
            if let Some(owner) = args.get_one::<String>("owner") {
                patch = patch.owner(owner);
            }
            if args.contains_id("likelihood") {
                patch = patch.likelihood(rating(args, "likelihood")?);
            }
            if args.contains_id("impact") {
                patch = patch.impact(rating(args, "impact")?);
            }
            if let Some(status) = args.get_one::<String>("status") {
                patch = patch.status(status.parse()?);
            }
            if let Some(mitigation) = args.get_one::<String>("mitigation") {
                patch = patch.mitigation(Some(mitigation.clone()));
            } else if args.get_flag("clear-mitigation") {
                patch = patch.mitigation(None);
            }
            if patch.is_empty() {
                bail!("nothing to update for {id}");
            }
            let snapshot = platform.update_risk(id, patch).await?;
            if let Some(risk) = snapshot.get(id) {
                println!("Updated {} (score {}, {})", risk.id, risk.score, risk.level());
            }
        }
        Some(("delete", args)) => {
            let id: RiskId = string(args, "id").parse()?;
            let snapshot = platform.delete_risk(id).await?;
            println!("Deleted {id}; {} risks remain", snapshot.len());
        }
        Some(("heatmap", _)) => print_heatmap(platform),
        Some(("demo", _)) => {
            let snapshot = platform.load_demo_risks().await?;
            println!("Loaded {} demo risks", snapshot.len());
        }
        Some(("reset", _)) => {
            platform.reset_risks().await?;
            println!("Risk register cleared");
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}

async fn vendors(platform: &Platform, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => {
            let snapshot = platform.vendors();
            if snapshot.is_empty() {
                println!("No vendors found.");
            }
            for vendor in snapshot.iter() {
                println!(
                    "{}  {:>4} {:<14} {:<8} {} ({})",
                    vendor.id,
                    vendor.assessment_score.to_string(),
                    vendor.compliance_status.as_str(),
                    vendor.criticality.as_str(),
                    vendor.name,
                    vendor.service_type
                );
            }
        }
        Some(("questions", _)) => {
            for question in sentinel_model::SECURITY_QUESTIONS {
                println!("{:>2}. {}", question.id, question.text);
            }
        }
        Some(("assess", args)) => {
            let assessment = Assessment::from_answer_list(&string(args, "answers"))?;
            let criticality: Criticality = string(args, "criticality").parse()?;
            let snapshot = platform
                .assess_vendor(
                    &string(args, "name"),
                    &string(args, "service"),
                    criticality,
                    &assessment,
                    args.get_one::<String>("contact").cloned(),
                )
                .await?;
            if let Some(vendor) = snapshot.latest() {
                println!(
                    "Assessed {} {}: {} ({})",
                    vendor.id, vendor.name, vendor.assessment_score, vendor.compliance_status
                );
            }
        }
        Some(("reassess", args)) => {
            let id: VendorId = string(args, "id").parse()?;
            let assessment = Assessment::from_answer_list(&string(args, "answers"))?;
            let snapshot = platform.reassess_vendor(id, &assessment).await?;
            if let Some(vendor) = snapshot.get(id) {
                println!(
                    "Reassessed {}: {} ({})",
                    vendor.id, vendor.assessment_score, vendor.compliance_status
                );
            }
        }
        Some(("update", args)) => {
            let id: VendorId = string(args, "id").parse()?;
            let mut patch = VendorPatch::new();
            if let Some(name) = args.get_one::<String>("name") {
                patch = patch.name(name);
            }
            if let Some(service) = args.get_one::<String>("service") {
                patch = patch.service_type(service);
            }
            if let Some(criticality) = args.get_one::<String>("criticality") {
                patch = patch.criticality(criticality.parse()?);
            }
            if let Some(contact) = args.get_one::<String>("contact") {
                patch = patch.contact(Some(contact.clone()).filter(|c| !c.trim().is_empty()));
            }
            platform.update_vendor(id, patch).await?;
            println!("Updated {id}");
        }
        Some(("delete", args)) => {
            let id: VendorId = string(args, "id").parse()?;
            let snapshot = platform.delete_vendor(id).await?;
            println!("Deleted {id}; {} vendors remain", snapshot.len());
        }
        Some(("export", args)) => {
            let id: VendorId = string(args, "id").parse()?;
            let path = platform.export_certificate(id).await?;
            if let Some(vendor) = platform.vendors().get(id) {
                println!(
                    "{}: {}",
                    vendor.name,
                    certificate::overall_status(vendor.compliance_status)
                );
            }
            println!("Certificate written to {}", path.display());
        }
        Some(("demo", _)) => {
            let snapshot = platform.load_demo_vendors().await?;
            println!("Loaded {} demo vendors", snapshot.len());
        }
        Some(("reset", _)) => {
            platform.reset_vendors().await?;
            println!("Vendor list cleared");
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}

async fn controls(platform: &Platform, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("list", args)) => {
            let filter: ControlFilter = string(args, "filter").parse()?;
            let snapshot = platform.controls();
            for (category, controls) in snapshot.grouped(filter) {
                println!("{category}");
                for control in controls {
                    let mark = if control.implemented { "x" } else { " " };
                    println!("  [{mark}] {:<7} {}", control.id, control.title);
                }
            }
            println!(
                "\n{}% complete ({} of {})",
                snapshot.completion_percentage(),
                snapshot.implemented_count(),
                snapshot.total()
            );
        }
        Some(("toggle", args)) => {
            let id: ControlId = string(args, "id").parse()?;
            let snapshot = platform.toggle_control(&id).await?;
            let implemented = snapshot.get(&id).is_some_and(|c| c.implemented);
            println!(
                "{id} is now {}; {}% complete",
                if implemented { "implemented" } else { "pending" },
                snapshot.completion_percentage()
            );
        }
        Some(("reset", _)) => {
            let snapshot = platform.reset_controls().await?;
            println!("Controls reset; {}% complete", snapshot.completion_percentage());
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}

async fn scan(platform: &Platform, args: &ArgMatches) -> anyhow::Result<()> {
    let config = ScanConfig::new(
        string(args, "s3").parse()?,
        string(args, "iam").parse()?,
        string(args, "db").parse()?,
    );
    let banner = LogLine::initialized();
    print_scan_line(banner.kind, &banner.message);

    let report = if args.get_flag("fast") {
        let report = platform.scan_instant(config).await?;
        for line in &report.lines {
            print_scan_line(line.kind, &line.message);
        }
        report
    } else {
        let (tx, mut rx) = mpsc::channel::<LogLine>(16);
        let printer = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                print_scan_line(line.kind, &line.message);
            }
        });
        let report = platform.run_scan(config, tx).await?;
        printer.await?;
        report
    };

    if args.get_flag("report") {
        println!();
        print!("{}", report.generate_text());
    }
    std::process::exit(if report.passed() { 0 } else { 1 });
}

fn print_scan_line(kind: LogKind, message: &str) {
    match kind {
        LogKind::Info | LogKind::Success => println!("{message}"),
        LogKind::Warning | LogKind::Error => eprintln!("{message}"),
    }
}

async fn auth(platform: &Platform, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("login", args)) => {
            let credentials = Credentials::new(string(args, "email"), string(args, "password"));
            let state = platform.login(&credentials).await?;
            if let Some(user) = state.user() {
                println!("Welcome back, {}", user.name);
            }
        }
        Some(("signup", args)) => {
            let credentials = Credentials::new(string(args, "email"), string(args, "password"));
            let state = platform.signup(&string(args, "name"), &credentials).await?;
            if let Some(user) = state.user() {
                println!("Account created for {}", user.name);
            }
        }
        Some(("logout", _)) => {
            platform.logout().await?;
            println!("Signed out");
        }
        Some(("whoami", _)) => match platform.session().user() {
            Some(user) => {
                println!("{} <{}> [{}]", user.name, user.email, user.initials());
                println!("{}, {}", user.role, user.department);
            }
            None => println!("Not signed in"),
        },
        Some(("profile", args)) => {
            let patch = UserPatch {
                name: args.get_one::<String>("name").cloned(),
                email: args.get_one::<String>("email").cloned(),
                role: args.get_one::<String>("role").cloned(),
                department: args.get_one::<String>("department").cloned(),
                ..UserPatch::default()
            };
            let state = platform.update_profile(patch).await?;
            if let Some(user) = state.user() {
                println!("Profile saved for {}", user.name);
            }
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}

fn print_heatmap(platform: &Platform) {
    let points = platform.heatmap();
    println!("Impact ↓ / Likelihood →");
    for impact in Rating::all().collect::<Vec<_>>().into_iter().rev() {
        let row: Vec<String> = Rating::all()
            .map(|likelihood| {
                let n = points
                    .iter()
                    .filter(|p| p.likelihood == likelihood && p.impact == impact)
                    .count();
                format!("{n:>3}")
            })
            .collect();
        println!("{} |{}", impact.value(), row.join(""));
    }
    println!("    {}", Rating::all().map(|r| format!("{:>3}", r.value())).collect::<String>());
}

fn print_gdpr() {
    let summary = gdpr::summarize(&GDPR_FINES);
    #[allow(clippy::cast_precision_loss)]
    let total = summary.total_eur as f64;
    println!("=== GDPR Enforcement ===\n");
    println!("Total: {}", gdpr::format_eur(total));
    println!("Average: {}", gdpr::format_eur(summary.average_eur));
    if let Some(largest) = summary.largest {
        println!("Largest: {} ({})", largest.company, largest.country);
    }

    println!("\n--- Largest fines ---");
    for fine in gdpr::by_amount_desc(&GDPR_FINES) {
        #[allow(clippy::cast_precision_loss)]
        let amount = fine.amount_eur as f64;
        println!(
            "{:>9}  {:<24} {:<11} {}  {}",
            gdpr::format_eur(amount),
            fine.company,
            fine.country,
            fine.date,
            fine.violation
        );
    }

    println!("\n--- Fines by year ---");
    for year in FINES_BY_YEAR {
        println!("{}  €{}M across {} fines", year.year, year.amount_millions, year.count);
    }
}

fn string(args: &ArgMatches, name: &str) -> String {
    args.get_one::<String>(name).cloned().unwrap_or_default()
}

fn rating(args: &ArgMatches, name: &str) -> anyhow::Result<Rating> {
    let value = args
        .get_one::<u8>(name)
        .copied()
        .with_context(|| format!("missing --{name}"))?;
    Ok(Rating::new(value)?)
}
