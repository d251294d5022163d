use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use skillsphere_cli::commands::{clusters, recommend};
use skillsphere_cli::input::RunConfig;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("Path to a JSON configuration file. Missing fields use defaults.")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .short('c')
        .long("catalog")
        .help(
            "Path to the course catalog (*.csv or *.tsv). Overrides the catalog_path \
             specified in the configuration file. Falls back to the built-in sample \
             catalog when missing or unreadable.",
        )
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn k_arg() -> Arg {
    Arg::new("k")
        .short('k')
        .long("k")
        .help("Number of clusters. Overrides n_clusters from the configuration file.")
        .value_parser(clap::value_parser!(usize))
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .help("Random seed for the K-means initializations.")
        .value_parser(clap::value_parser!(u64))
}

fn n_init_arg() -> Arg {
    Arg::new("n_init")
        .long("n-init")
        .help("Number of K-means runs with different seeds. The lowest inertia wins.")
        .value_parser(clap::value_parser!(usize))
}

fn init_arg() -> Arg {
    Arg::new("init")
        .long("init")
        .help("Centroid initialization method.")
        .value_parser(["kmeans++", "random"])
}

fn with_fit_args(cmd: Command) -> Command {
    cmd.arg(config_arg())
        .arg(catalog_arg())
        .arg(k_arg())
        .arg(seed_arg())
        .arg(n_init_arg())
        .arg(init_arg())
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("SKILLSPHERE_LOG", "error,skillsphere=info"))
        .init();

    let matches = Command::new("skillsphere")
        .version(clap::crate_version!())
        .about("SkillSphere - course recommendations and catalog clustering")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("recommend")
                .about("Recommend courses for a skill or a partial course title")
                .arg(
                    Arg::new("query")
                        .help("Skill or title fragment. Several values are merged into one list.")
                        .required(true)
                        .num_args(1..)
                        .value_parser(clap::builder::StringValueParser::new()),
                )
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .help("Maximum number of courses. Overrides recommend_limit from the configuration file.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Also write the recommendations to this file (*.csv or *.tsv).")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the result as JSON.")
                        .action(ArgAction::SetTrue),
                )
                .arg(config_arg())
                .arg(catalog_arg()),
        )
        .subcommand(
            Command::new("clusters")
                .about("Group courses by price and popularity")
                .subcommand_required(true)
                .subcommand(with_fit_args(
                    Command::new("describe").about("Fit clusters and describe each of them"),
                ))
                .subcommand(with_fit_args(
                    Command::new("top")
                        .about("List the most subscribed courses of a cluster")
                        .arg(
                            Arg::new("cluster")
                                .long("cluster")
                                .help("Cluster id")
                                .required(true)
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("n")
                                .short('n')
                                .long("n")
                                .help("Number of courses to list")
                                .default_value("5")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(with_fit_args(
                    Command::new("predict")
                        .about("Find the cluster closest to a price and popularity preference")
                        .arg(
                            Arg::new("price")
                                .long("price")
                                .help("Preferred price")
                                .required(true)
                                .allow_negative_numbers(true)
                                .value_parser(clap::value_parser!(f64)),
                        )
                        .arg(
                            Arg::new("popularity")
                                .long("popularity")
                                .help("Preferred number of subscribers")
                                .required(true)
                                .allow_negative_numbers(true)
                                .value_parser(clap::value_parser!(f64)),
                        ),
                ))
                .subcommand(with_fit_args(
                    Command::new("elbow")
                        .about("Print inertia for k = 1..=max-k to help choose k")
                        .arg(
                            Arg::new("max_k")
                                .long("max-k")
                                .help("Largest k to try")
                                .default_value("10")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(with_fit_args(
                    Command::new("export")
                        .about("Write cluster assignments to CSV and optionally an HTML report")
                        .arg(
                            Arg::new("output_file")
                                .short('o')
                                .long("output")
                                .help("Path of the assignment CSV")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("report")
                                .long("report")
                                .help("Path of the HTML cluster report")
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        ),
                )),
        )
        .subcommand(
            Command::new("config")
                .about("Print the default configuration as JSON")
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Write the configuration to this file instead of stdout")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("recommend", sub_m)) => handle_recommend(sub_m),
        Some(("clusters", sub_m)) => handle_clusters(sub_m),
        Some(("config", sub_m)) => handle_config(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn handle_recommend(matches: &ArgMatches) -> Result<()> {
    let config = RunConfig::from_arguments(matches)?;
    let queries: Vec<String> = matches
        .get_many::<String>("query")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let output: Option<&PathBuf> = matches.get_one("output_file");
    recommend::run_recommend(&config, &queries, output, matches.get_flag("json"))
}

fn handle_clusters(matches: &ArgMatches) -> Result<()> {
    let (name, sub_m) = match matches.subcommand() {
        Some(pair) => pair,
        None => unreachable!("Subcommand is required by CLI configuration"),
    };
    let config = RunConfig::from_arguments(sub_m)?;
    log::info!(
        "[SkillSphere::Clusters] {} with k = {}, seed = {}",
        name,
        config.engine.n_clusters,
        config.engine.kmeans.seed
    );

    match name {
        "describe" => clusters::run_describe(&config),
        "top" => {
            let cluster = *sub_m.get_one::<usize>("cluster").unwrap_or(&0);
            let n = *sub_m.get_one::<usize>("n").unwrap_or(&5);
            clusters::run_top(&config, cluster, n)
        }
        "predict" => {
            let price = *sub_m.get_one::<f64>("price").unwrap_or(&0.0);
            let popularity = *sub_m.get_one::<f64>("popularity").unwrap_or(&0.0);
            clusters::run_predict(&config, price, popularity)
        }
        "elbow" => {
            let max_k = *sub_m.get_one::<usize>("max_k").unwrap_or(&10);
            clusters::run_elbow(&config, max_k)
        }
        "export" => {
            let output = sub_m
                .get_one::<PathBuf>("output_file")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("skillsphere_clusters.csv"));
            let report: Option<&PathBuf> = sub_m.get_one("report");
            clusters::run_export(&config, &output, report.map(|p| p.as_path()))
        }
        _ => unreachable!(),
    }
}

fn handle_config(matches: &ArgMatches) -> Result<()> {
    let json = serde_json::to_string_pretty(&RunConfig::new())?;
    match matches.get_one::<PathBuf>("output_file") {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .with_context(|| format!("Failed to write configuration to {:?}", path))?;
            log::info!("Default configuration written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
