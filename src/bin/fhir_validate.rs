use clap::{Arg, ArgAction, Command};
use octofhir_fhir_resources::{ContentType, ValidationConfig, catalog};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("fhir-validate")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Octofhir Team")
        .about("Validate FHIR resource files against the DSTU2 model catalog")
        .arg(
            Arg::new("type")
                .value_name("TYPE")
                .help("Catalog type name to validate as, e.g. Patient")
                .required(true),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .help("Files to validate")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("content-type")
                .short('t')
                .long("content-type")
                .value_name("TYPE")
                .help("Force the content type (json, yaml) instead of using the file extension"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Validation config file (JSON or YAML)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("print")
                .short('p')
                .long("print")
                .help("Print each validated resource as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ValidationConfig::from_file(path)?,
        None => ValidationConfig::default(),
    };
    if let Some(name) = matches.get_one::<String>("content-type") {
        let content_type =
            ContentType::parse(name).ok_or_else(|| format!("unknown content type '{name}'"))?;
        config = config.with_content_type(content_type);
        config.infer_content_type = false;
    }

    let type_name = matches
        .get_one::<String>("type")
        .ok_or("missing type name")?;
    let print = matches.get_flag("print");

    let mut failures = 0usize;
    let files: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    for path in &files {
        match catalog()
            .validate_file_async(type_name, path, &config)
            .await
        {
            Ok(instance) => {
                println!("✅ {}: {}", path.display(), instance);
                if print {
                    println!("{}", serde_json::to_string_pretty(&instance.to_value()?)?);
                }
            }
            Err(err) => {
                failures += 1;
                println!("❌ {}: [{}] {}", path.display(), err.stage(), err);
            }
        }
    }

    println!(
        "\n📊 {} checked, {} valid, {} failed",
        files.len(),
        files.len() - failures,
        failures
    );

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
