//! localdev CLI
//!
//! Entry point for the `localdev` command-line tool.

use clap::{Args, Parser, Subcommand};
use localdev::config::{self, parse_list, FieldRequests};
use localdev::{ConfigOperation, FileRegistry};
use std::env;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "localdev")]
#[command(about = "Containerized local development environments", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the project configuration
    Config(Box<ConfigFlags>),

    /// Print the resolved project configuration
    Describe {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ConfigFlags {
    /// Project name (letters, digits, hyphens, dots)
    #[arg(long)]
    project_name: Option<String>,

    /// Project type (php, drupal, drupal11, wordpress, ...)
    #[arg(long)]
    project_type: Option<String>,

    /// Document root relative to the project root
    #[arg(long)]
    docroot: Option<String>,

    /// PHP version, e.g. 8.3
    #[arg(long)]
    php_version: Option<String>,

    /// Database as TYPE:VERSION, e.g. mariadb:10.11
    #[arg(long)]
    database: Option<String>,

    /// Webserver type, e.g. nginx-fpm, apache-fpm
    #[arg(long)]
    webserver_type: Option<String>,

    /// Custom web container image
    #[arg(long)]
    web_image: Option<String>,

    /// Node.js version
    #[arg(long)]
    nodejs_version: Option<String>,

    /// Composer root directory relative to the project root
    #[arg(long)]
    composer_root: Option<String>,

    /// Composer version
    #[arg(long)]
    composer_version: Option<String>,

    /// Container timezone, e.g. America/Chicago
    #[arg(long)]
    timezone: Option<String>,

    /// Top-level domain for project hostnames
    #[arg(long)]
    project_tld: Option<String>,

    /// Seconds to wait for containers on start
    #[arg(long)]
    default_container_timeout: Option<String>,

    #[arg(long)]
    router_http_port: Option<String>,

    #[arg(long)]
    router_https_port: Option<String>,

    #[arg(long)]
    host_db_port: Option<String>,

    #[arg(long)]
    host_webserver_port: Option<String>,

    #[arg(long)]
    host_https_port: Option<String>,

    #[arg(long)]
    mailpit_http_port: Option<String>,

    /// Enable Xdebug
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    xdebug_enabled: Option<bool>,

    /// Do not mount the project into the web container
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    no_project_mount: Option<bool>,

    /// Suppress the upload-dirs warning
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    disable_upload_dirs_warning: Option<bool>,

    /// Enable corepack in the web container
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    corepack_enable: Option<bool>,

    /// Working directory for the web service
    #[arg(long)]
    web_working_dir: Option<String>,

    /// Working directory for the db service
    #[arg(long)]
    db_working_dir: Option<String>,

    /// Reset the web image to the default
    #[arg(long)]
    web_image_default: bool,

    /// Reset the composer root to the default
    #[arg(long)]
    composer_root_default: bool,

    /// Reset the web working directory to the image default
    #[arg(long)]
    web_working_dir_default: bool,

    /// Reset the db working directory to the image default
    #[arg(long)]
    db_working_dir_default: bool,

    /// Reset all container images to their defaults
    #[arg(long)]
    image_defaults: bool,

    /// Reset all working directories to their image defaults
    #[arg(long)]
    working_dir_defaults: bool,

    /// Comma-separated additional hostnames ("" clears)
    #[arg(long)]
    additional_hostnames: Option<String>,

    /// Comma-separated additional FQDNs ("" clears)
    #[arg(long)]
    additional_fqdns: Option<String>,

    /// Comma-separated containers to omit ("" clears)
    #[arg(long)]
    omit_containers: Option<String>,

    /// Comma-separated upload directories ("" clears)
    #[arg(long)]
    upload_dirs: Option<String>,

    /// Comma-separated extra packages for the web image ("" clears)
    #[arg(long)]
    webimage_extra_packages: Option<String>,

    /// Comma-separated extra packages for the db image ("" clears)
    #[arg(long)]
    dbimage_extra_packages: Option<String>,

    /// Comma-separated KEY=VALUE web environment ("" clears)
    #[arg(long)]
    web_environment: Option<String>,

    /// Append comma-separated KEY=VALUE entries to the web environment
    #[arg(long)]
    web_environment_add: Option<String>,

    /// Auto-detect and fill unset fields without prompting
    #[arg(long)]
    auto: bool,

    /// Migrate stale per-type defaults after changing the project type
    #[arg(long)]
    update: bool,

    /// Print the project's configuration file location and exit
    #[arg(long)]
    show_config_location: bool,
}

impl ConfigFlags {
    fn to_requests(&self) -> FieldRequests {
        FieldRequests {
            name: self.project_name.clone(),
            project_type: self.project_type.clone(),
            docroot: self.docroot.clone(),
            php_version: self.php_version.clone(),
            database: self.database.clone(),
            webserver_type: self.webserver_type.clone(),
            web_image: self.web_image.clone(),
            nodejs_version: self.nodejs_version.clone(),
            composer_root: self.composer_root.clone(),
            composer_version: self.composer_version.clone(),
            timezone: self.timezone.clone(),
            project_tld: self.project_tld.clone(),
            default_container_timeout: self.default_container_timeout.clone(),
            router_http_port: self.router_http_port.clone(),
            router_https_port: self.router_https_port.clone(),
            host_db_port: self.host_db_port.clone(),
            host_webserver_port: self.host_webserver_port.clone(),
            host_https_port: self.host_https_port.clone(),
            mailpit_http_port: self.mailpit_http_port.clone(),
            xdebug_enabled: self.xdebug_enabled,
            no_project_mount: self.no_project_mount,
            disable_upload_dirs_warning: self.disable_upload_dirs_warning,
            corepack_enable: self.corepack_enable,
            web_working_dir: self.web_working_dir.clone(),
            db_working_dir: self.db_working_dir.clone(),
            web_image_default: self.web_image_default,
            composer_root_default: self.composer_root_default,
            web_working_dir_default: self.web_working_dir_default,
            db_working_dir_default: self.db_working_dir_default,
            image_defaults: self.image_defaults,
            working_dir_defaults: self.working_dir_defaults,
            additional_hostnames: self.additional_hostnames.as_deref().map(parse_list),
            additional_fqdns: self.additional_fqdns.as_deref().map(parse_list),
            omit_containers: self.omit_containers.as_deref().map(parse_list),
            upload_dirs: self.upload_dirs.as_deref().map(parse_list),
            webimage_extra_packages: self.webimage_extra_packages.as_deref().map(parse_list),
            dbimage_extra_packages: self.dbimage_extra_packages.as_deref().map(parse_list),
            web_environment: self.web_environment.as_deref().map(parse_list),
            web_environment_add: self.web_environment_add.as_deref().map(parse_list),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(flags) => run_config(&flags),
        Commands::Describe { json } => run_describe(json),
    }
}

fn current_dir() -> PathBuf {
    match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Cannot determine working directory: {}", e);
            process::exit(1);
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map(PathBuf::from).unwrap_or_default()
}

fn run_config(flags: &ConfigFlags) {
    let cwd = current_dir();

    if flags.show_config_location {
        match config::show_config_location(&cwd) {
            Ok(path) => {
                println!("The project config location is {}", path.display());
                return;
            }
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }

    let home = home_dir();
    let mut registry = match FileRegistry::load(FileRegistry::default_path(&home)) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error loading project registry: {}", e);
            process::exit(1);
        }
    };

    let operation = ConfigOperation {
        cwd,
        home,
        requests: flags.to_requests(),
        auto: flags.auto,
        update: flags.update,
        registry: &mut registry,
    };

    match operation.run() {
        Ok(outcome) => {
            if let Some(alias) = &outcome.resolved_alias {
                println!(
                    "Project type '{}' resolves to '{}'.",
                    alias, outcome.resolved_type
                );
            }
            println!(
                "Configuring a '{}' project named '{}' with docroot '{}'.",
                outcome.resolved_type, outcome.name, outcome.config.docroot
            );
            println!("Configuration complete. You may now run 'localdev start'.");
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run_describe(json_output: bool) {
    let cwd = current_dir();

    let (root, merged) = match config::describe(&cwd) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if json_output {
        let output = serde_json::json!({
            "root": root,
            "config": merged.config,
            "sources": merged.sources,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        let config = &merged.config;
        println!("Project root: {}", root.display());
        println!("  Name: {}", config.name);
        println!("  Type: {}", config.project_type);
        println!("  Docroot: '{}'", config.docroot);
        if !config.php_version.is_empty() {
            println!("  PHP: {}", config.php_version);
        }
        if !config.database.is_empty() {
            println!(
                "  Database: {}:{}",
                config.database.db_type, config.database.version
            );
        }
        if !config.additional_hostnames.is_empty() {
            println!("  Hostnames: {}", config.additional_hostnames.join(", "));
        }
        if !config.web_environment.is_empty() {
            println!("  Web environment: {}", config.web_environment.join(", "));
        }
        println!();
        println!("Sources (ascending precedence):");
        for source in &merged.sources {
            println!("  {}", source.display());
        }
    }
}
