//! os-support - host metrics and mount helper CLI

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use os_support::{bytes_to_gb, version_string, HostMetrics, MountStatus, SupportConfig};

#[derive(Parser)]
#[command(name = "os-support")]
#[command(about = "Host disk, memory, network and uptime metrics", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/os-support/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every metric
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show disk space for the configured volume
    Disk,

    /// Show RAM usage
    Ram,

    /// Count physical Ethernet adapters
    Net,

    /// Show system uptime
    Uptime,

    /// Mount a storage device at a location
    Mount {
        device: String,
        location: String,
    },

    /// Unmount a location
    Unmount {
        location: String,
    },

    /// Show version
    Version,

    /// Show configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn init_logging(config: &SupportConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let initializing = matches!(cli.command, Commands::Config { init: true, .. });
    let config = match SupportConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(_) if initializing => SupportConfig::default(),
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config, cli.verbose);

    let os = HostMetrics::from_config(&config);

    match cli.command {
        Commands::Status { json } => {
            let snapshot = os.snapshot();
            if json {
                match snapshot.to_json() {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        error!("Failed to serialize snapshot: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{}", snapshot.version);
                println!("Platform:  {} ({})", snapshot.platform, snapshot.os_version.as_deref().unwrap_or("unknown"));
                println!(
                    "Disk:      {:.2} GB free of {:.2} GB ({:.1}% used) at {}",
                    snapshot.disk.free_gb,
                    snapshot.disk.total_gb,
                    snapshot.disk.used_percent,
                    snapshot.disk.path.display()
                );
                println!(
                    "RAM:       {:.2} GB used of {:.2} GB ({:.1}%)",
                    bytes_to_gb(snapshot.memory.used_bytes),
                    snapshot.memory.total_gb,
                    snapshot.memory.usage_percent
                );
                println!("Ethernet:  {}", snapshot.ethernet_devices);
                match snapshot.uptime {
                    Some(up) => println!("Uptime:    {} ({}s)", up, snapshot.uptime_seconds),
                    None => println!("Uptime:    unknown"),
                }
                if let Some(boot) = &snapshot.boot_time {
                    println!("Booted:    {}", boot);
                }
                println!("{}", snapshot.last_error);
            }
        }

        Commands::Disk => {
            println!("Volume:   {}", os.disk_path().display());
            println!("Total:    {} bytes ({:.2} GB)", os.total_disk_space_bytes(), os.total_disk_space_gb());
            println!("Free:     {} bytes ({:.2} GB)", os.free_disk_space_bytes(), os.free_disk_space_gb());
            println!("Free %:   {:.2}", os.free_disk_space_percent());
            println!("Used %:   {:.2}", os.used_disk_space_percent());
        }

        Commands::Ram => {
            println!("Total:    {} bytes ({:.2} GB)", os.total_ram_bytes(), os.total_ram_gb());
            println!("Used:     {} bytes", os.used_ram_bytes());
            println!("Free:     {} bytes", os.free_ram_bytes());
            println!("Usage %:  {:.2}", os.ram_usage_percent());
            println!("Process:  {} bytes resident", os.process_resident_bytes());
        }

        Commands::Net => {
            let count = os.ethernet_device_count();
            println!("{}", count);
            if count < 0 {
                return ExitCode::FAILURE;
            }
        }

        Commands::Uptime => {
            println!("{}", os.uptime_seconds());
            match os.uptime_hms() {
                Some(up) => {
                    println!("\tHours: {}", up.hours);
                    println!("\tMins: {}", up.mins);
                    println!("\tSecs: {}", up.secs);
                }
                None => return ExitCode::FAILURE,
            }
        }

        Commands::Mount { device, location } => {
            let status = os.mount_storage_device(&device, &location);
            println!("{} ({})", status, status.code());
            if status == MountStatus::Failed {
                eprintln!("{}", os.last_error());
                return ExitCode::FAILURE;
            }
        }

        Commands::Unmount { location } => {
            let status = os.unmount_storage_device(&location);
            println!("{} ({})", status, status.code());
            if status == MountStatus::Failed {
                eprintln!("{}", os.last_error());
                return ExitCode::FAILURE;
            }
        }

        Commands::Version => {
            println!("{}", version_string());
        }

        Commands::Config { init, force } => {
            if init {
                let Some(path) = cli.config.clone().or_else(SupportConfig::default_path) else {
                    error!("No config directory available on this system");
                    return ExitCode::FAILURE;
                };
                if let Err(e) = SupportConfig::init(&path, force) {
                    error!("Failed to write {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
                println!("Wrote {}", path.display());
            } else {
                match toml::to_string_pretty(&config) {
                    Ok(out) => print!("{}", out),
                    Err(e) => {
                        error!("Failed to render config: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
    }

    ExitCode::SUCCESS
}
