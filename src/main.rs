//! sshcfg - edit your OpenSSH client config from the command line
//!
//! Adds, patches, deletes and prints `Host` sections of `~/.ssh/config`,
//! keeping a backup of the previous file on every write.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sshcfg::config::Settings;
use sshcfg::integrations::shell::{detect_shell, Shell};
use sshcfg::ssh_config::{
    sections_to_yaml, ConfigStore, SectionUpdate, Selection, SshConfig, StdinConfirm,
};

/// Edit your SSH config file
#[derive(Parser, Debug)]
#[command(name = "sshcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Custom settings file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// SSH config file to edit instead of the configured one
    #[arg(short = 'f', long, value_name = "PATH")]
    pub ssh_config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a section to your SSH config file
    Add {
        /// Section name used on the Host line
        alias: String,

        /// Hostname or IP address used to establish the connection
        #[arg(short = 'H', long)]
        hostname: String,

        /// Username for the connection
        #[arg(short, long)]
        user: Option<String>,

        /// Private key used for authentication
        #[arg(short, long)]
        identity_file: Option<String>,

        /// Port of the remote SSH daemon, only needed when not 22
        #[arg(short, long)]
        port: Option<String>,
    },

    /// Delete sections from your SSH config file
    Delete {
        /// Section names
        #[arg(required = true)]
        aliases: Vec<String>,
    },

    /// Print sections from your SSH config file as YAML
    Get {
        /// Section names, or `all`
        #[arg(required = true)]
        aliases: Vec<String>,
    },

    /// Update fields of a section
    ///
    /// Fields: host, hostName, user, identityFile, port.
    /// Example: `sshcfg patch dev2 host dev3 port 32`
    Patch {
        /// Section name
        alias: String,

        /// Field and value pairs
        #[arg(required = true, num_args = 2.., value_name = "FIELD VALUE")]
        fields: Vec<String>,
    },

    /// List section names, one per line
    Aliases,

    /// Print a shell completion script
    Completions {
        /// Target shell, detected from $SHELL when omitted
        #[arg(value_enum)]
        shell: Option<Shell>,
    },

    /// Write the default settings file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings always reach stderr, --debug adds the flow
    let filter = if cli.debug { "sshcfg=debug" } else { "sshcfg=warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    let mut ssh = settings.ssh.clone();
    if let Some(ref path) = cli.ssh_config {
        ssh = ssh.with_config_path(path);
    }
    let store = ssh.store();

    match cli.command {
        Commands::Add {
            alias,
            hostname,
            user,
            identity_file,
            port,
        } => {
            let update = SectionUpdate {
                host: None,
                host_name: Some(hostname),
                user,
                identity_file,
                port,
            };
            cmd_add(&store, &alias, &update)
        }
        Commands::Delete { aliases } => cmd_delete(&store, &aliases),
        Commands::Get { aliases } => cmd_get(&store, &Selection::from_args(&aliases)),
        Commands::Patch { alias, fields } => {
            // Unknown field names are rejected before the file is read
            let update = SectionUpdate::from_pairs(&fields)?;
            cmd_patch(&store, &alias, &update)
        }
        Commands::Aliases => cmd_aliases(&store),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Init => cmd_init(&settings, cli.config.as_deref()),
    }
}

/// Load and parse the SSH config
fn load(store: &ConfigStore) -> Result<SshConfig> {
    let text = store
        .load(&StdinConfirm)
        .context(format!("Failed to load {}", store.config_path().display()))?;
    Ok(SshConfig::parse(&text))
}

/// Back up the old file and write the rendered config
fn save(store: &ConfigStore, config: &SshConfig) -> Result<()> {
    store
        .backup_and_save(config.raw_text())
        .context(format!("Failed to save {}", store.config_path().display()))
}

/// Add section command
fn cmd_add(store: &ConfigStore, alias: &str, update: &SectionUpdate) -> Result<()> {
    let mut config = load(store)?;
    let host = config.add(alias, update)?.host.clone();
    save(store, &config)?;
    println!("Added section: {}", host);
    Ok(())
}

/// Delete sections command
fn cmd_delete(store: &ConfigStore, aliases: &[String]) -> Result<()> {
    let mut config = load(store)?;
    let removed = config.delete(aliases)?;
    save(store, &config)?;
    println!("Deleted {} section(s): {}", removed, aliases.join(", "));
    Ok(())
}

/// Print sections command
fn cmd_get(store: &ConfigStore, selection: &Selection) -> Result<()> {
    let config = load(store)?;
    let sections: Vec<_> = config.get(selection).into_iter().cloned().collect();

    if sections.is_empty() {
        println!("No matching sections found.");
    } else {
        print!("{}", sections_to_yaml(&sections)?);
    }
    Ok(())
}

/// Patch section command
fn cmd_patch(store: &ConfigStore, alias: &str, update: &SectionUpdate) -> Result<()> {
    let mut config = load(store)?;
    let host = config.patch(alias, update)?.host.clone();
    save(store, &config)?;
    if host == alias {
        println!("Patched section: {}", host);
    } else {
        println!("Patched section: {} -> {}", alias, host);
    }
    Ok(())
}

/// List aliases command
fn cmd_aliases(store: &ConfigStore) -> Result<()> {
    // Completion scripts call this, so never prompt
    if !store.config_path().exists() {
        return Ok(());
    }
    let text = store.load(&false)?;
    for host in SshConfig::parse(&text).hosts() {
        println!("{}", host);
    }
    Ok(())
}

/// Print completion script command
fn cmd_completions(shell: Option<Shell>) -> Result<()> {
    let shell = shell
        .or_else(detect_shell)
        .context("Could not detect the shell, pass one of: bash, zsh, fish")?;
    print!("{}", shell.script());
    Ok(())
}

/// Write default settings command
fn cmd_init(settings: &Settings, path: Option<&str>) -> Result<()> {
    let target = path
        .map(|p| std::path::PathBuf::from(shellexpand::tilde(p).as_ref()))
        .unwrap_or_else(Settings::default_config_path);
    if target.exists() {
        anyhow::bail!("Settings file already exists: {}", target.display());
    }
    let written = settings.save(path)?;
    println!("Wrote settings to {}", written.display());
    Ok(())
}
