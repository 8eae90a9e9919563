use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "vcadmin", version, about = "Administer vCenter inventory: hosts, clusters, datacenters and distributed switching")]
pub struct Cli {
    #[clap(flatten)]
    pub connection: ConnectionOptions,

    #[clap(long, global = true, help = "Print results as JSON.")]
    pub json: bool,

    #[clap(short, long, action = ArgAction::Count, global = true)]
    #[clap(help = "Increase log verbosity (-d debug, -dd trace). RUST_LOG is honoured when not set.")]
    pub debug: u8,

    #[clap(subcommand)]
    pub command: Command,
}

/// How to reach and authenticate against vCenter.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionOptions {
    #[clap(short, long, env = "VCADMIN_SERVER")]
    #[clap(
        help = "vCenter hostname or IP. Default to VCADMIN_SERVER environment variable or $HOME/.config/vcadmin.json file."
    )]
    pub server: Option<String>,

    #[clap(long, env = "VCADMIN_PORT", help = "HTTPS port (443 when unset).")]
    pub port: Option<u16>,

    #[clap(short, long, env = "VCADMIN_USERNAME")]
    #[clap(
        help = "vCenter user, e.g. administrator@vsphere.local. Default to VCADMIN_USERNAME environment variable or $HOME/.config/vcadmin.json file."
    )]
    pub username: Option<String>,

    #[clap(long, env = "VCADMIN_PASSWORD", hide_env_values = true)]
    #[clap(
        help = "vCenter password. Default to VCADMIN_PASSWORD environment variable or $HOME/.config/vcadmin.json file."
    )]
    pub password: Option<String>,

    #[clap(long, env = "VCADMIN_INSECURE", help = "Skip TLS certificate verification.")]
    pub insecure: bool,

    #[clap(long, env = "VCADMIN_TIMEOUT_SECS", help = "HTTP request timeout in seconds (30 when unset).")]
    pub timeout_secs: Option<u64>,

    #[clap(long, env = "VCADMIN_API_RELEASE", help = "vim25 release used for VI/JSON calls (8.0.1.0 when unset).")]
    pub api_release: Option<String>,

    #[clap(long, env = "VCADMIN_CONFIG", help = "JSON config file. Default to $HOME/.config/vcadmin.json.")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the credentials open a valid session.
    CheckSession,

    #[clap(flatten)]
    Inventory(InventoryCommand),
}

/// Operations that change (or look up) vCenter inventory.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum InventoryCommand {
    /// Attach an ESXi host to a cluster, accepting its certificate.
    AddHost {
        #[clap(long, help = "ESXi hostname or IP.")]
        host: String,
        #[clap(long, help = "ESXi user (usually root).")]
        host_username: String,
        #[clap(long, env = "VCADMIN_HOST_PASSWORD", hide_env_values = true)]
        host_password: String,
        #[clap(long, help = "Cluster to attach the host to.")]
        cluster: String,
    },

    /// Create a cluster (DRS enabled) in a datacenter or folder.
    CreateCluster {
        #[clap(long, help = "Datacenter or folder name.")]
        location: String,
        #[clap(long)]
        name: String,
    },

    /// Delete every cluster with this name.
    RemoveCluster {
        #[clap(long)]
        name: String,
    },

    /// Create a datacenter in a folder.
    CreateDatacenter {
        #[clap(long, default_value = "Datacenters", help = "Parent folder name.")]
        folder: String,
        #[clap(long)]
        name: String,
    },

    /// Delete every datacenter with this name, including its contents.
    RemoveDatacenter {
        #[clap(long)]
        name: String,
    },

    /// Create a distributed switch and a port group on it.
    CreateSwitch {
        #[clap(long)]
        port_group: String,
        #[clap(long)]
        switch: String,
        #[clap(long)]
        datacenter: String,
        #[clap(long, help = "Port group size (1000 when unset).")]
        ports: Option<u32>,
    },

    /// Delete every distributed switch with this name.
    RemoveSwitch {
        #[clap(long)]
        name: String,
    },

    /// Delete every distributed port group with this name.
    RemovePortGroup {
        #[clap(long)]
        name: String,
    },
}
