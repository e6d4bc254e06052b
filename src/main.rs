/// k3sup - apps for k3s and Kubernetes
///
/// Installs applications into an existing cluster through kubectl.
/// Currently supports an OpenFaaS ingress with Let's Encrypt TLS.
mod apps;
mod config;
mod error;
mod k8s;
mod manifest;
mod utils;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::apps::openfaas_ingress::print_post_install_notes;
use crate::apps::OpenFaasIngressInstaller;
use crate::config::{resolve_kubeconfig, InstallRequest};
use crate::k8s::KubectlApplier;
use crate::manifest::{FileNaming, ManifestWriter};

#[derive(Parser)]
#[command(name = "k3sup")]
#[command(about = "Install apps into k3s and Kubernetes clusters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage apps in the cluster
    App {
        #[command(subcommand)]
        command: AppCommands,
    },
}

#[derive(Subcommand)]
enum AppCommands {
    /// Install an app
    Install(InstallArgs),
}

#[derive(Args)]
struct InstallArgs {
    /// Kubeconfig file to use (defaults to $KUBECONFIG or ~/.kube/config)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    app: InstallCommands,
}

#[derive(Subcommand)]
enum InstallCommands {
    /// Install openfaas ingress with TLS
    #[command(
        name = "openfaas-ingress",
        long_about = "Install openfaas ingress. Requires cert-manager 0.11.0 or higher installation in the cluster. \
                      Please set --domain to your custom domain and set --email to your email - this email is used \
                      by letsencrypt for domain expiry etc.",
        after_help = "Example:\n  k3sup app install openfaas-ingress --domain openfaas.example.com --email openfaas@example.com"
    )]
    OpenfaasIngress(OpenFaasIngressArgs),
}

#[derive(Args)]
struct OpenFaasIngressArgs {
    /// Custom Ingress Domain
    #[arg(short, long)]
    domain: Option<String>,

    /// Letsencrypt Email
    #[arg(short, long)]
    email: Option<String>,

    /// Directory for the generated manifest (defaults to <tmp>/.k3sup)
    #[arg(long)]
    manifest_dir: Option<PathBuf>,

    /// Give the generated manifest a unique name for this run
    #[arg(long)]
    unique_manifest: bool,

    /// Abort kubectl apply after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("k3sup={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Execute command
    let result = match cli.command {
        Commands::App {
            command: AppCommands::Install(ref install),
        } => match install.app {
            InstallCommands::OpenfaasIngress(ref args) => {
                install_openfaas_ingress(install.kubeconfig.clone(), args).await
            }
        },
    };

    if let Err(e) = result {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Install the OpenFaaS ingress and ClusterIssuer
async fn install_openfaas_ingress(
    kubeconfig: Option<PathBuf>,
    args: &OpenFaasIngressArgs,
) -> Result<()> {
    let request = InstallRequest::new(
        args.domain.clone().unwrap_or_default(),
        args.email.clone().unwrap_or_default(),
        resolve_kubeconfig(kubeconfig),
    )?;

    let naming = if args.unique_manifest {
        FileNaming::Unique
    } else {
        FileNaming::Fixed
    };
    let writer = ManifestWriter::new(
        args.manifest_dir
            .clone()
            .unwrap_or_else(ManifestWriter::default_dir),
        naming,
    );
    debug!("Manifest directory: {}", writer.dir().display());

    let applier = KubectlApplier::new().with_timeout(args.timeout.map(Duration::from_secs));

    let manifest_path = OpenFaasIngressInstaller::new(applier, writer)
        .install(&request)
        .await
        .context("Unable to install openfaas-ingress")?;

    info!("Applied manifest {}", manifest_path.display());
    print_post_install_notes();

    Ok(())
}
