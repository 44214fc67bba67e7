//! authority-chain CLI — `achain` command.
//!
//! Verifies role credential issuers, revokers and revocation status against
//! a directory-backed role registry, and manages the registry's contents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use authority_chain::credential::Credential;
use authority_chain::status::StatusListCredential;
use authority_chain::{
    AuthorityChainVerifier, AuthoritySpec, DidDocument, FileRoleRegistry, Identity,
    IssuanceOutcome, RoleAuthority, VerificationResult, VerificationSession, VerifierConfig,
};

/// Exit status when verification completed with a negative answer.
const EXIT_NOT_VERIFIED: i32 = 2;

// ── Directory helpers ─────────────────────────────────────────────────────────

fn default_registry_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set; pass --registry")?;
    Ok(PathBuf::from(home).join(".authority-chain"))
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// achain — verify chains of trust behind role credentials.
#[derive(Parser, Debug)]
#[command(name = "achain", about = "authority-chain CLI", version)]
struct Cli {
    /// Registry directory (default: ~/.authority-chain)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Verifier configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging of every chain hop
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct Target {
    /// Identity (DID or bare address)
    identity: String,
    /// Role namespace
    namespace: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that an identity may issue credentials for a role
    VerifyIssuer(Target),

    /// Fetch an identity's credential for a role and check its proof
    VerifyIssuance(Target),

    /// Check that an identity may revoke credentials for a role
    VerifyRevoker(Target),

    /// Check that no credential above an issuer has expired or been revoked
    CheckRevocation(Target),

    /// List the credentials stored for an identity
    Credentials {
        /// Identity (DID or bare address)
        identity: String,
    },

    /// Manage role definitions
    Role {
        #[command(subcommand)]
        subcommand: RoleCommands,
    },

    /// Import documents into the registry
    Import {
        #[command(subcommand)]
        subcommand: ImportCommands,
    },
}

#[derive(Subcommand, Debug)]
enum RoleCommands {
    /// Define or redefine a role
    Define {
        /// Role namespace
        namespace: String,
        /// Comma-separated identities allowed to issue
        #[arg(long, conflicts_with = "issuer_role")]
        issuer_dids: Option<String>,
        /// Role whose holders may issue
        #[arg(long)]
        issuer_role: Option<String>,
        /// Comma-separated identities allowed to revoke
        #[arg(long, conflicts_with = "revoker_role")]
        revoker_dids: Option<String>,
        /// Role whose holders may revoke
        #[arg(long)]
        revoker_role: Option<String>,
    },

    /// Show a role definition
    Show {
        /// Role namespace
        namespace: String,
    },

    /// List defined roles
    List,
}

#[derive(Subcommand, Debug)]
enum ImportCommands {
    /// Import a credential (VC JSON or claim token)
    Credential {
        /// File holding the credential
        file: PathBuf,
    },

    /// Import a DID document
    Did {
        /// File holding the DID document
        file: PathBuf,
    },

    /// Import a status list credential
    StatusList {
        /// URI the list is published at
        uri: String,
        /// File holding the status list credential
        file: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_NOT_VERIFIED),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a verification ran and did not pass.
async fn run(cli: Cli) -> Result<bool> {
    let registry_dir = match cli.registry {
        Some(dir) => dir,
        None => default_registry_dir()?,
    };
    let registry = Arc::new(
        FileRoleRegistry::new(&registry_dir)
            .with_context(|| format!("failed to open registry {}", registry_dir.display()))?,
    );
    let config = match &cli.config {
        Some(path) => VerifierConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => VerifierConfig::default(),
    };
    log::debug!("registry {} with {:?}", registry_dir.display(), config);

    match cli.command {
        Commands::VerifyIssuer(target) => {
            let verifier = build_verifier(&registry, config)?;
            let result = verifier
                .verify_issuer(
                    &Identity::new(&target.identity),
                    &target.namespace,
                    &VerificationSession::new(),
                )
                .await?;
            report("verify-issuer", &target, result)
        }
        Commands::VerifyRevoker(target) => {
            let verifier = build_verifier(&registry, config)?;
            let result = verifier
                .verify_revoker(
                    &Identity::new(&target.identity),
                    &target.namespace,
                    &VerificationSession::new(),
                )
                .await?;
            report("verify-revoker", &target, result)
        }
        Commands::CheckRevocation(target) => {
            let verifier = build_verifier(&registry, config)?;
            let result = verifier
                .check_revocation_status(
                    &Identity::new(&target.identity),
                    &target.namespace,
                    &VerificationSession::new(),
                )
                .await?;
            report("check-revocation", &target, result)
        }
        Commands::VerifyIssuance(target) => {
            let verifier = build_verifier(&registry, config)?;
            let outcome = verifier
                .verify_issuance(
                    &Identity::new(&target.identity),
                    &target.namespace,
                    &VerificationSession::new(),
                )
                .await?;
            cmd_issuance(&target, outcome)
        }
        Commands::Credentials { identity } => {
            cmd_credentials(&registry, &Identity::new(identity))?;
            Ok(true)
        }
        Commands::Role { subcommand } => {
            match subcommand {
                RoleCommands::Define {
                    namespace,
                    issuer_dids,
                    issuer_role,
                    revoker_dids,
                    revoker_role,
                } => {
                    let authority = RoleAuthority {
                        issuer: authority_spec("issuer", issuer_dids, issuer_role)?,
                        revoker: authority_spec("revoker", revoker_dids, revoker_role)?,
                    };
                    registry.save_role(&namespace, &authority)?;
                    println!("Defined {namespace}");
                }
                RoleCommands::Show { namespace } => {
                    let authority = registry
                        .load_role(&namespace)?
                        .ok_or_else(|| anyhow!("role '{namespace}' is not defined"))?;
                    println!("{}", serde_json::to_string_pretty(&authority)?);
                }
                RoleCommands::List => {
                    let roles = registry.list_roles()?;
                    if roles.is_empty() {
                        println!("No roles defined.");
                    }
                    for namespace in roles {
                        println!("{namespace}");
                    }
                }
            }
            Ok(true)
        }
        Commands::Import { subcommand } => {
            cmd_import(&registry, subcommand)?;
            Ok(true)
        }
    }
}

fn build_verifier(
    registry: &Arc<FileRoleRegistry>,
    config: VerifierConfig,
) -> Result<AuthorityChainVerifier> {
    AuthorityChainVerifier::builder()
        .authorities(registry.clone())
        .credentials(registry.clone())
        .did_resolver(registry.clone())
        .status_lists(registry.clone())
        .config(config)
        .build()
        .context("failed to build verifier")
}

// ── Command implementations ───────────────────────────────────────────────────

/// Print a verification result as JSON.
fn report(command: &str, target: &Target, result: VerificationResult) -> Result<bool> {
    let output = json!({
        "command": command,
        "identity": target.identity,
        "namespace": target.namespace,
        "verified": result.verified,
        "reason": result.reason,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(result.verified)
}

/// `achain verify-issuance <identity> <namespace>`
fn cmd_issuance(target: &Target, outcome: IssuanceOutcome) -> Result<bool> {
    let output = match &outcome {
        IssuanceOutcome::Verified(credential) => json!({
            "command": "verify-issuance",
            "identity": target.identity,
            "namespace": target.namespace,
            "verified": true,
            "format": credential.format(),
            "issuer": credential.issuer(),
            "credential": credential,
        }),
        IssuanceOutcome::Rejected(reason) => json!({
            "command": "verify-issuance",
            "identity": target.identity,
            "namespace": target.namespace,
            "verified": false,
            "reason": reason,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(outcome.credential().is_some())
}

/// `achain credentials <identity>`
fn cmd_credentials(registry: &FileRoleRegistry, identity: &Identity) -> Result<()> {
    let credentials = registry.credentials_of(identity)?;
    if credentials.is_empty() {
        println!("No credentials stored for {identity}.");
        return Ok(());
    }

    println!("{} credential(s) for {identity}:", credentials.len());
    for credential in &credentials {
        let expiry = match credential.expires_at()? {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "never".to_string(),
        };
        println!(
            "  {} v{}  [{}]  issuer {}  expires {}{}",
            credential.role_namespace(),
            credential.role_version(),
            credential.format(),
            credential.issuer(),
            expiry,
            if credential.status().is_some() {
                "  (revocable)"
            } else {
                ""
            }
        );
    }
    Ok(())
}

/// `achain import ...`
fn cmd_import(registry: &FileRoleRegistry, subcommand: ImportCommands) -> Result<()> {
    match subcommand {
        ImportCommands::Credential { file } => {
            let credential = Credential::parse(&read_file(&file)?)
                .with_context(|| format!("{} is not a credential", file.display()))?;
            let path = registry.save_credential(&credential)?;
            println!(
                "Imported {} credential for {} ({})",
                credential.role_namespace(),
                credential.subject(),
                path.display()
            );
        }
        ImportCommands::Did { file } => {
            let document: DidDocument = serde_json::from_str(&read_file(&file)?)
                .with_context(|| format!("{} is not a DID document", file.display()))?;
            registry.save_document(&document)?;
            println!("Imported DID document for {}", document.id);
        }
        ImportCommands::StatusList { uri, file } => {
            let list: StatusListCredential = serde_json::from_str(&read_file(&file)?)
                .with_context(|| format!("{} is not a status list credential", file.display()))?;
            registry.save_status_list(&uri, &list)?;
            println!("Imported status list {uri} issued by {}", list.issuer);
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Build one side of a role definition from `--*-dids` / `--*-role`.
fn authority_spec(
    side: &str,
    dids: Option<String>,
    role: Option<String>,
) -> Result<Option<AuthoritySpec>> {
    match (dids, role) {
        (Some(dids), None) => {
            let identities: Vec<&str> = dids
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .collect();
            if identities.is_empty() {
                bail!("--{side}-dids needs at least one identity");
            }
            Ok(Some(AuthoritySpec::identities(identities)))
        }
        (None, Some(role)) => Ok(Some(AuthoritySpec::role(role))),
        (None, None) => Ok(None),
        (Some(_), Some(_)) => bail!("--{side}-dids and --{side}-role are exclusive"),
    }
}
