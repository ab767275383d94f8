//! Command-line entry points.
//!
//! The CLI drives a real [`AccessSession`] against the configured backend,
//! which is handy for checking what a given account will see without opening
//! the front-end.

use crate::backend::{BearerToken, HttpPermissionSource};
use crate::routes;
use crate::session::AccessSession;
use crate::store::{PermissionStore, RefreshOutcome};
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use schooldesk_cache::{CacheConfig, FileStore, PermissionCache};
use schooldesk_config::{ApiConfig, NavigationConfig};
use schooldesk_models::{Identity, Role, UserId};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "schooldesk")]
#[command(about = "Schooldesk access-control tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the route guard decision for a view
    Check {
        /// View path, e.g. /fees/payments/new
        path: String,

        #[command(flatten)]
        login: LoginArgs,
    },
    /// Fetch and print the permission set and sidebar
    Permissions {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// List the registered views and their restrictions
    Routes,
    /// Delete the durable permission cache
    ClearCache,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Bearer token for the backend
    #[arg(short = 't', long, env = "SCHOOLDESK_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Account id
    #[arg(short = 'u', long, env = "SCHOOLDESK_USER_ID")]
    pub user_id: UserId,

    /// Account role (director, head_teacher, class_teacher, bursar)
    #[arg(short = 'r', long, env = "SCHOOLDESK_ROLE")]
    pub role: Role,
}

impl LoginArgs {
    fn identity(&self) -> Identity {
        Identity::new(self.user_id, self.role)
    }
}

/// Configuration gathered from the environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api: ApiConfig,
    pub navigation: NavigationConfig,
    pub cache: CacheConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            navigation: NavigationConfig::from_env(),
            cache: CacheConfig::from_env(),
        }
    }

    fn permission_cache(&self) -> PermissionCache {
        PermissionCache::new(
            Arc::new(FileStore::new(&self.cache.dir)),
            &self.cache.key_prefix,
        )
    }

    fn access_session(&self) -> anyhow::Result<AccessSession<HttpPermissionSource>> {
        let token = BearerToken::new();
        let source = HttpPermissionSource::new(&self.api, token.clone())
            .context("Failed to build backend client")?;
        let store = PermissionStore::new(source, self.permission_cache());
        Ok(AccessSession::new(store).with_credentials(token))
    }
}

pub async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { path, login } => check(&settings, &path, &login).await,
        Commands::Permissions { login } => print_permissions(&settings, &login).await,
        Commands::Routes => {
            print_routes();
            Ok(())
        }
        Commands::ClearCache => {
            settings.permission_cache().clear();
            println!("Permission cache cleared ({})", settings.cache.dir.display());
            Ok(())
        }
    }
}

async fn sign_in(
    settings: &Settings,
    login: &LoginArgs,
) -> anyhow::Result<AccessSession<HttpPermissionSource>> {
    let session = settings.access_session()?;
    if session.sign_in(login.identity(), login.token.clone()).await == RefreshOutcome::Failed {
        eprintln!("warning: permission refresh failed, using cached permissions");
    }
    Ok(session)
}

async fn check(settings: &Settings, path: &str, login: &LoginArgs) -> anyhow::Result<()> {
    let Some(mut guard) = routes::guard_for(path, settings.navigation.clone()) else {
        bail!("Unknown route: {}", path);
    };

    let session = sign_in(settings, login).await?;
    let decision = guard.evaluate(&session.context());

    let verdict = if decision.should_render() { "render" } else { "blocked" };
    println!("{} -> {} ({})", path, decision.state, verdict);
    if let Some(redirect) = decision.redirect {
        println!("redirect: {}", redirect.path());
    }
    Ok(())
}

async fn print_permissions(settings: &Settings, login: &LoginArgs) -> anyhow::Result<()> {
    let session = sign_in(settings, login).await?;
    let store = session.store();

    let permissions = store.permissions();
    println!("Permissions ({}):", permissions.len());
    for code in permissions.iter() {
        println!("  {}", code);
    }

    let sidebar = store.visible_sidebar();
    println!("Sidebar ({}):", sidebar.len());
    for item in sidebar {
        let label = item.label.as_deref().unwrap_or(&item.module);
        println!("  {} [{}]", label, item.module);
    }
    Ok(())
}

fn print_routes() {
    for route in routes::route_table() {
        let guard = &route.guard;
        let mut restrictions = Vec::new();
        if let Some(module) = &guard.requirement.module {
            restrictions.push(format!("module={}", module));
        }
        if !guard.requirement.permissions.is_empty() {
            restrictions.push(format!(
                "permissions({:?})={}",
                guard.requirement.mode,
                guard.requirement.permissions.join(",")
            ));
        }
        if let Some(roles) = &guard.allowed_roles {
            let roles: Vec<&str> = roles.iter().map(Role::as_str).collect();
            restrictions.push(format!("roles={}", roles.join(",")));
        }
        if restrictions.is_empty() {
            restrictions.push("authenticated".into());
        }
        println!("{:<28} {:<26} {}", route.path, route.title, restrictions.join(" "));
    }
}
