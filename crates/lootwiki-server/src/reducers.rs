//! Lifecycle, account, and site configuration reducers.

use crate::tables::*;
use lootwiki_logic::content::validate_display_name;
use lootwiki_logic::planner::PlannerLimits;
use lootwiki_logic::LogicError;
use spacetimedb::{reducer, ReducerContext, Table};

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Called once when the module is first published
#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    log::info!("Initializing site config, admin {:?}", ctx.sender);
    ctx.db
        .site_config()
        .insert(SiteConfig::with_defaults(ctx.sender));
}

/// Called when a client connects
#[reducer(client_connected)]
pub fn client_connected(ctx: &ReducerContext) {
    log::info!("Client connected: {:?}", ctx.sender);
}

/// Called when a client disconnects
#[reducer(client_disconnected)]
pub fn client_disconnected(ctx: &ReducerContext) {
    log::info!("Client disconnected: {:?}", ctx.sender);
}

// ============================================================================
// ACCOUNTS
// ============================================================================

/// Create an account for the calling identity
#[reducer]
pub fn register_user(ctx: &ReducerContext, display_name: String) -> Result<(), String> {
    let display_name = validate_display_name(&display_name)?;

    if ctx.db.user_account().identity().find(ctx.sender).is_some() {
        log::warn!("Duplicate registration from {:?}", ctx.sender);
        return Err(LogicError::invalid("account already registered").into());
    }

    log::info!("Registering user {:?} as {}", ctx.sender, display_name);
    ctx.db.user_account().insert(UserAccount {
        identity: ctx.sender,
        display_name,
        created_at: ctx.timestamp,
    });
    Ok(())
}

#[reducer]
pub fn rename_user(ctx: &ReducerContext, display_name: String) -> Result<(), String> {
    let mut account = require_user(ctx)?;
    account.display_name = validate_display_name(&display_name)?;
    ctx.db.user_account().identity().update(account);
    Ok(())
}

// ============================================================================
// SITE CONFIG
// ============================================================================

/// Admin-only: adjust planner caps and the self-vote rule
#[reducer]
pub fn set_site_config(
    ctx: &ReducerContext,
    max_level: u32,
    max_points_per_stat: u32,
    max_title_len: u32,
    allow_self_vote: bool,
) -> Result<(), String> {
    let mut config = site_config(ctx);
    if config.admin != ctx.sender {
        log::warn!("Non-admin {:?} tried to change site config", ctx.sender);
        return Err(LogicError::AuthenticationRequired.into());
    }

    PlannerLimits {
        max_level,
        max_points_per_stat,
    }
    .check_sane()?;
    if max_title_len == 0 {
        return Err(LogicError::invalid("max_title_len must be positive").into());
    }

    config.max_level = max_level;
    config.max_points_per_stat = max_points_per_stat;
    config.max_title_len = max_title_len;
    config.allow_self_vote = allow_self_vote;
    log::info!(
        "Site config: max_level={} max_points={} max_title={} self_vote={}",
        max_level,
        max_points_per_stat,
        max_title_len,
        allow_self_vote
    );

    if ctx.db.site_config().id().find(0).is_some() {
        ctx.db.site_config().id().update(config);
    } else {
        ctx.db.site_config().insert(config);
    }
    Ok(())
}

// ============================================================================
// SHARED GUARDS
// ============================================================================

/// The caller's account, or `AuthenticationRequired`.
pub(crate) fn require_user(ctx: &ReducerContext) -> Result<UserAccount, LogicError> {
    ctx.db
        .user_account()
        .identity()
        .find(ctx.sender)
        .ok_or(LogicError::AuthenticationRequired)
}

/// Current site config; defaults (admin = module identity) if `init` never ran.
pub(crate) fn site_config(ctx: &ReducerContext) -> SiteConfig {
    ctx.db
        .site_config()
        .id()
        .find(0)
        .unwrap_or_else(|| SiteConfig::with_defaults(ctx.identity()))
}
