//! Client-facing reducers. Each one resolves the caller, runs an action from
//! `mobrank_logic::actions` over a [`TableStore`], and logs the result.

use crate::store::{active_rules, settings_row, unix_seconds, TableStore, SETTINGS_ID};
use crate::tables::*;
use mobrank_logic::actions;
use mobrank_logic::admin::StatEdit;
use mobrank_logic::config::{validate_rules, GameRules};
use mobrank_logic::error::ActionError;
use mobrank_logic::player::PlayerId;
use spacetimedb::{reducer, Identity, ReducerContext, Table};

fn now(ctx: &ReducerContext) -> i64 {
    unix_seconds(ctx.timestamp)
}

fn is_admin(ctx: &ReducerContext) -> bool {
    ctx.db.admin_role().identity().find(ctx.sender).is_some()
}

/// Player linked to the calling identity.
fn caller_player(ctx: &ReducerContext) -> Result<PlayerId, ActionError> {
    ctx.db
        .account()
        .identity()
        .find(ctx.sender)
        .map(|a| a.player_id)
        .ok_or(ActionError::NotRegistered)
}

/// Log a rejected action and turn it into the reducer error string.
fn reject(action: &str, err: ActionError) -> String {
    log::warn!("{} rejected ({:?}): {}", action, err.kind(), err);
    err.to_string()
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Seed the rules singleton and grant the publisher admin rights
#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    let rules = GameRules::default();
    ctx.db.game_settings().insert(settings_row(&rules, ctx.timestamp));
    ctx.db.admin_role().insert(AdminRole {
        identity: ctx.sender,
        granted_by: ctx.sender,
        granted_at: ctx.timestamp,
    });
    log::info!("Mobrank initialized, admin {:?}", ctx.sender);
}

#[reducer(client_connected)]
pub fn client_connected(ctx: &ReducerContext) {
    let player = ctx.db.account().identity().find(ctx.sender).map(|a| a.player_id);
    log::info!("Client connected: {:?} (player {:?})", ctx.sender, player);
}

// ============================================================================
// PLAYER REDUCERS
// ============================================================================

/// Create a player for the calling identity
#[reducer]
pub fn register(ctx: &ReducerContext, name: String) -> Result<(), String> {
    if ctx.db.account().identity().find(ctx.sender).is_some() {
        return Err(reject("register", ActionError::AlreadyRegistered));
    }
    let rules = active_rules(ctx);
    let mut store = TableStore::new(ctx);
    let (id, state) =
        actions::register(&mut store, &name, now(ctx), &rules).map_err(|e| reject("register", e))?;
    ctx.db.account().insert(Account {
        identity: ctx.sender,
        player_id: id,
        created_at: ctx.timestamp,
    });
    log::info!("Player #{} '{}' registered by {:?}", id, state.name, ctx.sender);
    Ok(())
}

#[reducer]
pub fn attempt_crime(ctx: &ReducerContext, crime_id: String) -> Result<(), String> {
    let id = caller_player(ctx).map_err(|e| reject("attempt_crime", e))?;
    let rules = active_rules(ctx);
    let mut rng = ctx.rng();
    let mut store = TableStore::new(ctx);
    let out = actions::attempt_crime(&mut store, id, &crime_id, now(ctx), &rules, &mut rng)
        .map_err(|e| reject("attempt_crime", e))?;
    log::info!(
        "Player #{} {} {} (p={:.2}): {}",
        id,
        if out.succeeded { "pulled off" } else { "botched" },
        out.crime.id,
        out.chance,
        out.message
    );
    if let Some(rank) = out.promoted_to {
        log::info!("Player #{} promoted to {}", id, rank);
    }
    if out.prestiged {
        log::info!("Player #{} prestiged to {}", id, out.player.prestige);
    }
    Ok(())
}

#[reducer]
pub fn pay_bail(ctx: &ReducerContext) -> Result<(), String> {
    let id = caller_player(ctx).map_err(|e| reject("pay_bail", e))?;
    let rules = active_rules(ctx);
    let mut store = TableStore::new(ctx);
    let out =
        actions::pay_bail(&mut store, id, now(ctx), &rules).map_err(|e| reject("pay_bail", e))?;
    log::info!("Player #{} paid ${} bail", id, out.cost);
    Ok(())
}

/// Try to break another player out of prison
#[reducer]
pub fn bust(ctx: &ReducerContext, target_player_id: u64) -> Result<(), String> {
    let id = caller_player(ctx).map_err(|e| reject("bust", e))?;
    let rules = active_rules(ctx);
    let mut rng = ctx.rng();
    let mut store = TableStore::new(ctx);
    let out = actions::bust(&mut store, id, target_player_id, now(ctx), &rules, &mut rng)
        .map_err(|e| reject("bust", e))?;
    log::info!(
        "Player #{} bust on #{} {} (p={:.2})",
        id,
        target_player_id,
        if out.succeeded { "succeeded" } else { "failed" },
        out.chance
    );
    Ok(())
}

/// [`bust`] with the target given by display name
#[reducer]
pub fn bust_by_name(ctx: &ReducerContext, target_name: String) -> Result<(), String> {
    let id = caller_player(ctx).map_err(|e| reject("bust_by_name", e))?;
    let rules = active_rules(ctx);
    let mut rng = ctx.rng();
    let mut store = TableStore::new(ctx);
    let out = actions::bust_by_name(&mut store, id, &target_name, now(ctx), &rules, &mut rng)
        .map_err(|e| reject("bust_by_name", e))?;
    log::info!(
        "Player #{} bust on '{}' {} (p={:.2})",
        id,
        out.target.name,
        if out.succeeded { "succeeded" } else { "failed" },
        out.chance
    );
    Ok(())
}

// ============================================================================
// ADMIN REDUCERS
// ============================================================================

/// Overwrite any subset of a player's stats
#[reducer]
#[allow(clippy::too_many_arguments)]
pub fn admin_set_stats(
    ctx: &ReducerContext,
    target_player_id: u64,
    cash: Option<i64>,
    respect: Option<i64>,
    heat: Option<i64>,
    experience: Option<i64>,
    prestige: Option<i64>,
) -> Result<(), String> {
    let edit = StatEdit {
        cash,
        respect,
        heat,
        experience,
        prestige,
    };
    let mut store = TableStore::new(ctx);
    let out = actions::admin_edit(&mut store, is_admin(ctx), target_player_id, &edit, now(ctx))
        .map_err(|e| reject("admin_set_stats", e))?;
    log::info!("Admin {:?}: {}", ctx.sender, out.message);
    Ok(())
}

#[reducer]
pub fn admin_release(ctx: &ReducerContext, target_player_id: u64) -> Result<(), String> {
    let mut store = TableStore::new(ctx);
    let out = actions::admin_release(&mut store, is_admin(ctx), target_player_id, now(ctx))
        .map_err(|e| reject("admin_release", e))?;
    log::info!("Admin {:?}: {}", ctx.sender, out.message);
    Ok(())
}

#[reducer]
pub fn admin_jail(ctx: &ReducerContext, target_player_id: u64, seconds: i64) -> Result<(), String> {
    let mut store = TableStore::new(ctx);
    let out = actions::admin_jail(&mut store, is_admin(ctx), target_player_id, seconds, now(ctx))
        .map_err(|e| reject("admin_jail", e))?;
    log::info!("Admin {:?}: {}", ctx.sender, out.message);
    Ok(())
}

/// Grant or revoke admin rights. Admins cannot revoke themselves.
#[reducer]
pub fn admin_grant(ctx: &ReducerContext, target: Identity, granted: bool) -> Result<(), String> {
    if !is_admin(ctx) {
        return Err(reject("admin_grant", ActionError::AdminOnly));
    }
    let existing = ctx.db.admin_role().identity().find(target);
    match (granted, existing) {
        (true, None) => {
            ctx.db.admin_role().insert(AdminRole {
                identity: target,
                granted_by: ctx.sender,
                granted_at: ctx.timestamp,
            });
            log::info!("Admin {:?} granted admin to {:?}", ctx.sender, target);
        }
        (false, Some(_)) if target == ctx.sender => {
            log::warn!("Admin {:?} tried to revoke their own grant", ctx.sender);
            return Err("cannot revoke your own admin grant".to_string());
        }
        (false, Some(_)) => {
            ctx.db.admin_role().identity().delete(target);
            log::info!("Admin {:?} revoked admin from {:?}", ctx.sender, target);
        }
        _ => log::debug!("admin_grant for {:?} is a no-op", target),
    }
    Ok(())
}

/// Replace the active rules. `rules_json` may omit fields; they keep defaults.
#[reducer]
pub fn admin_update_rules(ctx: &ReducerContext, rules_json: String) -> Result<(), String> {
    if !is_admin(ctx) {
        return Err(reject("admin_update_rules", ActionError::AdminOnly));
    }
    let rules: GameRules = serde_json::from_str(&rules_json).map_err(|e| {
        log::warn!("admin_update_rules: bad JSON: {}", e);
        format!("invalid rules JSON: {}", e)
    })?;
    let errors = validate_rules(&rules);
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        log::warn!("admin_update_rules rejected: {}", joined);
        return Err(joined);
    }
    let row = settings_row(&rules, ctx.timestamp);
    if ctx.db.game_settings().id().find(SETTINGS_ID).is_some() {
        ctx.db.game_settings().id().update(row);
    } else {
        ctx.db.game_settings().insert(row);
    }
    log::info!("Admin {:?} updated game rules", ctx.sender);
    Ok(())
}
