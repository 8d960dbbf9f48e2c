//! Pushing compiled content types to the management service.

use tracing::{debug, info, warn};

use crate::client::ManagementClient;
use crate::compiler::compile;
use crate::error::{CodeFirstError, ManagementError, SyncError};
use crate::scanner::ScopeRegistry;
use crate::types::{CompiledContentType, ContentTypeDefinition, SyncOptions};

/// Create or update every compiled content type, in iteration order.
///
/// Remote state is listed once up front. Ids that already exist remotely are
/// skipped unless `force_update` is set. Calls are strictly sequential and
/// the first client error aborts the run.
///
/// Returns the definitions as answered by `upsert`.
///
/// # Errors
///
/// Returns `SyncError` wrapping the first client error, together with the
/// definitions upserted before it.
pub async fn sync<I>(
    compiled: I,
    options: &SyncOptions,
    client: &dyn ManagementClient,
) -> Result<Vec<ContentTypeDefinition>, SyncError>
where
    I: IntoIterator<Item = CompiledContentType>,
{
    let mut completed = Vec::new();

    let existing = match client.list(None).await {
        Ok(existing) => existing,
        Err(source) => return Err(SyncError { source, completed }),
    };
    debug!(count = existing.len(), "listed remote content types");

    for item in compiled {
        match sync_one(item, &existing, options, client).await {
            Ok(Some(definition)) => completed.push(definition),
            Ok(None) => {}
            Err(source) => return Err(SyncError { source, completed }),
        }
    }

    Ok(completed)
}

async fn sync_one(
    item: CompiledContentType,
    existing: &[ContentTypeDefinition],
    options: &SyncOptions,
    client: &dyn ManagementClient,
) -> Result<Option<ContentTypeDefinition>, ManagementError> {
    let CompiledContentType {
        mut definition,
        controls,
    } = item;

    let remote = existing.iter().find(|d| d.id == definition.id);
    if remote.is_some() && !options.force_update {
        debug!(id = %definition.id, "content type exists remotely, skipping");
        return Ok(None);
    }

    definition.version = remote.and_then(|r| r.version);
    let upserted = client.upsert(&definition, definition.version).await?;
    info!(id = %upserted.id, version = ?upserted.version, "upserted content type");

    if options.publish_automatically {
        let version = upserted.version.unwrap_or(1);
        client.activate(&upserted.id, version).await?;
        info!(id = %upserted.id, version, "activated content type");
    }

    if !controls.is_empty() {
        let mut config = client.widget_config(&upserted.id).await?;
        let unmatched = config.merge(&controls);
        for control in &unmatched {
            warn!(
                id = %upserted.id,
                field = %control.field_id,
                widget = %control.widget_id,
                "no editor control for field, widget not applied"
            );
        }
        debug!(
            id = %upserted.id,
            applied = controls.len() - unmatched.len(),
            "merged editor controls"
        );
        let version = config.version;
        client
            .update_widget_config(&config, &upserted.id, version)
            .await?;
    }

    Ok(Some(upserted))
}

/// Scan a registered scope, compile its types and synchronize them.
///
/// # Errors
///
/// Returns `CodeFirstError::Scan` for an unknown scope, or
/// `CodeFirstError::Sync` if a client call fails.
pub async fn create_content_types_from_scope(
    registry: &ScopeRegistry,
    scope: &str,
    options: &SyncOptions,
    client: &dyn ManagementClient,
) -> Result<Vec<ContentTypeDefinition>, CodeFirstError> {
    let types = registry.load_types(scope)?;
    info!(scope, count = types.len(), "synchronizing scope");
    let compiled: Vec<_> = compile(&types).collect();
    Ok(sync(compiled, options, client).await?)
}
