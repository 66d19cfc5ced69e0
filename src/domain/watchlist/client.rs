//! Watchlists sub-client — load, bootstrap, mutate.

use crate::client::WatchlistsClient;
use crate::domain::watchlist::wire::{CreateWatchlistRequest, SymbolPayload, WatchlistRecord};
use crate::domain::watchlist::{Watchlist, DEFAULT_WATCHLIST_NAME};
use crate::error::{HttpError, SdkError};
use crate::shared::{Symbol, WatchlistId};

/// Sub-client for watchlist operations.
pub struct Watchlists<'a> {
    pub(crate) client: &'a WatchlistsClient,
}

impl<'a> Watchlists<'a> {
    /// Fetch the full watchlist set.
    ///
    /// If the server holds none, performs the one-time bootstrap: a default
    /// watchlist is created and adopted as the sole entry. The returned
    /// order is the server's, which callers use as the selection tie-break.
    pub async fn load_all(&self) -> Result<Vec<Watchlist>, SdkError> {
        let records = self.client.http.list_watchlists().await?;

        let records = if records.is_empty() {
            tracing::info!("Server has no watchlists, creating \"{DEFAULT_WATCHLIST_NAME}\"");
            let created = self.create(DEFAULT_WATCHLIST_NAME).await?;
            vec![created]
        } else {
            records
        };

        records
            .into_iter()
            .map(|record| {
                Watchlist::try_from(record).map_err(|e| SdkError::Validation(e.to_string()))
            })
            .collect()
    }

    /// Create a watchlist with the given name.
    pub async fn create(&self, name: &str) -> Result<WatchlistRecord, SdkError> {
        let request = CreateWatchlistRequest::named(name);
        Ok(self.client.http.create_watchlist(&request).await?)
    }

    /// Fetch a single watchlist by id.
    pub async fn get(&self, id: WatchlistId) -> Result<Watchlist, SdkError> {
        let record = self.client.http.get_watchlist(id).await?;
        Watchlist::try_from(record).map_err(|e| SdkError::Validation(e.to_string()))
    }

    /// Delete a watchlist. Callers reconcile selection via a reload.
    pub async fn delete(&self, id: WatchlistId) -> Result<(), SdkError> {
        self.client
            .http
            .delete_watchlist(id)
            .await
            .map_err(mutation_error)?;
        Ok(())
    }

    /// Add a symbol to a watchlist.
    ///
    /// Empty-after-trim input is rejected locally, before any network call.
    /// Returns the stored (server-normalized) symbol.
    pub async fn add_symbol(&self, id: WatchlistId, raw: &str) -> Result<Symbol, SdkError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SdkError::Validation("symbol must not be empty".into()));
        }

        let payload = SymbolPayload {
            symbol: trimmed.to_string(),
        };
        let response = self
            .client
            .http
            .add_symbol(id, &payload)
            .await
            .map_err(mutation_error)?;
        Ok(response.added)
    }

    /// Remove a symbol from a watchlist. Same error contract as add.
    pub async fn remove_symbol(&self, id: WatchlistId, raw: &str) -> Result<Symbol, SdkError> {
        let symbol = Symbol::new(raw);
        if symbol.is_empty() {
            return Err(SdkError::Validation("symbol must not be empty".into()));
        }

        let response = self
            .client
            .http
            .remove_symbol(id, &symbol)
            .await
            .map_err(mutation_error)?;
        Ok(response.removed)
    }
}

/// Surface the server-provided detail when present, generic text otherwise.
fn mutation_error(err: HttpError) -> SdkError {
    let message = err
        .server_detail()
        .unwrap_or_else(|| "the server rejected the request".to_string());
    tracing::warn!(error = %err, "Watchlist mutation failed: {message}");
    SdkError::Mutation(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_error_uses_server_detail() {
        let err = mutation_error(HttpError::NotFound(
            r#"{"detail":"Watchlist not found"}"#.into(),
        ));
        assert!(matches!(err, SdkError::Mutation(msg) if msg == "Watchlist not found"));
    }

    #[test]
    fn test_mutation_error_falls_back_to_generic_text() {
        let err = mutation_error(HttpError::Timeout);
        assert!(matches!(err, SdkError::Mutation(msg) if msg == "the server rejected the request"));
    }
}
