//! Endpoint `channels`

use super::resources::{ChannelResource, ListResponse};
use super::{Credential, YouTubeApi};
use crate::error::{Result, YouTubeError};

impl YouTubeApi {
    /// Retourne l'id de la chaîne de l'utilisateur authentifié
    ///
    /// Cet id sert d'identifiant utilisateur pour le miroir SQLite.
    pub async fn my_channel_id(&self, access_token: &str) -> Result<String> {
        let response: ListResponse<ChannelResource> = self
            .get(
                "/channels",
                &[("part", "id"), ("mine", "true")],
                Credential::AccessToken(access_token),
            )
            .await?;

        response
            .into_items()
            .into_iter()
            .find_map(|channel| channel.id)
            .ok_or_else(|| YouTubeError::NotFound("channel of the authenticated user".to_string()))
    }
}
