use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An item volunteers can spend coins on at the periodic auction.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuctionLot {
    pub id: i64,
    pub photo_id: String,
    pub title: String,
    pub description: String,
}

impl AuctionLot {
    pub async fn all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AuctionLot>(
            "SELECT id, photo_id, title, description FROM auction_lots ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Lot captions use "/n" as a manual line-break marker in the stored
    /// description.
    pub fn caption(&self) -> String {
        format!("{}\n\n{}", self.title, self.description.replace("/n", "\n"))
    }
}
