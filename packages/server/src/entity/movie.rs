use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_details")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "movieId")]
    pub movie_id: i32,

    pub title: String,

    #[sea_orm(column_name = "releaseYear")]
    pub release_year: u16,

    pub genre: String,

    /// Public object-store URL of the cover image.
    #[sea_orm(column_name = "coverUrl", nullable)]
    pub cover_url: Option<String>,

    /// Written once by the summary workflow; empty counts as missing.
    #[sea_orm(column_name = "generatedSummary", column_type = "Text", nullable)]
    pub generated_summary: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
