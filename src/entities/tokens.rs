use sea_orm::entity::prelude::*;

/// Raw storage row for an access token.
///
/// Columns are kept loosely typed on purpose (`enabled` as an integer flag,
/// the enum discriminants as plain strings): different backing stores return
/// these fields loosely, so every read goes through the codec in
/// [`crate::models::token`] before any other component touches it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Bearer secret, globally unique.
    #[sea_orm(unique)]
    pub token: String,

    /// 0/1 flag; disabled tokens never activate.
    pub enabled: i32,

    /// "none" or "user".
    pub target_type: String,

    /// User id when `target_type` is "user"; ignored otherwise.
    pub target_id: i64,

    /// Count of successful activations. Only the activation engine
    /// increments this.
    pub scope: i64,

    /// Max allowed activations; 0 = unlimited.
    pub limited: i64,

    pub time_created: i64,

    pub time_modified: i64,

    pub time_last_use: Option<i64>,

    /// Seconds after `time_created` at which the token expires; 0 = never.
    pub time_limited: i64,

    /// "none", "redirect", "group", "cohort" or "course".
    pub extended_action: String,

    /// Action parameter: URL for redirect, numeric id otherwise.
    pub extended_options: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
