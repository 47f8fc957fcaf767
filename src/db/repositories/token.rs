use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::prelude::*;
use crate::entities::tokens;
use crate::models::token::{Token, TokenPatch};

/// Result of an insert attempt. A duplicate secret is an expected
/// administrative conflict, not a database failure.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Token),
    DuplicateToken,
}

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Looks up a token by id or by secret, whichever matches first.
    ///
    /// The key is bound as a query parameter in both comparisons; it is
    /// never spliced into the predicate text.
    pub async fn find(&self, key: &str) -> Result<Option<Token>> {
        let mut cond = Condition::any().add(tokens::Column::Token.eq(key));
        if let Ok(id) = key.parse::<i32>() {
            cond = cond.add(tokens::Column::Id.eq(id));
        }

        let row = Tokens::find()
            .filter(cond)
            .order_by_asc(tokens::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query token by key")?;

        row.map(Token::try_from).transpose().map_err(Into::into)
    }

    /// Exact lookup by secret only, used for uniqueness checks.
    pub async fn find_by_secret(&self, secret: &str) -> Result<Option<Token>> {
        let row = Tokens::find()
            .filter(tokens::Column::Token.eq(secret))
            .one(&self.conn)
            .await
            .context("Failed to query token by secret")?;

        row.map(Token::try_from).transpose().map_err(Into::into)
    }

    /// Lists tokens ordered by id. `limit == 0` returns everything.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Token>> {
        let mut query = Tokens::find().order_by_asc(tokens::Column::Id);

        if offset > 0 {
            query = query.offset(offset);
        }
        if limit > 0 {
            query = query.limit(limit);
        }

        let rows = query.all(&self.conn).await.context("Failed to list tokens")?;

        rows.into_iter()
            .map(|row| Token::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Inserts a fully resolved token record, letting the store assign the id.
    pub async fn insert(&self, token: &Token) -> Result<CreateOutcome> {
        let mut model = Self::active_model(token);
        model.id = NotSet;

        match model.insert(&self.conn).await {
            Ok(row) => Ok(CreateOutcome::Created(Token::try_from(row)?)),
            Err(err) => match err.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    Ok(CreateOutcome::DuplicateToken)
                }
                _ => Err(err).context("Failed to insert token"),
            },
        }
    }

    /// Applies an administrative patch. Returns false when the id does not
    /// exist; `scope` and `time_created` are never written here.
    pub async fn update(&self, id: i32, patch: &TokenPatch, now: i64) -> Result<bool> {
        let Some(row) = Tokens::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to load token for update")?
        else {
            return Ok(false);
        };

        let mut active: tokens::ActiveModel = row.into();

        if let Some(secret) = &patch.token {
            active.token = Set(secret.clone());
        }
        if let Some(enabled) = patch.enabled {
            active.enabled = Set(i32::from(enabled));
        }
        if let Some(target_type) = patch.target_type {
            active.target_type = Set(target_type.as_str().to_string());
        }
        if let Some(target_id) = patch.target_id {
            active.target_id = Set(target_id);
        }
        if let Some(limited) = patch.limited {
            active.limited = Set(limited);
        }
        if let Some(time_limited) = patch.time_limited {
            active.time_limited = Set(time_limited);
        }
        if let Some((action, options)) = &patch.action {
            active.extended_action = Set(action.as_str().to_string());
            active.extended_options = Set(options.clone());
        }
        active.time_modified = Set(now);

        active
            .update(&self.conn)
            .await
            .context("Failed to update token")?;

        Ok(true)
    }

    /// Validates and consumes one use of a token in a single conditional
    /// update. The full eligibility predicate rides on the UPDATE itself, so
    /// two concurrent activations of a usage-limited token can never both
    /// pass the `limited` boundary.
    pub async fn activate(&self, secret: &str, now: i64) -> Result<Option<Token>> {
        let usage_ok = Condition::any()
            .add(tokens::Column::Limited.eq(0))
            .add(Expr::col(tokens::Column::Scope).lt(Expr::col(tokens::Column::Limited)));

        let time_ok = Condition::any().add(tokens::Column::TimeLimited.eq(0)).add(
            Expr::col(tokens::Column::TimeCreated)
                .add(Expr::col(tokens::Column::TimeLimited))
                .gt(now),
        );

        let rows = Tokens::update_many()
            .col_expr(
                tokens::Column::Scope,
                Expr::col(tokens::Column::Scope).add(1),
            )
            .col_expr(tokens::Column::TimeLastUse, Expr::value(now))
            .col_expr(tokens::Column::TimeModified, Expr::value(now))
            .filter(tokens::Column::Token.eq(secret))
            .filter(tokens::Column::Enabled.eq(1))
            .filter(usage_ok)
            .filter(time_ok)
            .exec_with_returning(&self.conn)
            .await
            .context("Failed to run conditional activation update")?;

        rows.into_iter()
            .next()
            .map(Token::try_from)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Tokens::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete token")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = Tokens::delete_many()
            .exec(&self.conn)
            .await
            .context("Failed to delete all tokens")?;

        Ok(result.rows_affected)
    }

    /// Restores a previously exported token set verbatim, ids included.
    /// Callers must have fully validated the set before this point; the
    /// delete is only reached with a parsed list in hand.
    pub async fn replace_all(&self, restored: &[Token]) -> Result<u64> {
        self.delete_all().await?;

        if restored.is_empty() {
            return Ok(0);
        }

        let models: Vec<tokens::ActiveModel> =
            restored.iter().map(Self::active_model).collect();

        Tokens::insert_many(models)
            .exec(&self.conn)
            .await
            .context("Failed to bulk insert restored tokens")?;

        Ok(restored.len() as u64)
    }

    fn active_model(token: &Token) -> tokens::ActiveModel {
        tokens::ActiveModel {
            id: Set(token.id),
            token: Set(token.token.clone()),
            enabled: Set(i32::from(token.enabled)),
            target_type: Set(token.target_type.as_str().to_string()),
            target_id: Set(token.target_id),
            scope: Set(token.scope),
            limited: Set(token.limited),
            time_created: Set(token.time_created),
            time_modified: Set(token.time_modified),
            time_last_use: Set(token.time_last_use),
            time_limited: Set(token.time_limited),
            extended_action: Set(token.extended_action.as_str().to_string()),
            extended_options: Set(token.extended_options.clone()),
        }
    }
}
